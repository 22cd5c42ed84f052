use std::env;

use crate::error::{Error, Result};
use crate::eval::Profile;

pub const DEFAULT_DEPTH: u32 = 6;
pub const DEFAULT_RATIONALITY: f64 = 0.8;

/// Session-wide search settings, fixed for a whole game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Search horizon in plies (one ply per individual move).
    pub depth: u32,
    pub profile: Profile,
    /// Probability that an adversary plays its lowest-weight move.
    pub rationality: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            depth: DEFAULT_DEPTH,
            profile: Profile::default(),
            rationality: DEFAULT_RATIONALITY,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.rationality) {
            return Err(Error::InvalidRationality(self.rationality));
        }
        Ok(())
    }

    /// Defaults overridden by `HUPMAN_DEPTH`, `HUPMAN_PROFILE` and
    /// `HUPMAN_RATIONALITY`. Malformed values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = SessionConfig::default();
        let depth = lookup("HUPMAN_DEPTH")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults.depth);
        let profile = lookup("HUPMAN_PROFILE")
            .and_then(|v| v.parse::<Profile>().ok())
            .unwrap_or(defaults.profile);
        let rationality = lookup("HUPMAN_RATIONALITY")
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|p| (0.0..=1.0).contains(p))
            .unwrap_or(defaults.rationality);
        SessionConfig {
            depth,
            profile,
            rationality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_apply() {
        let cfg = SessionConfig::from_lookup(lookup(&[
            ("HUPMAN_DEPTH", "3"),
            ("HUPMAN_PROFILE", "patient"),
            ("HUPMAN_RATIONALITY", "0.25"),
        ]));
        assert_eq!(
            cfg,
            SessionConfig {
                depth: 3,
                profile: Profile::Patient,
                rationality: 0.25
            }
        );
    }

    #[test]
    fn malformed_values_fall_back() {
        let cfg = SessionConfig::from_lookup(lookup(&[
            ("HUPMAN_DEPTH", "deep"),
            ("HUPMAN_PROFILE", "reckless"),
            ("HUPMAN_RATIONALITY", "1.5"),
        ]));
        assert_eq!(cfg, SessionConfig::default());
    }

    #[test]
    fn rationality_out_of_range_is_invalid() {
        let cfg = SessionConfig {
            rationality: -0.1,
            ..SessionConfig::default()
        };
        assert_eq!(cfg.validate(), Err(Error::InvalidRationality(-0.1)));
        assert!(SessionConfig::default().validate().is_ok());
    }
}
