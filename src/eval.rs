//! Heuristic scoring of game states.
//!
//! Scoring is not pure: eating a pellet and getting caught are resolved on the
//! snapshot being scored, which is how the search prunes pellets and flags
//! death while it expands.

use std::fmt;
use std::str::FromStr;

use crate::maze::MazeGraph;
use crate::path::PathFinder;
use crate::state::{GameState, Mover};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Profile {
    /// Fixed constants.
    #[default]
    Steady,
    /// Pellet reward and adversary pressure grow the longer the agent goes
    /// without eating.
    Patient,
}

impl Profile {
    pub fn weights(self) -> Weights {
        match self {
            Profile::Steady => Weights {
                pellet_reward: 100.0,
                death_penalty: 1000.0,
                pellet_pull: 10.0,
                pellet_decay: 2.0,
                adversary_push: 40.0,
                adversary_decay: 2.0,
                step_penalty: 0.5,
                patience_rate: 0.0,
            },
            Profile::Patient => Weights {
                pellet_reward: 80.0,
                death_penalty: 1000.0,
                pellet_pull: 8.0,
                pellet_decay: 1.5,
                adversary_push: 30.0,
                adversary_decay: 2.0,
                step_penalty: 0.2,
                patience_rate: 0.1,
            },
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "steady" => Ok(Profile::Steady),
            "patient" => Ok(Profile::Patient),
            other => Err(format!("unknown profile '{other}'")),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Steady => f.write_str("steady"),
            Profile::Patient => f.write_str("patient"),
        }
    }
}

/// Scaling constants of a profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    pub pellet_reward: f64,
    pub death_penalty: f64,
    pub pellet_pull: f64,
    pub pellet_decay: f64,
    pub adversary_push: f64,
    pub adversary_decay: f64,
    pub step_penalty: f64,
    /// Growth of the patience multiplier per agent step without a pellet.
    /// Zero disables it.
    pub patience_rate: f64,
}

impl Weights {
    fn patience(&self, steps_since_pellet: u32) -> f64 {
        1.0 + self.patience_rate * steps_since_pellet as f64
    }
}

/// The five contributions of one evaluation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Terms {
    pub capture: f64,
    pub collision: f64,
    pub pellet_proximity: f64,
    pub adversary_proximity: f64,
    pub steps: f64,
}

impl Terms {
    pub fn total(&self) -> f64 {
        self.capture + self.collision + self.pellet_proximity + self.adversary_proximity + self.steps
    }
}

#[derive(Clone, Copy)]
pub struct Evaluator<'g> {
    paths: PathFinder<'g>,
    weights: Weights,
}

impl<'g> Evaluator<'g> {
    pub fn new(graph: &'g MazeGraph, profile: Profile) -> Self {
        Self::with_weights(graph, profile.weights())
    }

    pub fn with_weights(graph: &'g MazeGraph, weights: Weights) -> Self {
        Evaluator {
            paths: PathFinder::new(graph),
            weights,
        }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// Pellet capture and collision only.
    pub fn resolve_events(&self, state: &mut GameState) -> f64 {
        self.capture(state) + self.collision(state)
    }

    pub fn evaluate(&self, state: &mut GameState) -> f64 {
        self.breakdown(state).total()
    }

    pub fn breakdown(&self, state: &mut GameState) -> Terms {
        let capture = self.capture(state);
        let collision = self.collision(state);
        Terms {
            capture,
            collision,
            pellet_proximity: self.pellet_proximity(state),
            adversary_proximity: self.adversary_proximity(state),
            steps: self.step_cost(state),
        }
    }

    fn capture(&self, state: &mut GameState) -> f64 {
        let remaining = state.pellets().len();
        if remaining == 0 {
            return 0.0;
        }
        let patience = self.weights.patience(state.steps_since_pellet);
        let agent = state.agent();
        if state.take_pellet(agent) {
            self.weights.pellet_reward * patience / remaining as f64
        } else {
            0.0
        }
    }

    /// Charged once, on the transition into `dead`.
    fn collision(&self, state: &mut GameState) -> f64 {
        if state.dead || !state.agent_caught() {
            return 0.0;
        }
        state.dead = true;
        -self.weights.death_penalty
    }

    fn pellet_proximity(&self, state: &GameState) -> f64 {
        let patience = self.weights.patience(state.steps_since_pellet);
        state
            .pellets()
            .iter()
            .filter_map(|&p| self.paths.distance(state.agent(), p))
            .map(|d| self.weights.pellet_pull * patience * decay(d, self.weights.pellet_decay))
            .sum()
    }

    fn adversary_proximity(&self, state: &GameState) -> f64 {
        let patience = self.weights.patience(state.steps_since_pellet);
        let pressure: f64 = state
            .adversaries()
            .iter()
            .filter_map(|&a| self.paths.distance(state.agent(), a))
            .map(|d| self.weights.adversary_push * patience * decay(d, self.weights.adversary_decay))
            .sum();
        -pressure
    }

    fn step_cost(&self, state: &GameState) -> f64 {
        if state.mover() != Mover::Agent {
            return 0.0;
        }
        -self.weights.step_penalty * state.steps_since_pellet as f64
    }
}

fn decay(distance: u32, exponent: f64) -> f64 {
    (distance as f64 + 1.0).powf(-exponent)
}
