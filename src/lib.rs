//! Move-decision engine for a maze chase: an A* distance oracle feeding a
//! depth-limited adversarial search that picks, each round, the next cell for
//! the pursued agent and for every pursuing adversary.

pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod maze;
pub mod path;
pub mod search;
pub mod state;

pub use config::SessionConfig;
pub use engine::{Decision, Engine};
pub use error::{Error, Result};
pub use eval::{Evaluator, Profile, Terms, Weights};
pub use maze::{MazeGraph, Pos, WallCode};
pub use path::PathFinder;
pub use search::{choose_maximizer, choose_minimizer, Search, SearchStats};
pub use state::{GameState, Mover, Outcome};
