use log::{debug, info};
use rand::Rng;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::eval::Evaluator;
use crate::maze::{MazeGraph, Pos};
use crate::path::PathFinder;
use crate::search::{Search, SearchStats};
use crate::state::{GameState, Outcome};

#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// The chosen successor; apply it and call again next round.
    Next(GameState),
    /// The state handed in was already terminal.
    Finished(Outcome),
}

/// Owns the maze and the session settings; answers one move per call.
pub struct Engine {
    graph: MazeGraph,
    config: SessionConfig,
    stats: SearchStats,
}

impl Engine {
    pub fn new(graph: MazeGraph, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Engine {
            graph,
            config,
            stats: SearchStats::default(),
        })
    }

    pub fn from_codes(rows: &[Vec<u8>], config: SessionConfig) -> Result<Self> {
        Self::new(MazeGraph::from_codes(rows)?, config)
    }

    pub fn graph(&self) -> &MazeGraph {
        &self.graph
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Runs one search for whoever is to move in `state`.
    pub fn decide<R: Rng + ?Sized>(&mut self, state: &GameState, rng: &mut R) -> Result<Decision> {
        if let Some(outcome) = state.outcome() {
            info!("game over after {} steps: {:?}", state.steps(), outcome);
            return Ok(Decision::Finished(outcome));
        }

        let evaluator = Evaluator::new(&self.graph, self.config.profile);
        let search = Search::new(&self.graph, evaluator);
        let mut stats = SearchStats::default();
        let next = search.choose(
            state,
            self.config.depth,
            self.config.rationality,
            rng,
            &mut stats,
        )?;
        debug!(
            "turn {} moved {:?} -> {:?} (weight {:.3}, {} nodes, {} leaves)",
            state.turn(),
            state.mover_pos(),
            next.position_of(state.mover()),
            next.weight,
            stats.nodes,
            stats.leaves
        );
        self.stats = stats;
        Ok(Decision::Next(next))
    }

    pub fn shortest_path_length(&self, a: Pos, b: Pos) -> Option<u32> {
        PathFinder::new(&self.graph).distance(a, b)
    }

    pub fn path(&self, a: Pos, b: Pos) -> Option<Vec<Pos>> {
        PathFinder::new(&self.graph).path(a, b)
    }

    /// Statistics of the most recent [`Engine::decide`] search.
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }
}
