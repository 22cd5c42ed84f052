//! Depth-limited adversarial search.
//!
//! The agent maximizes, every adversary minimizes. Depth counts plies: each
//! individual move of any mover consumes one unit.

use rand::Rng;

use crate::error::{Error, Result};
use crate::eval::Evaluator;
use crate::maze::MazeGraph;
use crate::state::{GameState, Mover};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Child states derived.
    pub nodes: u64,
    /// States scored with the full evaluation.
    pub leaves: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Plan {
    /// Probability that a simulated adversary plays its lowest-weight move.
    rationality: f64,
}

pub struct Search<'g> {
    graph: &'g MazeGraph,
    evaluator: Evaluator<'g>,
}

impl<'g> Search<'g> {
    pub fn new(graph: &'g MazeGraph, evaluator: Evaluator<'g>) -> Self {
        Search { graph, evaluator }
    }

    /// Picks the successor of `state` for whoever is to move. The agent plans
    /// against fully rational adversaries. At `depth == 0` the result is
    /// `state` itself, weighted by a full evaluation.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        depth: u32,
        rationality: f64,
        rng: &mut R,
        stats: &mut SearchStats,
    ) -> Result<GameState> {
        if depth == 0 {
            stats.leaves += 1;
            let mut leaf = state.clone();
            leaf.weight = self.evaluator.evaluate(&mut leaf);
            return Ok(leaf);
        }

        let plan = match state.mover() {
            Mover::Agent => Plan { rationality: 1.0 },
            Mover::Adversary(_) => Plan { rationality },
        };
        let mut children = self.children(state, depth, plan, rng, stats)?;
        let weights: Vec<f64> = children.iter().map(|c| c.weight).collect();
        let idx = match state.mover() {
            Mover::Agent => choose_maximizer(&weights),
            Mover::Adversary(_) => choose_minimizer(&weights, rationality, rng),
        }
        .ok_or(Error::NoLegalMoves(state.mover_pos()))?;
        Ok(children.swap_remove(idx))
    }

    fn score<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        depth: u32,
        plan: Plan,
        rng: &mut R,
        stats: &mut SearchStats,
    ) -> Result<f64> {
        if depth == 0 || state.is_terminal() {
            stats.leaves += 1;
            let mut leaf = state.clone();
            return Ok(self.evaluator.evaluate(&mut leaf));
        }

        let children = self.children(state, depth, plan, rng, stats)?;
        let weights: Vec<f64> = children.iter().map(|c| c.weight).collect();
        let idx = match state.mover() {
            Mover::Agent => choose_maximizer(&weights),
            Mover::Adversary(_) => choose_minimizer(&weights, plan.rationality, rng),
        }
        .ok_or(Error::NoLegalMoves(state.mover_pos()))?;
        Ok(weights[idx])
    }

    fn children<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        depth: u32,
        plan: Plan,
        rng: &mut R,
        stats: &mut SearchStats,
    ) -> Result<Vec<GameState>> {
        let from = state.mover_pos();
        if !self.graph.contains(from) {
            return Err(Error::UnknownCell(from));
        }

        let mut children = Vec::with_capacity(4);
        for to in self.graph.neighbors(from) {
            stats.nodes += 1;
            let mut child = state.advance(to);
            let events = self.evaluator.resolve_events(&mut child);
            let rest = self.score(&child, depth - 1, plan, rng, stats)?;
            child.weight = events + rest;
            children.push(child);
        }

        if children.is_empty() {
            return Err(Error::NoLegalMoves(from));
        }
        Ok(children)
    }
}

/// Index of the strictly greatest weight; the first one wins ties.
pub fn choose_maximizer(weights: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &w) in weights.iter().enumerate() {
        match best {
            Some(b) if w <= weights[b] => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Index picked by an adversary of the given rationality.
///
/// With probability `rationality` the lowest weight (first one on ties),
/// otherwise a uniform draw over all `n` weights, so the lowest comes out
/// with probability `rationality + (1 - rationality) / n`.
pub fn choose_minimizer<R: Rng + ?Sized>(
    weights: &[f64],
    rationality: f64,
    rng: &mut R,
) -> Option<usize> {
    let mut lowest: Option<usize> = None;
    for (i, &w) in weights.iter().enumerate() {
        match lowest {
            Some(l) if w >= weights[l] => {}
            _ => lowest = Some(i),
        }
    }
    let lowest = lowest?;
    if weights.len() == 1 || rng.gen::<f64>() < rationality {
        Some(lowest)
    } else {
        Some(rng.gen_range(0..weights.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Profile;
    use crate::maze::Pos;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open(w: usize, h: usize) -> MazeGraph {
        MazeGraph::from_codes(&vec![vec![0u8; w]; h]).unwrap()
    }

    #[test]
    fn maximizer_keeps_first_of_equal_weights() {
        assert_eq!(choose_maximizer(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(choose_maximizer(&[]), None);
    }

    #[test]
    fn rational_minimizer_keeps_first_of_equal_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(choose_minimizer(&[2.0, -1.0, -1.0], 1.0, &mut rng), Some(1));
        assert_eq!(choose_minimizer(&[], 1.0, &mut rng), None);
    }

    #[test]
    fn depth_zero_scores_the_state_itself() {
        let g = open(5, 5);
        let ev = Evaluator::new(&g, Profile::Steady);
        let search = Search::new(&g, ev);
        let state = GameState::new(Pos::new(0, 0), vec![Pos::new(4, 4)], vec![Pos::new(2, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut stats = SearchStats::default();
        let out = search.choose(&state, 0, 1.0, &mut rng, &mut stats).unwrap();

        let mut expected = state.clone();
        let total = ev.evaluate(&mut expected);
        assert_eq!(out.agent(), state.agent());
        assert_eq!(out.weight, total);
        assert_eq!(stats, SearchStats { nodes: 0, leaves: 1 });
    }

    #[test]
    fn agent_steps_away_from_adjacent_adversary() {
        // Corridor: adversary at the left end, agent next to it, pellet far right.
        let g = open(6, 1);
        let ev = Evaluator::new(&g, Profile::Steady);
        let search = Search::new(&g, ev);
        let state = GameState::new(Pos::new(1, 0), vec![Pos::new(0, 0)], vec![Pos::new(5, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut stats = SearchStats::default();
        let out = search.choose(&state, 2, 0.5, &mut rng, &mut stats).unwrap();
        assert_eq!(out.agent(), Pos::new(2, 0));
        assert!(!out.is_dead());
        assert!(stats.nodes > 0);
    }

    #[test]
    fn rational_adversary_closes_in() {
        let g = open(6, 1);
        let ev = Evaluator::new(&g, Profile::Steady);
        let search = Search::new(&g, ev);
        let state = GameState::new(Pos::new(3, 0), vec![Pos::new(1, 0)], vec![Pos::new(5, 0)])
            .advance(Pos::new(3, 0));
        assert_eq!(state.mover(), Mover::Adversary(0));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut stats = SearchStats::default();
        let out = search.choose(&state, 1, 1.0, &mut rng, &mut stats).unwrap();
        assert_eq!(out.adversaries(), &[Pos::new(2, 0)]);
        assert_eq!(out.mover(), Mover::Agent);
    }

    #[test]
    fn dead_subtrees_are_not_expanded() {
        let g = open(3, 1);
        let ev = Evaluator::new(&g, Profile::Steady);
        let search = Search::new(&g, ev);
        // Agent boxed between the wall and an adversary: moving right is death.
        let state = GameState::new(Pos::new(0, 0), vec![Pos::new(1, 0)], vec![Pos::new(2, 0)]);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut stats = SearchStats::default();
        let out = search.choose(&state, 4, 1.0, &mut rng, &mut stats).unwrap();
        assert!(out.is_dead());
        assert_eq!(stats.nodes, 1);
        assert_eq!(stats.leaves, 1);
    }
}
