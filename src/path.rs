//! A* shortest paths over a [`MazeGraph`].
//!
//! All bookkeeping (open heap, g-costs, parents, closed flags) belongs to the
//! query, never to the graph, so one `PathFinder` can serve any number of
//! concurrent or nested queries.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::trace;

use crate::maze::{MazeGraph, NodeId, Pos};

#[derive(Clone, Copy)]
pub struct PathFinder<'g> {
    graph: &'g MazeGraph,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g MazeGraph) -> Self {
        PathFinder { graph }
    }

    /// Shortest route from `start` to `goal`, both inclusive. `None` when the
    /// goal cannot be reached or either end is not a graph node.
    pub fn path(&self, start: Pos, goal: Pos) -> Option<Vec<Pos>> {
        let (start_id, goal_id) = match (self.graph.node_id(start), self.graph.node_id(goal)) {
            (Some(s), Some(g)) => (s, g),
            _ => {
                trace!("path query off the graph: {:?} -> {:?}", start, goal);
                return None;
            }
        };

        let n = self.graph.len();
        let mut g_cost: Vec<Option<u32>> = vec![None; n];
        let mut parent: Vec<Option<NodeId>> = vec![None; n];
        let mut closed = vec![false; n];
        // (f, insertion sequence, g, node): equal f pops in insertion order.
        let mut open = BinaryHeap::new();
        let mut seq = 0u64;

        g_cost[start_id] = Some(0);
        open.push(Reverse((start.manhattan(goal), seq, 0u32, start_id)));

        while let Some(Reverse((_, _, g, current))) = open.pop() {
            if closed[current] || g_cost[current] != Some(g) {
                continue;
            }
            closed[current] = true;

            if current == goal_id {
                return Some(self.reconstruct(&parent, start_id, goal_id));
            }

            for &next in &self.graph.node(current).neighbors {
                let tentative = g + 1;
                let better = match g_cost[next] {
                    None => true,
                    Some(known) => tentative < known,
                };
                if !better {
                    continue;
                }
                // Relaxing a closed node reopens it.
                closed[next] = false;
                g_cost[next] = Some(tentative);
                parent[next] = Some(current);
                seq += 1;
                let h = self.graph.node(next).pos.manhattan(goal);
                open.push(Reverse((tentative + h, seq, tentative, next)));
            }
        }

        trace!("no path: {:?} -> {:?}", start, goal);
        None
    }

    /// Number of steps on the shortest route, `None` when unreachable.
    pub fn distance(&self, start: Pos, goal: Pos) -> Option<u32> {
        self.path(start, goal).map(|p| (p.len() - 1) as u32)
    }

    fn reconstruct(&self, parent: &[Option<NodeId>], start: NodeId, goal: NodeId) -> Vec<Pos> {
        let mut path = vec![self.graph.node(goal).pos];
        let mut current = goal;
        while current != start {
            match parent[current] {
                Some(p) => {
                    current = p;
                    path.push(self.graph.node(current).pos);
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}
