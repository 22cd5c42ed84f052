use std::collections::{HashMap, VecDeque};

use hupman::{Engine, MazeGraph, PathFinder, Pos, SessionConfig};
use proptest::prelude::*;

fn bfs_distances(graph: &MazeGraph, start: Pos) -> HashMap<Pos, u32> {
    let mut dist = HashMap::new();
    let mut q = VecDeque::new();
    dist.insert(start, 0);
    q.push_back(start);
    while let Some(pos) = q.pop_front() {
        let base = dist[&pos];
        for next in graph.neighbors(pos) {
            if !dist.contains_key(&next) {
                dist.insert(next, base + 1);
                q.push_back(next);
            }
        }
    }
    dist
}

fn wall_grid() -> impl Strategy<Value = Vec<Vec<u8>>> {
    (1usize..7, 1usize..7).prop_flat_map(|(w, h)| {
        prop::collection::vec(prop::collection::vec(0u8..4, w), h)
    })
}

proptest! {
    #[test]
    fn astar_matches_breadth_first(rows in wall_grid()) {
        let graph = MazeGraph::from_codes(&rows);
        prop_assume!(graph.is_ok());
        let graph = graph.unwrap();
        let pf = PathFinder::new(&graph);
        let cells: Vec<Pos> = graph.positions().collect();
        for &a in &cells {
            let reference = bfs_distances(&graph, a);
            for &b in &cells {
                prop_assert_eq!(pf.distance(a, b), reference.get(&b).copied());
            }
        }
    }

    #[test]
    fn open_grid_distance_is_manhattan(
        w in 1usize..9,
        h in 1usize..9,
        ax in 0usize..9, ay in 0usize..9,
        bx in 0usize..9, by in 0usize..9,
    ) {
        prop_assume!(w * h > 1);
        let engine = Engine::from_codes(&vec![vec![0u8; w]; h], SessionConfig::default()).unwrap();
        let a = Pos::new(ax % w, ay % h);
        let b = Pos::new(bx % w, by % h);
        prop_assert_eq!(engine.shortest_path_length(a, b), Some(a.manhattan(b)));
    }
}

#[test]
fn walled_off_target_is_unreachable() {
    // Column 2 is cut off: (1, y) all carry a right wall and (2, 0) has no other way in.
    let rows: Vec<Vec<u8>> = vec![vec![0, 2, 0], vec![0, 2, 0], vec![0, 2, 0]];
    let graph = MazeGraph::from_codes(&rows).unwrap();
    let pf = PathFinder::new(&graph);
    assert_eq!(pf.path(Pos::new(0, 0), Pos::new(2, 2)), None);
    assert_eq!(pf.distance(Pos::new(0, 0), Pos::new(2, 0)), None);
}

#[test]
fn path_detours_through_the_only_gap() {
    // The walled middle row leaves column 2 as the only way down.
    let rows: Vec<Vec<u8>> = vec![vec![0, 0, 0], vec![3, 3, 0], vec![0, 0, 0]];
    let graph = MazeGraph::from_codes(&rows).unwrap();
    let pf = PathFinder::new(&graph);
    let path = pf.path(Pos::new(0, 0), Pos::new(0, 2)).unwrap();
    assert_eq!(path.first(), Some(&Pos::new(0, 0)));
    assert_eq!(path.last(), Some(&Pos::new(0, 2)));
    for pair in path.windows(2) {
        assert!(graph.neighbors(pair[0]).any(|n| n == pair[1]));
    }
    assert_eq!(path.len() - 1, pf.distance(Pos::new(0, 0), Pos::new(0, 2)).unwrap() as usize);
}

#[test]
fn engine_path_agrees_with_its_length() {
    let rows: Vec<Vec<u8>> = vec![vec![0, 2, 0], vec![0, 2, 0], vec![0, 0, 0]];
    let engine = Engine::from_codes(&rows, SessionConfig::default()).unwrap();
    let (a, b) = (Pos::new(0, 0), Pos::new(2, 0));
    let path = engine.path(a, b).unwrap();
    assert_eq!(path.first(), Some(&a));
    assert_eq!(path.last(), Some(&b));
    assert_eq!(path.len() - 1, engine.shortest_path_length(a, b).unwrap() as usize);
    assert_eq!(path.len(), 7);
    assert_eq!(engine.path(a, Pos::new(5, 5)), None);
}
