//! Movement graph built from a grid of per-cell wall codes.

use std::collections::{HashMap, VecDeque};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Pos { x, y }
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        (self.x.abs_diff(other.x) + self.y.abs_diff(other.y)) as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Left,
    Right,
    Up,
    Down,
}

impl Dir {
    /// Adjacency order of every node. Search tie-breaking depends on it.
    pub const ORDER: [Dir; 4] = [Dir::Left, Dir::Right, Dir::Up, Dir::Down];

    fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// Which edges of a cell are blocked. Only the top and right edges are
/// recorded; a cell's left and bottom edges belong to its neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WallCode {
    #[default]
    Open,
    Top,
    Right,
    Both,
}

impl WallCode {
    pub fn blocks_top(self) -> bool {
        matches!(self, WallCode::Top | WallCode::Both)
    }

    pub fn blocks_right(self) -> bool {
        matches!(self, WallCode::Right | WallCode::Both)
    }
}

impl TryFrom<u8> for WallCode {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, u8> {
        match code {
            0 => Ok(WallCode::Open),
            1 => Ok(WallCode::Top),
            2 => Ok(WallCode::Right),
            3 => Ok(WallCode::Both),
            other => Err(other),
        }
    }
}

pub type NodeId = usize;

#[derive(Clone, Debug)]
pub struct Node {
    pub pos: Pos,
    pub neighbors: Vec<NodeId>,
}

/// Undirected movement graph over every cell reachable from the origin.
#[derive(Clone, Debug)]
pub struct MazeGraph {
    width: usize,
    height: usize,
    walls: Vec<Vec<WallCode>>,
    nodes: Vec<Node>,
    index: HashMap<Pos, NodeId>,
}

impl MazeGraph {
    /// Builds the graph from raw numeric codes (`0` open, `1` top, `2` right, `3` both).
    pub fn from_codes(rows: &[Vec<u8>]) -> Result<Self> {
        let mut walls = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let mut parsed = Vec::with_capacity(row.len());
            for (x, &code) in row.iter().enumerate() {
                let wall = WallCode::try_from(code)
                    .map_err(|code| Error::UnknownWallCode { code, x, y })?;
                parsed.push(wall);
            }
            walls.push(parsed);
        }
        Self::new(walls)
    }

    pub fn new(walls: Vec<Vec<WallCode>>) -> Result<Self> {
        let height = walls.len();
        let width = walls.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(Error::EmptyGrid);
        }
        for (row, cells) in walls.iter().enumerate() {
            if cells.len() != width {
                return Err(Error::RaggedRow {
                    row,
                    expected: width,
                    got: cells.len(),
                });
            }
        }

        let mut graph = MazeGraph {
            width,
            height,
            walls,
            nodes: Vec::new(),
            index: HashMap::new(),
        };

        let origin = Pos::new(0, 0);
        if graph.open_moves(origin).next().is_none() {
            return Err(Error::EnclosedOrigin);
        }

        let mut q = VecDeque::new();
        graph.insert(origin);
        q.push_back(origin);
        while let Some(pos) = q.pop_front() {
            let next: Vec<Pos> = graph.open_moves(pos).collect();
            for npos in next {
                if !graph.index.contains_key(&npos) {
                    graph.insert(npos);
                    q.push_back(npos);
                }
            }
        }

        for id in 0..graph.nodes.len() {
            let pos = graph.nodes[id].pos;
            let neighbors: Vec<NodeId> = graph
                .open_moves(pos)
                .map(|npos| graph.index[&npos])
                .collect();
            graph.nodes[id].neighbors = neighbors;
        }

        Ok(graph)
    }

    fn insert(&mut self, pos: Pos) {
        self.index.insert(pos, self.nodes.len());
        self.nodes.push(Node {
            pos,
            neighbors: Vec::new(),
        });
    }

    /// Open steps out of `pos`, in adjacency order.
    fn open_moves(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        Dir::ORDER
            .into_iter()
            .filter(move |&dir| self.can_move(pos, dir))
            .map(move |dir| step(pos, dir))
    }

    fn can_move(&self, pos: Pos, dir: Dir) -> bool {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx;
        let ny = pos.y as isize + dy;
        if nx < 0 || ny < 0 {
            return false;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        if nx >= self.width || ny >= self.height {
            return false;
        }
        match dir {
            Dir::Left => !self.walls[ny][nx].blocks_right(),
            Dir::Right => !self.walls[pos.y][pos.x].blocks_right(),
            Dir::Up => !self.walls[pos.y][pos.x].blocks_top(),
            Dir::Down => !self.walls[ny][nx].blocks_top(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index.contains_key(&pos)
    }

    pub fn node_id(&self, pos: Pos) -> Option<NodeId> {
        self.index.get(&pos).copied()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.nodes.iter().map(|n| n.pos)
    }

    /// Adjacent positions of `pos` in left, right, up, down order. Empty when
    /// `pos` is not a node.
    pub fn neighbors(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        self.index
            .get(&pos)
            .into_iter()
            .flat_map(move |&id| self.nodes[id].neighbors.iter())
            .map(move |&n| self.nodes[n].pos)
    }

    pub fn walls_at(&self, pos: Pos) -> Option<WallCode> {
        self.walls.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }
}

fn step(pos: Pos, dir: Dir) -> Pos {
    let (dx, dy) = dir.delta();
    Pos {
        x: (pos.x as isize + dx) as usize,
        y: (pos.y as isize + dy) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(w: usize, h: usize) -> MazeGraph {
        MazeGraph::from_codes(&vec![vec![0u8; w]; h]).unwrap()
    }

    #[test]
    fn open_grid_has_every_cell() {
        let g = open(4, 3);
        assert_eq!(g.len(), 12);
        assert!(g.positions().all(|p| g.neighbors(p).count() >= 2));
    }

    #[test]
    fn adjacency_is_left_right_up_down() {
        let g = open(3, 3);
        let order: Vec<Pos> = g.neighbors(Pos::new(1, 1)).collect();
        assert_eq!(
            order,
            vec![Pos::new(0, 1), Pos::new(2, 1), Pos::new(1, 0), Pos::new(1, 2)]
        );
    }

    #[test]
    fn right_wall_blocks_both_directions() {
        let g = MazeGraph::from_codes(&[vec![2, 0], vec![0, 0]]).unwrap();
        assert!(!g.neighbors(Pos::new(0, 0)).any(|p| p == Pos::new(1, 0)));
        assert!(!g.neighbors(Pos::new(1, 0)).any(|p| p == Pos::new(0, 0)));
        assert!(g.neighbors(Pos::new(0, 1)).any(|p| p == Pos::new(1, 1)));
    }

    #[test]
    fn top_wall_blocks_cell_above() {
        let g = MazeGraph::from_codes(&[vec![0, 0], vec![1, 0]]).unwrap();
        assert!(!g.neighbors(Pos::new(0, 0)).any(|p| p == Pos::new(0, 1)));
        assert!(!g.neighbors(Pos::new(0, 1)).any(|p| p == Pos::new(0, 0)));
    }

    #[test]
    fn unreachable_cells_are_not_nodes() {
        // (2, 0) is sealed off by the right wall of (1, 0) and the top wall of (2, 1).
        let g = MazeGraph::from_codes(&[vec![0, 2, 0], vec![0, 0, 1]]).unwrap();
        assert!(!g.contains(Pos::new(2, 0)));
        assert_eq!(g.len(), 5);
    }

    #[test]
    fn enclosed_origin_is_rejected() {
        let err = MazeGraph::from_codes(&[vec![2, 0], vec![1, 0]]).unwrap_err();
        assert_eq!(err, Error::EnclosedOrigin);
    }

    #[test]
    fn malformed_grids_are_rejected() {
        assert_eq!(MazeGraph::from_codes(&[]).unwrap_err(), Error::EmptyGrid);
        assert_eq!(
            MazeGraph::from_codes(&[vec![0, 0], vec![0]]).unwrap_err(),
            Error::RaggedRow {
                row: 1,
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            MazeGraph::from_codes(&[vec![0, 7]]).unwrap_err(),
            Error::UnknownWallCode { code: 7, x: 1, y: 0 }
        );
    }
}
