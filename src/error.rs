use thiserror::Error;

use crate::maze::Pos;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("maze grid is empty")]
    EmptyGrid,

    #[error("maze row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("unknown wall code {code} at ({x}, {y})")]
    UnknownWallCode { code: u8, x: usize, y: usize },

    #[error("origin cell is enclosed; no traversal can start")]
    EnclosedOrigin,

    #[error("position ({}, {}) is not part of the maze graph", .0.x, .0.y)]
    UnknownCell(Pos),

    #[error("mover at ({}, {}) has no legal moves", .0.x, .0.y)]
    NoLegalMoves(Pos),

    #[error("rationality must be within [0, 1], got {0}")]
    InvalidRationality(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
