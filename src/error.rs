use std::io;

use thiserror::Error;

use crate::geometry::Pos;

#[derive(Debug, Error)]
pub enum GameError {
    /// Quadrants tile the whole board, so this means the position was never on it.
    #[error("position {0} is not inside any quadrant")]
    NoQuadrant(Pos),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}
