pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod render;
pub mod snake;
pub mod term;

pub use error::GameError;
pub use game::{Game, Phase, Summary};
