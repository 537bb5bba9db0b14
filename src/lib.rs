//! Grid snake on a 21x21 board.
//!
//! The [`engine`] runs the game on its own and knows nothing about windows or
//! files: a host feeds it frame time through [`Game::advance`], routes player
//! input through [`input`], persists scores through a [`records::ScoreStore`]
//! and draws [`engine::Snapshot`]s with [`render`].

pub mod engine;
pub mod grid;
pub mod input;
pub mod records;
pub mod render;
pub mod settings;
pub mod snake;

pub use engine::{Collision, Game, GameConfig, GamePhase, Snapshot, Speed, StepOutcome};
pub use grid::{Cell, Direction, GRID_SIZE};
pub use records::{FileStorage, MemoryStorage, Record, ScoreStore, Scoreboard};
pub use snake::Snake;
