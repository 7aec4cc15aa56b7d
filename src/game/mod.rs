//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It is driven by the keyboard in human mode and by the agent during training.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction, Turn, ACTION_SIZE, CLOCKWISE};
pub use config::GameConfig;
pub use engine::{EndReason, GameEngine, StepInfo, StepResult};
pub use error::GameError;
pub use state::{GameState, Position, Snake};
