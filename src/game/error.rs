use thiserror::Error;

/// Errors raised by the game layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// The agent supplied something other than a one-hot vector over 3 slots
    #[error("invalid action {values:?}: expected a one-hot vector of length 3")]
    InvalidAction { values: Vec<f32> },

    /// No free cell is left to place food on
    #[error("no free cell left for food")]
    BoardFull,

    /// Board dimensions cannot host a snake
    #[error("invalid board: {0}")]
    InvalidBoard(String),
}
