use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board width in pixels
    pub width: i32,
    /// Board height in pixels
    pub height: i32,
    /// Edge length of one cell in pixels
    pub block_size: i32,

    /// Reward for eating food
    pub food_reward: f32,
    /// Reward for a collision or a stall
    pub death_penalty: f32,
    /// End the episode once `frame_count > stall_factor * snake length`.
    /// `None` disables the guard (human play).
    pub stall_factor: Option<u32>,

    /// Seed for food placement; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block_size: 20,
            food_reward: 10.0,
            death_penalty: -10.0,
            stall_factor: Some(100),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom board size in pixels
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Board suited for keyboard play: no stall guard
    pub fn human() -> Self {
        Self {
            stall_factor: None,
            ..Default::default()
        }
    }

    /// Create a small board for testing (10x10 cells)
    pub fn small() -> Self {
        Self::new(200, 200)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cell columns
    pub fn columns(&self) -> i32 {
        self.width / self.block_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> i32 {
        self.height / self.block_size
    }

    /// Check the board can host the two-segment starting snake plus food
    pub fn validate(&self) -> Result<(), GameError> {
        if self.block_size <= 0 {
            return Err(GameError::InvalidBoard(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }

        if self.width % self.block_size != 0 || self.height % self.block_size != 0 {
            return Err(GameError::InvalidBoard(format!(
                "{}x{} is not a multiple of block size {}",
                self.width, self.height, self.block_size
            )));
        }

        if self.columns() < 3 || self.rows() < 1 {
            return Err(GameError::InvalidBoard(format!(
                "board of {}x{} cells is too small",
                self.columns(),
                self.rows()
            )));
        }

        Ok(())
    }
}
