//! Agent hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Q-learning agent
///
/// # Example
///
/// ```rust
/// use snake_qlearn::rl::AgentConfig;
///
/// let config = AgentConfig {
///     batch_size: 64,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Replay memory capacity
    ///
    /// Default: 100_000
    pub max_memory: usize,

    /// Transitions sampled for each long-memory update
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Learning rate for the Adam optimizer
    ///
    /// Default: 0.001
    pub learning_rate: f64,

    /// Discount factor for future rewards
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Width of the hidden layer
    ///
    /// Default: 256
    pub hidden_size: usize,

    /// Exploration threshold before the first game.
    /// Epsilon is `epsilon_start - games_played` and may go negative.
    ///
    /// Default: 80
    pub epsilon_start: i64,

    /// Upper bound (inclusive) of the uniform draw compared against epsilon
    ///
    /// Default: 200
    pub epsilon_range: i64,

    /// Seed for exploration and replay sampling
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Validate configuration parameters
    ///
    /// `Ok(())` if all parameters are in range, `Err(String)` describing the first
    /// problem otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_memory == 0 {
            return Err("max_memory must be at least 1".to_string());
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(self.gamma > 0.0 && self.gamma < 1.0) {
            return Err(format!("gamma must be in (0, 1), got {}", self.gamma));
        }

        if self.hidden_size == 0 {
            return Err("hidden_size must be at least 1".to_string());
        }

        if self.epsilon_range <= 0 {
            return Err(format!(
                "epsilon_range must be positive, got {}",
                self.epsilon_range
            ));
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_memory: 100_000,
            batch_size: 1000,
            learning_rate: 0.001,
            gamma: 0.9,
            hidden_size: 256,
            epsilon_start: 80,
            epsilon_range: 200,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.max_memory, 100_000);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.hidden_size, 256);
        assert_eq!(config.epsilon_start, 80);
        assert_eq!(config.epsilon_range, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_negative_learning_rate() {
        let mut config = AgentConfig::default();
        config.learning_rate = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_gamma_out_of_range() {
        let mut config = AgentConfig::default();
        config.gamma = 1.5;
        assert!(config.validate().is_err());

        config.gamma = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_gamma_bounds_exclusive() {
        let mut config = AgentConfig::default();
        config.gamma = 0.0;
        assert!(config.validate().is_err());

        config.gamma = 1.0;
        assert!(config.validate().is_err());

        config.gamma = 0.99;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_sizes() {
        let mut config = AgentConfig::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = AgentConfig::default();
        config.max_memory = 0;
        assert!(config.validate().is_err());

        let mut config = AgentConfig::default();
        config.hidden_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_epsilon_start_is_allowed() {
        let config = AgentConfig {
            epsilon_start: -5,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = AgentConfig {
            seed: Some(42),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: AgentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
