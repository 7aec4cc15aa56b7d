//! Headless training mode
//!
//! Runs the Q-learning loop without a display. Every finished game prints
//! `Game <n> Score <s> Best Score <b>` to stdout; a new best score overwrites
//! the model snapshot. Training runs until the episode limit, if any, or until
//! the process is interrupted.
//!
//! # Example
//!
//! ```rust,no_run
//! use snake_qlearn::modes::{TrainConfig, TrainMode};
//! use snake_qlearn::rl::{TrainingBackend, default_device};
//! use std::path::PathBuf;
//!
//! let mut config = TrainConfig::new(PathBuf::from("snake_models"));
//! config.episodes = Some(500);
//!
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device())?;
//! train_mode.run()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{Agent, AgentConfig, SnakeEnvironment, resume_agent, save_model};

/// File name of the model snapshot inside the model directory
pub const MODEL_FILE_NAME: &str = "model.mpk";

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Games to play in this run; `None` trains until interrupted
    pub episodes: Option<usize>,

    /// Where the best model is written
    pub model_path: PathBuf,

    /// Continue from the snapshot at `model_path` if it exists
    pub resume: bool,

    /// Log a statistics summary every N games
    pub log_frequency: usize,

    /// Board size, rewards and stall guard
    pub game_config: GameConfig,

    /// Agent hyperparameters
    pub agent_config: AgentConfig,
}

impl TrainConfig {
    /// Defaults with the snapshot stored as `model_dir/model.mpk`
    pub fn new(model_dir: PathBuf) -> Self {
        Self {
            episodes: None,
            model_path: model_dir.join(MODEL_FILE_NAME),
            resume: false,
            log_frequency: 100,
            game_config: GameConfig::default(),
            agent_config: AgentConfig::default(),
        }
    }
}

/// Summary of a finished game
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    /// Games played by the agent, including this one
    pub game: u32,
    pub score: u32,
    pub best_score: u32,
    /// Whether this game set a new best score (and saved the model)
    pub new_best: bool,
    pub mean_score: f32,
}

/// Training loop shared by the headless and the live-view modes
pub struct TrainMode<B: AutodiffBackend> {
    agent: Agent<B>,
    env: SnakeEnvironment,
    stats: TrainingStats,
    config: TrainConfig,
}

impl<B: AutodiffBackend> TrainMode<B> {
    /// Build the agent and environment, resuming from a snapshot if requested
    pub fn new(config: TrainConfig, device: B::Device) -> Result<Self> {
        let env = SnakeEnvironment::new(config.game_config.clone())
            .context("Invalid game configuration")?;

        let (agent, best_score) = if config.resume && config.model_path.exists() {
            let (agent, metadata) = resume_agent::<B>(&config.model_path, device)
                .with_context(|| format!("Failed to resume from {:?}", config.model_path))?;
            info!(
                path = ?config.model_path,
                games_played = metadata.games_played,
                best_score = metadata.best_score,
                "resumed training"
            );
            (agent, metadata.best_score)
        } else {
            if config.resume {
                warn!(path = ?config.model_path, "no snapshot found, starting fresh");
            }
            (Agent::new(config.agent_config.clone(), device)?, 0)
        };

        Ok(Self {
            agent,
            env,
            stats: TrainingStats::new(config.log_frequency.max(1)).with_best_score(best_score),
            config,
        })
    }

    /// Run the headless loop until the episode limit
    pub fn run(&mut self) -> Result<()> {
        self.log_header();

        while !self.is_finished() {
            if let Some(report) = self.step()? {
                println!(
                    "Game {} Score {} Best Score {}",
                    report.game, report.score, report.best_score
                );

                if self.stats.games() % self.config.log_frequency.max(1) == 0 {
                    info!("{}", self.stats.format_summary());
                }
            }
        }

        info!("training complete: {}", self.stats.format_summary());
        Ok(())
    }

    /// Advance one frame; returns a report when the frame ended a game
    pub fn step(&mut self) -> Result<Option<EpisodeReport>> {
        let episode_length = self.env.state().frame_count as usize + 1;
        let step = self.agent.play_step(&mut self.env)?;
        self.stats.record_loss(step.loss);

        if !step.done {
            return Ok(None);
        }

        if let Some(loss) = step.replay_loss {
            self.stats.record_replay_loss(loss);
        }

        let new_best = self.stats.record_episode(step.score, episode_length);
        if new_best {
            self.save_checkpoint()?;
        }

        Ok(Some(EpisodeReport {
            game: self.agent.games_played(),
            score: step.score,
            best_score: self.stats.best_score(),
            new_best,
            mean_score: self.stats.mean_score(),
        }))
    }

    /// Whether the configured number of games has been played
    pub fn is_finished(&self) -> bool {
        self.config
            .episodes
            .is_some_and(|limit| self.stats.games() >= limit)
    }

    fn save_checkpoint(&self) -> Result<()> {
        save_model(&self.agent, self.stats.best_score(), &self.config.model_path)
            .with_context(|| format!("Failed to save model to {:?}", self.config.model_path))?;
        debug!(
            path = ?self.config.model_path,
            best_score = self.stats.best_score(),
            "model saved"
        );
        Ok(())
    }

    fn log_header(&self) {
        let agent = &self.config.agent_config;
        let game = &self.config.game_config;
        info!(
            width = game.width,
            height = game.height,
            block_size = game.block_size,
            "board"
        );
        info!(
            learning_rate = agent.learning_rate,
            gamma = agent.gamma,
            batch_size = agent.batch_size,
            max_memory = agent.max_memory,
            hidden_size = agent.hidden_size,
            "agent"
        );
        match self.config.episodes {
            Some(limit) => info!(episodes = limit, path = ?self.config.model_path, "training"),
            None => info!(path = ?self.config.model_path, "training until interrupted"),
        }
    }

    pub fn env(&self) -> &SnakeEnvironment {
        &self.env
    }

    pub fn agent(&self) -> &Agent<B> {
        &self.agent
    }

    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{TrainingBackend, default_device};
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> TrainConfig {
        let mut config = TrainConfig::new(dir.path().to_path_buf());
        config.game_config = GameConfig::small().with_seed(9);
        config.agent_config = AgentConfig {
            batch_size: 64,
            hidden_size: 32,
            seed: Some(9),
            ..Default::default()
        };
        config
    }

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new(PathBuf::from("snake_models"));
        assert_eq!(config.model_path, PathBuf::from("snake_models/model.mpk"));
        assert_eq!(config.episodes, None);
        assert!(!config.resume);
    }

    #[test]
    fn test_run_fixed_number_of_games() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.episodes = Some(3);

        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();
        train_mode.run().unwrap();

        assert!(train_mode.is_finished());
        assert_eq!(train_mode.stats().games(), 3);
        assert_eq!(train_mode.agent().games_played(), 3);
        assert!(train_mode.stats().total_steps() > 0);
    }

    #[test]
    fn test_step_reports_episode_end() {
        let dir = TempDir::new().unwrap();
        let mut train_mode =
            TrainMode::<TrainingBackend>::new(test_config(&dir), default_device()).unwrap();

        let report = loop {
            if let Some(report) = train_mode.step().unwrap() {
                break report;
            }
        };

        assert_eq!(report.game, 1);
        assert_eq!(report.best_score, train_mode.stats().best_score());
        assert_eq!(report.new_best, report.score > 0);
    }

    #[test]
    fn test_replay_loss_recorded_once_per_game() {
        let dir = TempDir::new().unwrap();
        let mut train_mode =
            TrainMode::<TrainingBackend>::new(test_config(&dir), default_device()).unwrap();

        while train_mode.step().unwrap().is_none() {}

        let stats = train_mode.stats();
        assert!(stats.mean_replay_loss() > 0.0);
        assert!(stats.last_loss().is_some_and(f32::is_finite));
    }

    #[test]
    fn test_new_best_writes_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.agent_config.epsilon_start = 1000;
        let model_path = config.model_path.clone();
        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();

        // Random play until a game scores
        let mut saved = false;
        for _ in 0..200_000 {
            if let Some(report) = train_mode.step().unwrap() {
                if report.new_best {
                    saved = true;
                    break;
                }
            }
        }

        assert!(saved);
        assert!(model_path.exists());
    }

    #[test]
    fn test_resume_without_snapshot_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.resume = true;

        let train_mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();
        assert_eq!(train_mode.agent().games_played(), 0);
        assert_eq!(train_mode.stats().best_score(), 0);
    }
}
