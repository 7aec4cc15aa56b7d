//! Epsilon-greedy Q-learning agent
//!
//! The agent closes the loop between the environment and the trainer:
//! encode the state, pick an action, step, train on that single transition,
//! store it, and on episode end reset and train on a replay sample.

use anyhow::{Context, Result, anyhow};
use burn::{module::AutodiffModule, tensor::backend::AutodiffBackend};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use super::config::AgentConfig;
use super::environment::SnakeEnvironment;
use super::memory::{ActionVector, ReplayMemory, Transition, argmax};
use super::network::{LinearQNet, LinearQNetConfig};
use super::observation::{StateVector, encode_state};
use super::trainer::QTrainer;
use crate::game::ACTION_SIZE;

/// Outcome of a single agent step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentStep {
    pub reward: f32,
    pub done: bool,
    pub score: u32,
    /// Loss of the single-transition update
    pub loss: f32,
    /// Loss of the replay-memory update run when the game ended
    pub replay_loss: Option<f32>,
}

pub struct Agent<B: AutodiffBackend> {
    trainer: QTrainer<B>,
    memory: ReplayMemory,
    config: AgentConfig,
    games_played: u32,
    rng: StdRng,
}

impl<B: AutodiffBackend> Agent<B> {
    /// Create an agent with a freshly initialized network
    pub fn new(config: AgentConfig, device: B::Device) -> Result<Self> {
        let model = LinearQNetConfig::new(config.hidden_size).init::<B>(&device);
        Self::from_model(model, config, 0, device)
    }

    /// Create an agent around existing weights, e.g. a loaded checkpoint
    pub fn from_model(
        model: LinearQNet<B>,
        config: AgentConfig,
        games_played: u32,
        device: B::Device,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("invalid agent configuration: {e}"))?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            trainer: QTrainer::new(model, config.learning_rate, config.gamma, device),
            memory: ReplayMemory::new(config.max_memory),
            config,
            games_played,
            rng,
        })
    }

    /// Encode the environment's current state
    pub fn get_state(&self, env: &SnakeEnvironment) -> StateVector {
        encode_state(env.state())
    }

    /// Exploration threshold; shrinks by one per game and is not floored
    pub fn epsilon(&self) -> i64 {
        self.config.epsilon_start - i64::from(self.games_played)
    }

    /// Pick a one-hot action: random with probability tied to epsilon,
    /// otherwise the argmax of the predicted Q-values.
    pub fn get_action(&mut self, state: &StateVector) -> Result<ActionVector> {
        let explore = self.rng.gen_range(0..=self.config.epsilon_range) < self.epsilon();

        let idx = if explore {
            self.rng.gen_range(0..ACTION_SIZE)
        } else {
            let q_values = self
                .trainer
                .model()
                .clone()
                .valid()
                .predict(state, self.trainer.device())
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow!("failed to read Q-values: {e:?}"))?;
            argmax(&q_values)
        };

        let mut action = [0.0; ACTION_SIZE];
        action[idx] = 1.0;
        Ok(action)
    }

    /// Store a transition in replay memory
    pub fn remember(&mut self, transition: Transition) {
        self.memory.push(transition);
    }

    /// Train on the transition just observed
    pub fn train_short_memory(&mut self, transition: &Transition) -> Result<f32> {
        self.trainer.train_step(std::slice::from_ref(transition))
    }

    /// Train on up to `batch_size` transitions drawn from replay memory
    pub fn train_long_memory(&mut self) -> Result<f32> {
        let batch = self.memory.sample(self.config.batch_size, &mut self.rng);
        let loss = self.trainer.train_step(&batch)?;
        debug!(batch = batch.len(), loss, "long memory update");
        Ok(loss)
    }

    /// Run one frame of the learning loop against `env`.
    ///
    /// On episode end the environment is reset, the game counter advances and
    /// a long-memory update runs before returning.
    pub fn play_step(&mut self, env: &mut SnakeEnvironment) -> Result<AgentStep> {
        let state = self.get_state(env);
        let action = self.get_action(&state)?;
        let (reward, done, score) = env.step(&action).context("environment step failed")?;
        let next_state = self.get_state(env);

        let transition = Transition::new(state, action, reward, next_state, done);
        let loss = self.train_short_memory(&transition)?;
        self.remember(transition);

        let replay_loss = if done {
            env.reset().context("failed to reset environment")?;
            self.games_played += 1;
            Some(self.train_long_memory()?)
        } else {
            None
        };

        Ok(AgentStep {
            reward,
            done,
            score,
            loss,
            replay_loss,
        })
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn model(&self) -> &LinearQNet<B> {
        self.trainer.model()
    }

    pub fn memory(&self) -> &ReplayMemory {
        &self.memory
    }
}
