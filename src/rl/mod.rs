//! Reinforcement learning for the Snake game
//!
//! Provides:
//! - 11-feature state encoding (danger, heading, food direction)
//! - One-hot relative-action environment wrapper
//! - Q-network and one-step Q-learning trainer (Adam, MSE)
//! - Bounded replay memory and an epsilon-greedy agent
//! - Model checkpointing

pub mod agent;
pub mod backend;
pub mod config;
pub mod environment;
pub mod memory;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod trainer;

pub use agent::{Agent, AgentStep};
pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use config::AgentConfig;
pub use environment::SnakeEnvironment;
pub use memory::{ActionVector, ReplayMemory, Transition};
pub use network::{LinearQNet, LinearQNetConfig};
pub use observation::{STATE_SIZE, StateVector, encode_state};
pub use persistence::{ModelMetadata, load_model, resume_agent, save_model};
pub use trainer::QTrainer;
