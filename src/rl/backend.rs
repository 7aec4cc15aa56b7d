//! Backend type aliases and device management
//!
//! This module provides convenient type aliases for the Burn backends used in
//! training and inference, as well as helper functions for device management.
//!
//! # Backend Selection
//!
//! - **TrainingBackend**: Autodiff-enabled NdArray backend for training (CPU)
//! - **InferenceBackend**: Plain NdArray backend for inference (CPU)
//!
//! The 11 → 256 → 3 Q-network is tiny, so the CPU NdArray backend is all the
//! agent needs.
//!
//! # Example
//!
//! ```rust
//! use snake_qlearn::rl::{Agent, AgentConfig, TrainingBackend, default_device};
//!
//! let device = default_device();
//! let agent = Agent::<TrainingBackend>::new(AgentConfig::default(), device).unwrap();
//! assert_eq!(agent.games_played(), 0);
//! ```

use burn::backend::{
    Autodiff,
    ndarray::{NdArray, NdArrayDevice},
};

/// Backend type for training (with autodiff)
///
/// Used by the agent and its trainer; the Adam step needs gradients.
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Backend type for inference (without autodiff)
///
/// Used to query a loaded checkpoint without tracking gradients.
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
///
/// Returns the default NdArray device (CPU).
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
