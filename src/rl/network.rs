//! Q-value network for the snake agent
//!
//! A small fully connected network that maps the 11 encoded state features
//! to one Q-value per relative action.
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 11]
//!   ↓ Linear(11 → 256) + ReLU
//!   ↓ Linear(256 → 3)
//! Output: [batch, 3]  (straight, right, left)
//! ```
//!
//! The output layer is linear: Q-values are unbounded regression targets.
//!
//! # Example
//!
//! ```rust
//! use snake_qlearn::rl::LinearQNetConfig;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let network = LinearQNetConfig::default().init::<Backend>(&device);
//!
//! let states = Tensor::zeros([4, 11], &device);
//! let q_values = network.forward(states);
//!
//! assert_eq!(q_values.dims(), [4, 3]);
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};
use serde::{Deserialize, Serialize};

use super::observation::{STATE_SIZE, StateVector, state_tensor};
use crate::game::ACTION_SIZE;

/// Layer sizes of the Q-network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearQNetConfig {
    /// Number of state features (default: 11)
    pub input_size: usize,

    /// Width of the hidden layer (default: 256)
    pub hidden_size: usize,

    /// Number of actions (default: 3)
    pub output_size: usize,
}

impl LinearQNetConfig {
    /// Standard input and output sizes with a custom hidden layer
    pub fn new(hidden_size: usize) -> Self {
        Self {
            input_size: STATE_SIZE,
            hidden_size,
            output_size: ACTION_SIZE,
        }
    }

    /// Initialize the network with random weights on `device`
    pub fn init<B: Backend>(&self, device: &B::Device) -> LinearQNet<B> {
        LinearQNet {
            linear1: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            linear2: LinearConfig::new(self.hidden_size, self.output_size).init(device),
        }
    }
}

impl Default for LinearQNetConfig {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Two-layer perceptron estimating Q(s, a)
///
/// Generic over the backend so the same module trains on
/// `Autodiff<NdArray<f32>>` and runs inference on `NdArray<f32>`.
#[derive(Module, Debug)]
pub struct LinearQNet<B: Backend> {
    /// Input to hidden layer
    linear1: Linear<B>,
    /// Hidden to Q-value layer
    linear2: Linear<B>,
}

impl<B: Backend> LinearQNet<B> {
    /// Forward pass over a batch of encoded states
    ///
    /// `states` has shape `[batch, 11]`; the result has shape `[batch, 3]`.
    pub fn forward(&self, states: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.linear1.forward(states);
        let x = relu(x);
        self.linear2.forward(x)
    }

    /// Q-values for a single state, shape `[3]`
    pub fn predict(&self, state: &StateVector, device: &B::Device) -> Tensor<B, 1> {
        self.forward(state_tensor(state, device)).flatten(0, 1)
    }
}
