//! One-step Q-learning update
//!
//! Every batch, including a single freshly observed transition, goes through
//! the same path:
//!
//! 1. `pred = Q(states)`, `target = pred` (detached copy)
//! 2. `q_new = reward` for terminal transitions, otherwise
//!    `reward + gamma * max_a Q(next_state, a)`
//! 3. `target[i][argmax(action_i)] = q_new`
//! 4. MSE between `pred` and `target`, one Adam step
//!
//! There is no target network and no gradient clipping.

use anyhow::{Result, anyhow};
use burn::{
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{ElementConversion, Tensor, TensorData, backend::AutodiffBackend},
};

use super::memory::Transition;
use super::network::LinearQNet;
use super::observation::{StateVector, states_to_tensor};
use crate::game::ACTION_SIZE;

/// Owns the Q-network and its optimizer
pub struct QTrainer<B: AutodiffBackend> {
    model: LinearQNet<B>,
    optim: OptimizerAdaptor<Adam<B::InnerBackend>, LinearQNet<B>, B>,
    learning_rate: f64,
    gamma: f32,
    device: B::Device,
}

impl<B: AutodiffBackend> QTrainer<B> {
    pub fn new(model: LinearQNet<B>, learning_rate: f64, gamma: f32, device: B::Device) -> Self {
        Self {
            model,
            optim: AdamConfig::new().init(),
            learning_rate,
            gamma,
            device,
        }
    }

    /// Run one gradient step over `batch` and return the loss before the step.
    ///
    /// An empty batch is a no-op returning zero loss.
    pub fn train_step(&mut self, batch: &[Transition]) -> Result<f32> {
        if batch.is_empty() {
            return Ok(0.0);
        }

        let states: Vec<StateVector> = batch.iter().map(|t| t.state).collect();
        let next_states: Vec<StateVector> = batch.iter().map(|t| t.next_state).collect();

        let pred = self
            .model
            .forward(states_to_tensor::<B>(&states, &self.device));

        // Bootstrap values come from the current weights without tracking gradients
        let next_q = self
            .model
            .clone()
            .valid()
            .forward(states_to_tensor::<B::InnerBackend>(&next_states, &self.device));

        let pred_values = tensor_values(pred.clone().into_data())?;
        let next_values = tensor_values(next_q.into_data())?;

        let targets = q_targets(&pred_values, &next_values, batch, self.gamma);
        let target = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [batch.len(), ACTION_SIZE]),
            &self.device,
        );

        let loss = MseLoss::new().forward(pred, target, Reduction::Mean);
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self
            .optim
            .step(self.learning_rate, self.model.clone(), grads);

        Ok(loss_value)
    }

    pub fn model(&self) -> &LinearQNet<B> {
        &self.model
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }
}

/// Build the flattened `[n, 3]` regression target.
///
/// `predicted` and `next_q` are row-major `[n, 3]` buffers aligned with `batch`.
/// Only the slot of each taken action differs from `predicted`.
pub fn q_targets(predicted: &[f32], next_q: &[f32], batch: &[Transition], gamma: f32) -> Vec<f32> {
    let mut targets = predicted.to_vec();

    for (i, transition) in batch.iter().enumerate() {
        let row = i * ACTION_SIZE..(i + 1) * ACTION_SIZE;
        let q_new = if transition.done {
            transition.reward
        } else {
            let best_next = next_q[row.clone()]
                .iter()
                .copied()
                .fold(f32::NEG_INFINITY, f32::max);
            transition.reward + gamma * best_next
        };
        targets[row.start + transition.action_index()] = q_new;
    }

    targets
}

fn tensor_values(data: TensorData) -> Result<Vec<f32>> {
    data.to_vec::<f32>()
        .map_err(|e| anyhow!("failed to read tensor data: {e:?}"))
}
