//! Experience replay memory
//!
//! A bounded FIFO of transitions. Once full, every push evicts the oldest
//! entry. Sampling draws distinct entries uniformly at random.

use std::collections::VecDeque;

use rand::{Rng, seq::index};

use super::observation::StateVector;
use crate::game::ACTION_SIZE;

/// One-hot action as stored in a transition
pub type ActionVector = [f32; ACTION_SIZE];

/// A single step of experience
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: StateVector,
    /// One-hot action taken in `state`
    pub action: ActionVector,
    pub reward: f32,
    pub next_state: StateVector,
    /// Whether the step ended the episode
    pub done: bool,
}

impl Transition {
    pub fn new(
        state: StateVector,
        action: ActionVector,
        reward: f32,
        next_state: StateVector,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }

    /// Slot of the taken action, the first maximum on ties
    pub fn action_index(&self) -> usize {
        argmax(&self.action)
    }
}

/// Index of the first maximal element; 0 for an empty slice
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |(best, best_val), (idx, &val)| {
            if val > best_val { (idx, val) } else { (best, best_val) }
        })
        .0
}

/// Bounded FIFO replay buffer
///
/// # Example
///
/// ```rust
/// use snake_qlearn::rl::{ReplayMemory, Transition};
///
/// let mut memory = ReplayMemory::new(2);
/// let t = Transition::new([0.0; 11], [1.0, 0.0, 0.0], 0.0, [0.0; 11], false);
/// memory.push(t);
/// memory.push(t);
/// memory.push(t);
///
/// assert_eq!(memory.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayMemory {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayMemory {
    /// Create an empty memory holding at most `capacity` transitions
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest one when full
    pub fn push(&mut self, transition: Transition) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `n` distinct transitions uniformly at random.
    ///
    /// Returns every stored transition when `n` is at least the current length.
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<Transition> {
        if self.buffer.len() <= n {
            return self.buffer.iter().copied().collect();
        }

        index::sample(rng, self.buffer.len(), n)
            .into_iter()
            .map(|idx| self.buffer[idx])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}
