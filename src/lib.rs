//! Snake Q-learning - a Snake game and a deep Q-learning agent that learns it
//!
//! This library provides:
//! - Core game logic (game module)
//! - State encoding, Q-network, replay memory and trainer (rl module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Score tracking (metrics module)
//! - Execution modes: human play, headless training and live training (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
