//! Terminal rendering of the board, status line and training chart

pub mod renderer;

pub use renderer::{RenderConfig, Renderer, StatusItem};
