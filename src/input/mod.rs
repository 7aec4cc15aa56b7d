//! Keyboard input mapping for the terminal front-ends

pub mod handler;

pub use handler::{InputHandler, KeyAction};
