//! UI widgets for the TUI.
//!
//! This module provides:
//! - [`Header`] - Top line with name, tagline, model and status
//! - [`FooterHints`] - Bottom keybinding hints
//! - [`InputBar`] - Bordered multi-line input
//! - [`TextInputState`] - The buffer behind the input bar

mod footer_hints;
mod header;
mod input_bar;
mod text_input;

pub use footer_hints::{hints_for_state, FooterHints, KeyHint};
pub use header::{Header, HeaderContent, HeaderStatus, APP_NAME, TAGLINE};
pub use input_bar::{input_bar_height, InputBar};
pub use text_input::TextInputState;
