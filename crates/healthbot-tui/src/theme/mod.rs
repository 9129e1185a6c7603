//! Theme components for the TUI.
//!
//! - [`Theme`] - Color palette (Catppuccin Mocha, or High Contrast under `NO_COLOR`)

mod colors;

pub use colors::Theme;
