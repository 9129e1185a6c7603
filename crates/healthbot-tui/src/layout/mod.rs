//! Layout components for the TUI.
//!
//! This module provides [`render_shell`], which lays out the header,
//! conversation pane, input bar and footer.

mod shell;

pub use shell::{render_shell, MIN_HEIGHT, MIN_WIDTH};
