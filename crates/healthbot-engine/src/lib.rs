//! healthbot-engine: Headless conversation engine for HealthBot
//!
//! This crate provides everything that does not touch the terminal:
//! - Message and role types matching the chat-completions wire format
//! - The conversation state machine (one exchange in flight at a time)
//! - Completion clients for the direct and proxy transports
//! - Configuration loading and credential resolution

pub mod client;
pub mod config;
pub mod conversation;
pub mod message;
pub mod prompt;

// Re-export commonly used types
pub use client::{CompletionClient, CompletionError, HttpCompletionClient};
pub use config::{Config, ConfigError, Transport};
pub use conversation::{
    error_reply, exchange, Conversation, Entry, Phase, Settled, SubmitRejected,
};
pub use message::{Message, Role};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
