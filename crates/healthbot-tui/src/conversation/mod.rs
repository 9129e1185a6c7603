//! Conversation pane module.
//!
//! The scrollable transcript of visible messages, the thinking placeholder
//! and the input placeholder text.

mod placeholder;
mod scroll;
mod transcript;
mod widget;

pub use placeholder::{input_placeholder, READY_PLACEHOLDER};
pub use scroll::{TranscriptScroll, SCROLL_STEP};
pub use transcript::{thinking_text, transcript_lines};
pub use widget::ConversationPane;
