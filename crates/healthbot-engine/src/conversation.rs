//! Conversation state and the per-submission state machine.
//!
//! ```text
//!   Idle --submit(valid)--> AwaitingResponse --settle(any)--> Idle
//! ```
//!
//! The message list is append-only. The first message is the system
//! instruction; it is sent with every request and never displayed.

use tracing::{debug, info, warn};

use crate::client::{CompletionClient, CompletionError};
use crate::config::Config;
use crate::message::{Message, Role};

/// Prefix of the assistant message appended when an exchange fails.
pub const ERROR_REPLY_PREFIX: &str = "Sorry, something went wrong: ";

/// Exchange phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No request outstanding; submissions are accepted.
    #[default]
    Idle,
    /// One request is in flight; submissions are ignored.
    AwaitingResponse,
}

/// Why a submission was ignored. Rejections never change any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    /// Input is empty after trimming.
    #[error("input is empty")]
    EmptyInput,
    /// A previous exchange has not settled yet.
    #[error("a request is already in flight")]
    InFlight,
    /// Endpoint configuration or credential is missing.
    #[error("endpoint is not configured")]
    NotConfigured,
}

/// How an exchange ended, borrowing the message it appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled<'a> {
    /// The endpoint answered.
    Reply(&'a Message),
    /// The request failed; the message carries the error text.
    Failed(&'a Message),
}

impl<'a> Settled<'a> {
    /// The appended assistant message.
    pub fn message(self) -> &'a Message {
        match self {
            Settled::Reply(message) | Settled::Failed(message) => message,
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Settled::Failed(_))
    }
}

/// A displayed message and whether it reports a failed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub message: &'a Message,
    pub failed: bool,
}

/// An ordered, append-only conversation plus its exchange phase.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    /// Indices of messages appended for failed exchanges.
    failures: Vec<usize>,
    phase: Phase,
    configured: bool,
}

impl Conversation {
    /// Start a conversation with a system instruction and a greeting.
    pub fn new(system_prompt: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::assistant(greeting)],
            failures: Vec::new(),
            phase: Phase::Idle,
            configured: true,
        }
    }

    /// Start a conversation from configuration. Submissions are disabled
    /// when the configuration is not ready.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.system_prompt.clone(), config.greeting.clone())
            .configured(config.is_ready())
    }

    /// Set whether the endpoint is configured.
    #[must_use]
    pub fn configured(mut self, configured: bool) -> Self {
        self.configured = configured;
        self
    }

    /// All messages, including the system instruction.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Messages shown to the user (everything but the system role).
    pub fn visible(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.is_visible())
    }

    /// Visible messages, each marked with whether it reports a failure.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_visible())
            .map(|(index, message)| Entry {
                message,
                failed: self.is_failure_at(index),
            })
    }

    /// Whether the message at `index` was appended for a failed exchange.
    pub fn is_failure_at(&self, index: usize) -> bool {
        self.failures.contains(&index)
    }

    /// Number of messages, including the system instruction.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the system instruction is never removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The last message.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether an exchange is in flight.
    pub fn is_in_flight(&self) -> bool {
        self.phase == Phase::AwaitingResponse
    }

    /// Whether submissions can be sent at all.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Whether a submission of `input` would be accepted right now.
    pub fn check_submit(&self, input: &str) -> Result<(), SubmitRejected> {
        if input.trim().is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }
        if !self.configured {
            return Err(SubmitRejected::NotConfigured);
        }
        if self.is_in_flight() {
            return Err(SubmitRejected::InFlight);
        }
        Ok(())
    }

    /// Append the user's message and enter `AwaitingResponse`.
    ///
    /// Returns the request payload: the full ordered history, system
    /// instruction first, ending with the new user message.
    pub fn submit(&mut self, input: &str) -> Result<Vec<Message>, SubmitRejected> {
        if let Err(rejected) = self.check_submit(input) {
            debug!(%rejected, "submission ignored");
            return Err(rejected);
        }

        self.messages.push(Message::user(input));
        self.phase = Phase::AwaitingResponse;
        info!(messages = self.messages.len(), "submitted user message");
        Ok(self.messages.clone())
    }

    /// Record the outcome of the in-flight exchange and return to `Idle`.
    ///
    /// Success appends the reply; failure appends an assistant message
    /// carrying the error text. Returns `None` without touching the
    /// history when no exchange is in flight.
    pub fn settle(&mut self, outcome: Result<Message, CompletionError>) -> Option<Settled<'_>> {
        if !self.is_in_flight() {
            debug!("settle ignored: nothing in flight");
            return None;
        }
        Some(self.record(outcome))
    }

    fn record(&mut self, outcome: Result<Message, CompletionError>) -> Settled<'_> {
        let index = self.messages.len();
        let failed = match outcome {
            Ok(reply) => {
                self.messages.push(reply);
                false
            }
            Err(e) => {
                warn!(error = %e, "completion failed");
                self.messages.push(error_reply(&e));
                self.failures.push(index);
                true
            }
        };
        self.phase = Phase::Idle;

        let message = &self.messages[index];
        if failed {
            Settled::Failed(message)
        } else {
            Settled::Reply(message)
        }
    }
}

/// Build the assistant message shown for a failed exchange.
pub fn error_reply(error: &CompletionError) -> Message {
    Message {
        role: Role::Assistant,
        content: format!("{ERROR_REPLY_PREFIX}{error}"),
    }
}

/// Run one complete submit -> request -> settle cycle.
pub async fn exchange<'a>(
    conversation: &'a mut Conversation,
    client: &dyn CompletionClient,
    input: &str,
) -> Result<Settled<'a>, SubmitRejected> {
    let payload = conversation.submit(input)?;
    let outcome = client.complete(&payload).await;
    Ok(conversation.record(outcome))
}
