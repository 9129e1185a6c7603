//! State-aware placeholder text for the input area.

/// Placeholder shown while the input can accept a question.
pub const READY_PLACEHOLDER: &str = "Ask a health-related question...";

/// Placeholder text for the input area.
///
/// When submissions are impossible the placeholder says why, naming the
/// environment variable the credential is read from.
#[must_use]
pub fn input_placeholder(configured: bool, in_flight: bool, api_key_env: &str) -> String {
    if !configured {
        format!("Set {api_key_env} (or use --proxy) to start chatting")
    } else if in_flight {
        "Waiting for HealthBot...".into()
    } else {
        READY_PLACEHOLDER.into()
    }
}
