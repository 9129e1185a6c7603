//! Configuration types for the HealthBot engine.
//!
//! Configuration is an optional JSON file. Every field has a default, so an
//! absent file means "talk to the provider directly with the default model".
//! The API credential is never read from or written to the file; it comes
//! from the environment variable named by `api_key_env`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::prompt::{DEFAULT_GREETING, DEFAULT_SYSTEM_PROMPT};

/// Chat-completions endpoint used by the direct transport.
pub const DEFAULT_DIRECT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Endpoint used by the proxy transport when none is configured.
pub const DEFAULT_PROXY_ENDPOINT: &str = "http://localhost:3000/api/chat";

/// Path of the chat route on a backend proxy.
pub const PROXY_CHAT_ROUTE: &str = "/api/chat";

/// Environment variable consulted when `api_key_env` is unset.
pub const FALLBACK_API_KEY_ENV: &str = "REACT_APP_GROQ_API_KEY";

/// How requests reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Call the provider directly with a bearer credential and a model name.
    #[default]
    Direct,
    /// Call a backend proxy that holds the credential; only messages are sent.
    Proxy,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Direct => write!(f, "direct"),
            Transport::Proxy => write!(f, "proxy"),
        }
    }
}

/// Main configuration for HealthBot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wire variant used for completion requests.
    #[serde(default)]
    pub transport: Transport,

    /// Endpoint URL. Defaults depend on the transport.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name sent by the direct transport.
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API credential.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// System instruction prepended to every request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// First assistant message of every session.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Resolved credential. Never serialized.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_model() -> String {
    "llama-3.3-70b-versatile".into()
}

fn default_api_key_env() -> String {
    "GROQ_API_KEY".into()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.into()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            endpoint: None,
            model: default_model(),
            api_key_env: default_api_key_env(),
            system_prompt: default_system_prompt(),
            greeting: default_greeting(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration from `path` if given and present, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Switch to the proxy transport rooted at `base_url`.
    pub fn use_proxy(&mut self, base_url: &str) {
        self.transport = Transport::Proxy;
        self.endpoint = Some(format!(
            "{}{PROXY_CHAT_ROUTE}",
            base_url.trim_end_matches('/')
        ));
    }

    /// Effective endpoint URL for the configured transport.
    pub fn endpoint_url(&self) -> &str {
        match (&self.endpoint, self.transport) {
            (Some(url), _) => url.as_str(),
            (None, Transport::Direct) => DEFAULT_DIRECT_ENDPOINT,
            (None, Transport::Proxy) => DEFAULT_PROXY_ENDPOINT,
        }
    }

    /// Read the credential from the process environment.
    pub fn resolve_credential(&mut self) {
        self.resolve_credential_with(|name| std::env::var(name).ok());
    }

    /// Read the credential through `lookup`, falling back to
    /// [`FALLBACK_API_KEY_ENV`]. Blank values count as absent.
    pub fn resolve_credential_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key = lookup(&self.api_key_env)
            .or_else(|| lookup(FALLBACK_API_KEY_ENV))
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
    }

    /// Whether a credential is available.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Whether submissions may be sent. The proxy holds its own credential.
    pub fn is_ready(&self) -> bool {
        match self.transport {
            Transport::Direct => self.has_credential(),
            Transport::Proxy => true,
        }
    }
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// JSON parse error.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}
