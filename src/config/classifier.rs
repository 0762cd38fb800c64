//! Intent classifier (LLM) configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the intent classifier backend.
///
/// When no API key is present the live classifier is disabled and the
/// router falls back to its scripted replies; this is a valid demo setup,
/// so validation never requires a key.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// OpenAI API key. Absent means the classifier is disabled.
    pub openai_api_key: Option<Secret<String>>,

    /// Chat-completions model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL for the chat-completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ClassifierConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a usable API key is configured
    pub fn is_configured(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate classifier configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    10
}
