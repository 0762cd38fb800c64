//! Form detail/launch provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the external form service (Callvu-style micro-app host).
///
/// All three of org id, token, and base URL are required for the live
/// provider; if any is missing the deterministic mock provider is used
/// unconditionally and no network I/O is attempted.
#[derive(Debug, Clone, Deserialize)]
pub struct FormProviderConfig {
    /// Organization identifier used in request paths and launch URLs
    pub org_id: Option<String>,

    /// Bearer token for API authentication
    pub token: Option<Secret<String>>,

    /// Base URL of the form service API
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FormProviderConfig {
    fn default() -> Self {
        Self {
            org_id: None,
            token: None,
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl FormProviderConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check whether every credential needed for the live provider is present
    pub fn is_configured(&self) -> bool {
        self.org_id.as_ref().is_some_and(|v| !v.is_empty())
            && self
                .token
                .as_ref()
                .is_some_and(|t| !t.expose_secret().is_empty())
            && self.base_url.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Base URL with any trailing slashes removed
    pub fn normalized_base_url(&self) -> Option<String> {
        self.base_url
            .as_ref()
            .map(|u| u.trim_end_matches('/').to_string())
    }

    /// Validate form provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if let Some(url) = &self.base_url {
            if !url.is_empty() && !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidFormProviderUrl);
            }
        }
        Ok(())
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> FormProviderConfig {
        FormProviderConfig {
            org_id: Some("org-123".to_string()),
            token: Some(Secret::new("tok".to_string())),
            base_url: Some("https://mcp.callvu.example/api/".to_string()),
            timeout_secs: 10,
        }
    }

    #[test]
    fn test_unconfigured_by_default() {
        assert!(!FormProviderConfig::default().is_configured());
    }

    #[test]
    fn test_default_passes_validation() {
        let config = FormProviderConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_configured_with_all_credentials() {
        assert!(full_config().is_configured());
    }

    #[test]
    fn test_missing_token_is_unconfigured() {
        let config = FormProviderConfig {
            token: None,
            ..full_config()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_base_url_normalization() {
        let config = full_config();
        assert_eq!(
            config.normalized_base_url().unwrap(),
            "https://mcp.callvu.example/api"
        );
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let config = FormProviderConfig {
            base_url: Some("not-a-url".to_string()),
            ..full_config()
        };
        assert!(config.validate().is_err());
    }
}
