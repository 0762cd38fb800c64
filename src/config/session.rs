//! Session store configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Session store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Minutes of inactivity after which a session is dropped
    #[serde(default = "default_idle_ttl")]
    pub idle_ttl_minutes: u64,
}

impl SessionConfig {
    /// Get idle TTL as Duration
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_minutes * 60)
    }

    /// Validate session configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_ttl_minutes == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_minutes: default_idle_ttl(),
        }
    }
}

fn default_idle_ttl() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.idle_ttl_minutes, 30);
        assert_eq!(config.idle_ttl(), Duration::from_secs(1800));
    }

    #[test]
    fn test_validation_rejects_zero_ttl() {
        let config = SessionConfig {
            idle_ttl_minutes: 0,
        };
        assert!(config.validate().is_err());
    }
}
