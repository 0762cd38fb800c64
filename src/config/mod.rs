//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `FINOVA` prefix and nested values use double underscores
//! as separators.
//!
//! # Example
//!
//! ```no_run
//! use finova_assistant::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod classifier;
mod error;
mod form_provider;
mod server;
mod session;

pub use classifier::ClassifierConfig;
pub use error::{ConfigError, ValidationError};
pub use form_provider::FormProviderConfig;
pub use server::{Environment, ServerConfig};
pub use session::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Finova assistant backend.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Intent classifier configuration (OpenAI)
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Form detail/launch provider configuration (Callvu-style service)
    #[serde(default)]
    pub form_provider: FormProviderConfig,

    /// Session store configuration
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `FINOVA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FINOVA__SERVER__PORT=3001` -> `server.port = 3001`
    /// - `FINOVA__FORM_PROVIDER__ORG_ID=...` -> `form_provider.org_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FINOVA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Every upstream integration is optional in this demo; validation only
    /// rejects values that would misbehave at runtime (bad ports, zero
    /// timeouts, malformed URLs).
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.classifier.validate()?;
        self.form_provider.validate()?;
        self.session.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("FINOVA__SERVER__PORT");
        env::remove_var("FINOVA__SERVER__ENVIRONMENT");
        env::remove_var("FINOVA__FORM_PROVIDER__ORG_ID");
        env::remove_var("FINOVA__FORM_PROVIDER__TOKEN");
        env::remove_var("FINOVA__FORM_PROVIDER__BASE_URL");
        env::remove_var("FINOVA__CLASSIFIER__OPENAI_API_KEY");
    }

    #[test]
    fn test_load_with_no_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().expect("empty environment should load");

        assert_eq!(config.server.port, 3001);
        assert!(!config.classifier.is_configured());
        assert!(!config.form_provider.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_with_form_provider_credentials() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("FINOVA__FORM_PROVIDER__ORG_ID", "org-1");
        env::set_var("FINOVA__FORM_PROVIDER__TOKEN", "tok-1");
        env::set_var("FINOVA__FORM_PROVIDER__BASE_URL", "https://forms.example");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.form_provider.is_configured());
        assert_eq!(config.form_provider.org_id.as_deref(), Some("org-1"));
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("FINOVA__SERVER__PORT", "4000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 4000);
    }
}
