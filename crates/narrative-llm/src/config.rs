//! Chat gateway configuration

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default gateway base URL
pub const DEFAULT_ENDPOINT: &str = "https://ai.gateway.lovable.dev";

/// Default chat model
pub const DEFAULT_MODEL: &str = "google/gemini-3-flash-preview";

/// Environment variable holding the bearer token by default
pub const DEFAULT_API_KEY_ENV: &str = "LOVABLE_API_KEY";

/// Default connect and idle-read timeout (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where and how to reach the chat completions gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL; `/v1/chat/completions` is appended
    pub endpoint: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    /// Connect timeout and longest silence between streamed chunks, in seconds
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    /// Full chat completions URL
    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// Connect and idle-read timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable
    ///
    /// # Errors
    /// `LlmError::Configuration` when the variable is unset or blank.
    pub fn api_key(&self) -> Result<String, LlmError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LlmError::Configuration(format!(
                "{} is not configured",
                self.api_key_env
            ))),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("gateway endpoint must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("gateway model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.completions_url(), "https://ai.gateway.lovable.dev/v1/chat/completions");
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = GatewayConfig {
            endpoint: "http://127.0.0.1:9000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.completions_url(), "http://127.0.0.1:9000/v1/chat/completions");
    }

    #[test]
    fn test_missing_key_names_the_variable() {
        let config = GatewayConfig {
            api_key_env: "NARRATIVE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        let err = config.api_key().unwrap_err();
        assert_eq!(err.to_string(), "NARRATIVE_TEST_KEY_THAT_IS_NEVER_SET is not configured");
    }

    #[test]
    fn test_zero_timeout_invalid() {
        let config = GatewayConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
