//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the upload/request client.
///
/// Every field has a default matching the portal contract; embedding
/// applications typically deserialize this from their own config file
/// and override nothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout for the authentication exchange, in seconds.
    #[serde(default = "default_auth_timeout_secs")]
    pub auth_timeout_secs: u64,
    /// Timeout for upload and request exchanges, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Read-buffer size for progress-reporting uploads, in bytes.
    #[serde(default = "default_progress_chunk_size")]
    pub progress_chunk_size: usize,
    /// `User-Agent` header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_auth_timeout_secs() -> u64 {
    crate::DEFAULT_AUTH_TIMEOUT_SECS
}

fn default_request_timeout_secs() -> u64 {
    crate::DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_progress_chunk_size() -> usize {
    crate::PROGRESS_CHUNK_SIZE
}

fn default_user_agent() -> String {
    concat!("updraft/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_timeout_secs: default_auth_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            progress_chunk_size: default_progress_chunk_size(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Get the authentication timeout as a Duration.
    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    /// Get the upload/request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth_timeout_secs == 0 {
            return Err("auth_timeout_secs must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.progress_chunk_size == 0 {
            return Err("progress_chunk_size must be greater than 0".to_string());
        }
        if self.user_agent.is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        Ok(())
    }

    /// Create a configuration with short timeouts.
    ///
    /// **For testing only.**
    pub fn for_testing() -> Self {
        Self {
            auth_timeout_secs: 5,
            request_timeout_secs: 10,
            progress_chunk_size: 1024,
            user_agent: "updraft-test".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let config = ClientConfig::default();
        assert_eq!(config.auth_timeout(), Duration::from_secs(30));
        assert_eq!(config.request_timeout(), Duration::from_secs(15 * 60));
        assert_eq!(config.progress_chunk_size, 20 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_empty_object_uses_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.auth_timeout_secs, 30);
        assert_eq!(config.request_timeout_secs, 900);
        assert!(config.user_agent.starts_with("updraft/"));
    }

    #[test]
    fn test_deserialize_partial_override() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"request_timeout_secs": 60}"#).unwrap();
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.auth_timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ClientConfig {
            auth_timeout_secs: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ClientConfig {
            progress_chunk_size: 0,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
