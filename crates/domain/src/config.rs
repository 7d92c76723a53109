//! Client configuration structures.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorCode, ResponseError, Result};

/// Default ARM api-version sent when an operation does not supply its own.
pub const DEFAULT_API_VERSION: &str = "2023-08-01";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for the meta RP proxy client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Origin of the proxy, e.g. `https://metarp.example.com`.
    pub base_url: String,
    /// api-version used for resource-id addressed operations.
    pub api_version: String,
    /// Deadline applied to each single network attempt.
    pub request_timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ProxyConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Check the configuration is usable before building a client from it.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ResponseError::new(
                400,
                ErrorCode::ValidationFailed,
                "proxy base url must not be empty",
            ));
        }
        if self.api_version.trim().is_empty() {
            return Err(ResponseError::new(
                400,
                ErrorCode::ValidationFailed,
                "api version must not be empty",
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ResponseError::new(
                400,
                ErrorCode::ValidationFailed,
                "request timeout must be at least one second",
            ));
        }
        Ok(())
    }
}
