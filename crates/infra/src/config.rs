//! Configuration loading for the proxy client.
//!
//! ## Environment Variables
//! - `METARP_BASE_URL`: origin of the proxy (required)
//! - `METARP_API_VERSION`: api-version for resource-id addressed operations
//! - `METARP_TIMEOUT_SECS`: per-request timeout in seconds

use metarp_domain::{ErrorCode, ProxyConfig, ResponseError, Result};

/// Load configuration from process environment variables.
///
/// # Errors
/// Returns a [`ErrorCode::ValidationFailed`] error when the base url is
/// missing or unparseable, or when numeric values do not parse.
pub fn load_from_env() -> Result<ProxyConfig> {
    from_lookup(|key| std::env::var(key).ok())
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<ProxyConfig> {
    let base_url = lookup("METARP_BASE_URL").ok_or_else(|| {
        ResponseError::new(400, ErrorCode::ValidationFailed, "METARP_BASE_URL is not set")
    })?;

    url::Url::parse(&base_url).map_err(|e| {
        ResponseError::new(
            400,
            ErrorCode::ValidationFailed,
            format!("METARP_BASE_URL '{base_url}' is not a valid url"),
        )
        .with_cause(e)
    })?;

    let mut config = ProxyConfig::new(base_url);

    if let Some(api_version) = lookup("METARP_API_VERSION") {
        config.api_version = api_version;
    }

    if let Some(timeout) = lookup("METARP_TIMEOUT_SECS") {
        config.request_timeout_secs = timeout.parse().map_err(|e| {
            ResponseError::new(
                400,
                ErrorCode::ValidationFailed,
                format!("METARP_TIMEOUT_SECS '{timeout}' is not a valid number of seconds"),
            )
            .with_cause(e)
        })?;
    }

    config.validate()?;
    Ok(config)
}
