use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use metarp_core::{TelemetryLevel, TelemetrySink};
use metarp_domain::{ErrorCode, ResponseError, Result};
use metarp_infra::ProxyAuthenticator;
use reqwest::header::{HeaderValue, AUTHORIZATION};

/// Telemetry sink that keeps every event for later inspection.
#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(TelemetryLevel, String)>>,
}

impl RecordingTelemetry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Check whether an event matching the level and message fragment exists.
    pub fn contains(&self, level: TelemetryLevel, needle: &str) -> bool {
        self.events
            .lock()
            .expect("telemetry mutex poisoned")
            .iter()
            .any(|(lvl, msg)| *lvl == level && msg.contains(needle))
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn record(&self, level: TelemetryLevel, message: &str, _fields: &[(&str, String)]) {
        self.events.lock().expect("telemetry mutex poisoned").push((level, message.to_string()));
    }
}

/// Authenticator that attaches a fixed bearer token, or fails when built
/// without one.
pub struct StaticTokenAuthenticator {
    token: Option<String>,
}

impl StaticTokenAuthenticator {
    pub fn with_token(token: &str) -> Self {
        Self { token: Some(token.to_string()) }
    }

    pub fn without_token() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl ProxyAuthenticator for StaticTokenAuthenticator {
    async fn attach(&self, request: &mut reqwest::Request, _audience: Option<&str>) -> Result<()> {
        let token = self.token.as_ref().ok_or_else(|| {
            ResponseError::new(401, ErrorCode::AuthError, "no credential available for the proxy")
        })?;

        let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            ResponseError::new(401, ErrorCode::AuthError, "credential is not a valid header value")
                .with_cause(e)
        })?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }
}
