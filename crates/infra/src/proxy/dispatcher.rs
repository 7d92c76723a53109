//! Single-attempt authenticated dispatch against the proxy.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use metarp_core::{TelemetryLevel, TelemetrySink};
use metarp_domain::{ErrorCode, ProxyConfig, ResponseError, Result};
use reqwest::{Method, StatusCode};
use url::Url;

use crate::translate::{self, FailureContext};

/// Attaches credentials to an outgoing proxy request.
///
/// Implemented outside this crate. The dispatcher calls `attach` exactly once
/// per request and never inspects the credential material; a failure here
/// aborts the dispatch before any network I/O.
#[async_trait]
pub trait ProxyAuthenticator: Send + Sync {
    async fn attach(&self, request: &mut reqwest::Request, audience: Option<&str>) -> Result<()>;
}

/// Outcome of a dispatch that did not fail.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// 2xx response, body not yet consumed.
    Response(reqwest::Response),
    /// 404 on an operation where not-found means "nothing exists yet".
    Absent,
}

/// One dispatch: method, endpoint and per-operation policy.
#[derive(Debug)]
pub struct DispatchRequest<'a> {
    pub method: Method,
    pub endpoint: &'a str,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(&'static str, String)>,
    /// When true, a 404 response yields [`DispatchOutcome::Absent`] instead
    /// of an error. Each operation decides this; the dispatcher has no
    /// opinion of its own.
    pub not_found_is_empty: bool,
    pub context: FailureContext,
}

impl<'a> DispatchRequest<'a> {
    pub fn new(method: Method, endpoint: &'a str, context: FailureContext) -> Self {
        Self {
            method,
            endpoint,
            body: None,
            headers: Vec::new(),
            not_found_is_empty: false,
            context,
        }
    }

    pub fn get(endpoint: &'a str, context: FailureContext) -> Self {
        Self::new(Method::GET, endpoint, context)
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &'static str, value: String) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn headers(mut self, headers: Vec<(&'static str, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn not_found_is_empty(mut self, empty: bool) -> Self {
        self.not_found_is_empty = empty;
        self
    }
}

/// Builds one authenticated request, sends it once, and hands back either the
/// raw response, an "absent" marker, or a translated structured error.
///
/// No retries: the caller owns retry policy, so each logical call costs at
/// most one network attempt. The configured timeout bounds that attempt.
pub struct ProxyDispatcher {
    http: reqwest::Client,
    base_url: Url,
    authenticator: Arc<dyn ProxyAuthenticator>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl ProxyDispatcher {
    pub fn new(
        config: &ProxyConfig,
        authenticator: Arc<dyn ProxyAuthenticator>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ResponseError::new(
                400,
                ErrorCode::ValidationFailed,
                format!("invalid proxy base url '{}'", config.base_url),
            )
            .with_cause(e)
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .no_proxy()
            .build()
            .map_err(|e| {
                ResponseError::new(500, ErrorCode::TransportError, "failed to build HTTP client")
                    .with_cause(e)
            })?;

        Ok(Self { http, base_url, authenticator, telemetry })
    }

    /// Send one request. Exactly one network attempt is made.
    ///
    /// The endpoint may be a relative path-and-query or an absolute URL (as
    /// pagination cursors sometimes are); both resolve against the configured
    /// base.
    pub async fn dispatch(&self, request: DispatchRequest<'_>) -> Result<DispatchOutcome> {
        let url = self.base_url.join(request.endpoint).map_err(|e| {
            ResponseError::new(
                400,
                ErrorCode::ValidationFailed,
                format!("invalid endpoint '{}'", request.endpoint),
            )
            .with_target(request.context.target.clone())
            .with_cause(e)
        })?;

        let mut builder = self.http.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let mut http_request =
            builder.build().map_err(|e| translate::transport_failure(e, &request.context))?;

        // Credential attachment happens before any network I/O; its failure
        // aborts the dispatch and propagates unchanged.
        self.authenticator.attach(&mut http_request, None).await?;

        self.telemetry.record(
            TelemetryLevel::Debug,
            "dispatching proxy request",
            &[
                ("method", request.method.to_string()),
                ("target", request.context.target.clone()),
            ],
        );

        let response = match self.http.execute(http_request).await {
            Ok(response) => response,
            Err(e) => {
                let error = translate::transport_failure(e, &request.context);
                self.telemetry.record(
                    TelemetryLevel::Error,
                    "proxy request failed before a response was obtained",
                    &[
                        ("target", request.context.target.clone()),
                        ("errorCode", error.error_code.to_string()),
                    ],
                );
                return Err(error);
            }
        };

        let status = response.status();
        if status.is_success() {
            self.telemetry.record(
                TelemetryLevel::Debug,
                "received success response",
                &[
                    ("target", request.context.target.clone()),
                    ("status", status.as_u16().to_string()),
                ],
            );
            return Ok(DispatchOutcome::Response(response));
        }

        if status == StatusCode::NOT_FOUND && request.not_found_is_empty {
            self.telemetry.record(
                TelemetryLevel::Info,
                "resource absent on proxy",
                &[("target", request.context.target.clone())],
            );
            return Ok(DispatchOutcome::Absent);
        }

        // A body that cannot be read degrades to an empty one; the status is
        // the primary failure.
        let body = response.text().await.unwrap_or_default();
        let error = translate::error_response(status, &body, &request.context);
        self.telemetry.record(
            TelemetryLevel::Error,
            "proxy request failed",
            &[
                ("target", request.context.target.clone()),
                ("status", status.as_u16().to_string()),
                ("errorCode", error.error_code.to_string()),
            ],
        );
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use metarp_domain::ErrorCode;

    use super::*;

    #[test]
    fn request_builder_accumulates_headers_and_policy() {
        let context = FailureContext::new(ErrorCode::UpstreamError, "rpaas/x", "failed");
        let request = DispatchRequest::get("rpaas/x", context)
            .not_found_is_empty(true)
            .header("x-ms-cluster-client-tenant-id", "t1".to_string())
            .headers(vec![("accept", "application/json".to_string())]);

        assert_eq!(request.method, Method::GET);
        assert!(request.not_found_is_empty);
        assert_eq!(request.headers.len(), 2);
        assert!(request.body.is_none());
    }

    #[test]
    fn dispatcher_rejects_unparseable_base_url() {
        let config = ProxyConfig::new("not a url");
        let result = ProxyDispatcher::new(
            &config,
            Arc::new(NoAuth),
            Arc::new(metarp_core::NoopTelemetry),
        );
        let err = result.err().expect("base url should be rejected");
        assert_eq!(err.error_code, ErrorCode::ValidationFailed);
    }

    struct NoAuth;

    #[async_trait]
    impl ProxyAuthenticator for NoAuth {
        async fn attach(
            &self,
            _request: &mut reqwest::Request,
            _audience: Option<&str>,
        ) -> Result<()> {
            Ok(())
        }
    }
}
