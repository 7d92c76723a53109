//! Translation of transport failures and non-2xx responses into
//! [`ResponseError`].
//!
//! Translation happens exactly once, at the point of detection; the resulting
//! error travels unchanged through the dispatcher and traverser. The 404
//! empty-vs-error policy is NOT decided here - call sites pass
//! `not_found_is_empty` to the dispatcher instead.

use metarp_domain::{ErrorCode, ErrorDetail, ErrorEnvelope, ResponseError};
use reqwest::StatusCode;

/// Status reported when a transport failure carries no HTTP status.
const DEFAULT_TRANSPORT_STATUS: u16 = 503;

/// Status reported for request timeouts.
const TIMEOUT_STATUS: u16 = 408;

/// Call-site context threaded through translation so errors carry the
/// failing endpoint and an operation-specific code without re-deriving them
/// from the response later.
#[derive(Debug, Clone)]
pub struct FailureContext {
    /// Code used for non-2xx responses; 404s are mapped to
    /// [`ErrorCode::NotFound`] regardless.
    pub error_code: ErrorCode,
    /// Endpoint or resource the operation was addressing.
    pub target: String,
    /// Human message describing what the operation was trying to do.
    pub message: String,
}

impl FailureContext {
    pub fn new(error_code: ErrorCode, target: &str, message: impl Into<String>) -> Self {
        Self { error_code, target: target.to_string(), message: message.into() }
    }
}

/// Map a transport-level failure (connection refused, timeout, DNS, TLS)
/// into a structured error, keeping the original failure as the cause.
pub fn transport_failure(err: reqwest::Error, context: &FailureContext) -> ResponseError {
    let status_code = err
        .status()
        .map(|status| status.as_u16())
        .unwrap_or(if err.is_timeout() { TIMEOUT_STATUS } else { DEFAULT_TRANSPORT_STATUS });

    let detail = ErrorDetail::new(ErrorCode::TransportError.as_str(), err.to_string());

    ResponseError::new(status_code, ErrorCode::TransportError, context.message.clone())
        .with_target(context.target.clone())
        .with_details(vec![detail])
        .with_cause(err)
}

/// Map a non-2xx response into a structured error.
///
/// Details carry a synthesized status entry first, then the parsed
/// `{"error":{code,message}}` envelope when the body contains one. A body
/// that fails to parse degrades to the status entry alone - a malformed
/// error body never masks the primary failure.
pub fn error_response(status: StatusCode, body: &str, context: &FailureContext) -> ResponseError {
    let error_code =
        if status == StatusCode::NOT_FOUND { ErrorCode::NotFound } else { context.error_code };

    let mut details = vec![status_detail(status, body, error_code)];
    if let Some(parsed) = parse_error_envelope(body) {
        details.push(parsed);
    }

    ResponseError::new(status.as_u16(), error_code, context.message.clone())
        .with_target(context.target.clone())
        .with_details(details)
}

fn status_detail(status: StatusCode, body: &str, code: ErrorCode) -> ErrorDetail {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    ErrorDetail::new(code.as_str(), format!("({} {}) {}", status.as_u16(), reason, body))
}

fn parse_error_envelope(body: &str) -> Option<ErrorDetail> {
    serde_json::from_str::<ErrorEnvelope>(body).ok().map(|envelope| envelope.error)
}
