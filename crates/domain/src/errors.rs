//! Error types used throughout the proxy client.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error identifiers callers can branch on.
///
/// These are deliberately distinct from transport status codes: a caller
/// switching on [`ErrorCode`] does not care whether the proxy said 502 or the
/// connection never opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No response was obtained (connection refused, timeout, DNS, TLS).
    TransportError,
    /// The server was reachable but answered with a non-2xx status.
    UpstreamError,
    /// A 404 on an operation where "not found" is a real failure.
    NotFound,
    /// A payload was rejected by backend-side validation.
    ValidationFailed,
    /// A response or cached body could not be decoded.
    SerializationError,
    /// Attaching credentials to the outgoing request failed.
    AuthError,
}

impl ErrorCode {
    /// Stable string form, used for synthesized error details.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransportError => "TransportError",
            Self::UpstreamError => "UpstreamError",
            Self::NotFound => "NotFound",
            Self::ValidationFailed => "ValidationFailed",
            Self::SerializationError => "SerializationError",
            Self::AuthError => "AuthError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single error entry.
///
/// Doubles as the wire shape of the `{"error": {...}}` envelope the proxy
/// returns on failures and as the entries of [`ResponseError::details`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }
}

/// Wire envelope wrapping an [`ErrorDetail`] in upstream error bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

/// Structured error carried by every failing client operation.
///
/// Built once at the point of detection and passed up unchanged; it always
/// carries enough context (`error_code`, `target`, `details`) to log and to
/// branch on without re-deriving anything from the original response.
#[derive(Debug, Error)]
#[error("{error_code} ({status_code}): {message}")]
pub struct ResponseError {
    /// HTTP status observed, or a mapped default when none was available.
    pub status_code: u16,
    pub error_code: ErrorCode,
    /// Endpoint or resource the failure relates to.
    pub target: Option<String>,
    pub message: String,
    pub details: Vec<ErrorDetail>,
    /// The wrapped originating error, when one exists.
    #[source]
    pub cause: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ResponseError {
    pub fn new(status_code: u16, error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            error_code,
            target: None,
            message: message.into(),
            details: Vec::new(),
            cause: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_details(mut self, details: Vec<ErrorDetail>) -> Self {
        self.details = details;
        self
    }

    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

/// Result type alias for proxy client operations.
pub type Result<T> = std::result::Result<T, ResponseError>;
