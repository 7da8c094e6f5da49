//! Relay error kinds and error value helpers.
//!
//! ```rust
//! use wrelay::{RelayError, RelayErrorKind};
//!
//! let limited = RelayError::from_response(429, br#"{"error":"slow down"}"#);
//! assert_eq!(limited.kind, RelayErrorKind::RateLimited);
//! assert_eq!(limited.message, "slow down");
//! assert_eq!(limited.status, Some(429));
//!
//! let generic = RelayError::from_response(500, b"<html>oops</html>");
//! assert_eq!(generic.message, "Error: 500");
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde_json::Value;

pub const UNKNOWN_ERROR: &str = "Unknown error";
pub const NO_RESPONSE_BODY: &str = "No response body";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayErrorKind {
    Configuration,
    InvalidRequest,
    Authentication,
    RateLimited,
    QuotaExhausted,
    Status,
    Timeout,
    Transport,
    Unavailable,
    MissingBody,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayError {
    pub kind: RelayErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub retryable: bool,
}

impl RelayError {
    pub fn new(kind: RelayErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            retryable,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Configuration, message, false)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::InvalidRequest, message, false)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Authentication, message, false)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::RateLimited, message, true)
    }

    pub fn quota_exhausted(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::QuotaExhausted, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Timeout, message, true)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Transport, message, true)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Unavailable, message, true)
    }

    pub fn missing_body() -> Self {
        Self::new(RelayErrorKind::MissingBody, NO_RESPONSE_BODY, false)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(RelayErrorKind::Other, message, false)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Classifies a non-2xx response. The message is the body's `error` field when present,
    /// otherwise `Error: <status>`.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| format!("Error: {status}"));

        let error = match status {
            401 | 403 => Self::authentication(message),
            402 => Self::quota_exhausted(message),
            429 => Self::rate_limited(message),
            408 | 504 => Self::timeout(message),
            400 | 422 => Self::invalid_request(message),
            502 | 503 => Self::unavailable(message),
            _ => Self::new(RelayErrorKind::Status, message, status >= 500),
        };

        error.with_status(status)
    }

    /// Replaces a blank message with [`UNKNOWN_ERROR`].
    pub fn with_fallback_message(mut self) -> Self {
        if self.message.trim().is_empty() {
            self.message = UNKNOWN_ERROR.to_string();
        }

        self
    }
}

impl Display for RelayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for RelayError {}

impl From<serde_json::Error> for RelayError {
    fn from(value: serde_json::Error) -> Self {
        RelayError::invalid_request(value.to_string())
    }
}

/// Accepts `{"error": "..."}` and the nested `{"error": {"message": "..."}}` envelope.
pub(crate) fn extract_error_message(body: &[u8]) -> Option<String> {
    let parsed = serde_json::from_slice::<Value>(body).ok()?;
    let error = parsed.get("error")?;

    let message = match error {
        Value::String(message) => message.as_str(),
        Value::Object(fields) => fields.get("message")?.as_str()?,
        _ => return None,
    };

    if message.is_empty() {
        return None;
    }

    Some(message.to_string())
}
