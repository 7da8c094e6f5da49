//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use wrelay::{RelayError, RelayErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    Busy,
    Relay,
    Cancelled,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub relay_kind: Option<RelayErrorKind>,
    pub retryable: bool,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            relay_kind: None,
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn busy() -> Self {
        Self::new(ChatErrorKind::Busy, "a turn is already in flight")
    }

    pub fn cancelled() -> Self {
        Self::new(ChatErrorKind::Cancelled, "turn cancelled")
    }

    pub fn summary(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Summary, message)
    }

    pub fn is_busy(&self) -> bool {
        self.kind == ChatErrorKind::Busy
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<RelayError> for ChatError {
    fn from(value: RelayError) -> Self {
        Self {
            kind: ChatErrorKind::Relay,
            message: value.message,
            relay_kind: Some(value.kind),
            retryable: value.retryable,
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(value: serde_json::Error) -> Self {
        Self::invalid_request(value.to_string())
    }
}
