//! Error types for medialab-core

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PeerStatus, ServiceStatus};
use crate::util::{compact_text, sanitize};

/// Result type alias using medialab-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by item validation and lookup
#[derive(Error, Debug)]
pub enum Error {
    /// Referenced item id does not exist
    #[error("Item not found: {0}")]
    NotFound(u64),

    /// Request body failed model validation
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Model validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{0} must not be blank")]
    Blank(&'static str),
}

/// Why a call to the peer service failed.
///
/// Each variant maps to exactly one status string, so a degraded status can
/// always be traced back to its cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("request timed out")]
    Timeout,
    #[error("connection refused")]
    ConnectionRefused,
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response payload: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Classify a reqwest failure.
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::ConnectionRefused
        } else if error.is_decode() {
            Self::Decode(sanitize(error))
        } else if let Some(status) = error.status() {
            Self::Http {
                status: status.as_u16(),
                message: String::new(),
            }
        } else {
            Self::Transport(sanitize(error))
        }
    }

    /// Build an HTTP failure from a non-success status and its raw body.
    ///
    /// When the body is an [`ErrorEnvelope`] its message is kept, otherwise a
    /// truncated copy of the raw body.
    pub fn http(status: u16, body: &str) -> Self {
        let message =
            ErrorEnvelope::message_from_body(body).unwrap_or_else(|| compact_text(body));
        Self::Http { status, message }
    }

    /// Stable machine-readable label for the failure cause.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::ConnectionRefused => "connection_refused",
            Self::Http { .. } => "http_error",
            Self::Transport(_) => "transport_error",
            Self::Decode(_) => "decode_error",
        }
    }

    /// The peer answered but not usefully (`error`), or did not answer (`disconnected`).
    pub const fn peer_status(&self) -> PeerStatus {
        match self {
            Self::Http { .. } | Self::Decode(_) => PeerStatus::Error,
            Self::Timeout | Self::ConnectionRefused | Self::Transport(_) => {
                PeerStatus::Disconnected
            }
        }
    }

    pub const fn service_status(&self) -> ServiceStatus {
        match self.peer_status() {
            PeerStatus::Connected => ServiceStatus::Running,
            PeerStatus::Error => ServiceStatus::Error,
            PeerStatus::Disconnected => ServiceStatus::Disconnected,
        }
    }
}

/// Shared JSON error body returned by both services.
///
/// ```json
/// { "error": { "message": "...", "status_code": 404, "timestamp": "...", "details": {} } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "empty_object")]
    pub details: serde_json::Value,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                status_code,
                timestamp: Utc::now(),
                details: empty_object(),
            },
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = details;
        self
    }

    /// Pull the message out of a peer's error body, if it is one of ours.
    pub fn message_from_body(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .map(|envelope| envelope.error.message)
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
