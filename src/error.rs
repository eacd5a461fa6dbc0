//! Error types for footprint calculation and tip requests

use std::fmt;

use thiserror::Error;
use tracing::{error, warn};

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Failures on the calculation side. None of these ever produce a record.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid input: {field} must be a non-negative number (got {value})")]
    InvalidInput { field: &'static str, value: f64 },

    #[error("unknown {category} variant '{variant}'")]
    UnknownVariant { category: String, variant: String },

    #[error("history storage error: {0}")]
    Storage(String),
}

impl TrackerError {
    pub fn invalid_input(field: &'static str, value: f64) -> Self {
        warn!(target: "carbon_tracker::validation", field, value, "rejected activity input");
        TrackerError::InvalidInput { field, value }
    }

    pub fn unknown_variant(category: impl Into<String>, variant: impl Into<String>) -> Self {
        let category = category.into();
        let variant = variant.into();
        warn!(target: "carbon_tracker::factors", %category, %variant, "unknown variant");
        TrackerError::UnknownVariant { category, variant }
    }
}

impl From<rusqlite::Error> for TrackerError {
    fn from(err: rusqlite::Error) -> Self {
        error!(target: "carbon_tracker::history", error = ?err, "sqlite error");
        TrackerError::Storage(err.to_string())
    }
}

/// How the outbound tip request failed at the network or HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Status(u16),
    Timeout,
    Connect,
    Decode,
    Request,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Status(code) => write!(f, "HTTP status {code}"),
            TransportFailure::Timeout => f.write_str("timeout"),
            TransportFailure::Connect => f.write_str("connection failure"),
            TransportFailure::Decode => f.write_str("malformed response"),
            TransportFailure::Request => f.write_str("request failure"),
        }
    }
}

/// Failures of the tip request. These never roll back a calculation.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("tip service unreachable ({failure}): {message}")]
    Transport {
        failure: TransportFailure,
        message: String,
    },

    #[error("tip service response contained no text content")]
    ContentNotFound,

    #[error("tip service is not configured (no API key)")]
    NotConfigured,
}

impl AdvisoryError {
    pub fn transport(failure: TransportFailure, message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "carbon_tracker::advisor", %failure, %message, "tip request failed");
        AdvisoryError::Transport { failure, message }
    }

    pub fn content_not_found() -> Self {
        warn!(target: "carbon_tracker::advisor", "tip response missing candidates[0].content.parts[0].text");
        AdvisoryError::ContentNotFound
    }

    pub fn transport_failure(&self) -> Option<TransportFailure> {
        match self {
            AdvisoryError::Transport { failure, .. } => Some(*failure),
            _ => None,
        }
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, AdvisoryError::ContentNotFound)
    }
}
