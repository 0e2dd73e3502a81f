//! # R&D Gateway Errors
//!
//! Error types shared between the role resolver, the microservice client and
//! the HTTP gateway.
//!
//! - Uses `thiserror` for structured error definitions
//! - Named fields in every variant so messages stay readable in logs

use serde::Serialize;
use thiserror::Error;

/// Construction-time errors of the directory role resolver.
///
/// These are configuration errors: they are raised once, when the resolver
/// is built, and are fatal to process startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Invalid group name pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Group name pattern {pattern:?} has no capture group named `group`")]
    MissingGroupCapture { pattern: String },

    #[error("Invalid role mapping entry {entry:?}: expected `group=ROLE`")]
    InvalidMappingEntry { entry: String }
}

/// Errors returned by the remote R&D microservice API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Resource not found: {resource}:{id}")]
    NotFound { resource: String, id: String },

    #[error("Microservice returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Microservice request timed out")]
    Timeout,

    #[error("Microservice unreachable: {reason}")]
    Transport { reason: String },

    #[error("Invalid microservice response: {reason}")]
    Decode { reason: String }
}

impl ApiError {
    /// Short, stable label used for metrics and log fields.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::NotFound { .. } => ApiErrorKind::NotFound,
            Self::Upstream { .. } => ApiErrorKind::Upstream,
            Self::Timeout => ApiErrorKind::Timeout,
            Self::Transport { .. } => ApiErrorKind::Transport,
            Self::Decode { .. } => ApiErrorKind::Decode
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    NotFound,
    Upstream,
    Timeout,
    Transport,
    Decode
}

impl ApiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Upstream => "upstream",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
            Self::Decode => "decode"
        }
    }
}
