//! Error types for the R&D gateway.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response}
};
use config::ConfigError;
use errors::{ApiError, SecurityError};
use security::AccessDenied;
use thiserror::Error;

use crate::envelope::Envelope;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// No principal was forwarded with the request.
    #[error("Authentication required")]
    Unauthenticated,

    /// The principal lacks the role the operation requires.
    #[error(transparent)]
    Forbidden(#[from] AccessDenied),

    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Vec<String>
    },

    /// Failure reported by, or while reaching, the R&D microservice.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Role resolution error: {0}")]
    Security(#[from] SecurityError),

    /// Startup and listener failures.
    #[error("Server error: {reason}")]
    Server { reason: String }
}

impl GatewayError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            errors: Vec::new()
        }
    }

    /// 400 listing every field that failed validation as `field: reason`.
    pub fn invalid(message: impl Into<String>, errors: &validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                field_errors.iter().map(move |error| {
                    let reason = error.message.as_ref().unwrap_or(&error.code);
                    format!("{field}: {reason}")
                })
            })
            .collect();
        details.sort();

        Self::BadRequest {
            message: message.into(),
            errors: details
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Api(ApiError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Api(_) | Self::Config(_) | Self::Security(_) | Self::Server { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: "Invalid JSON body".to_string(),
            errors: vec![rejection.body_text()]
        }
    }
}

impl From<PathRejection> for GatewayError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest {
            message: "Invalid path parameter".to_string(),
            errors: vec![rejection.body_text()]
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, errors) = match self {
            Self::BadRequest { message, errors } => (message, errors),
            Self::Api(ApiError::NotFound { resource, id }) => {
                tracing::debug!(resource = %resource, id = %id, "Entity not found");
                (format!("{} not found", capitalize(&resource)), Vec::new())
            }
            Self::Api(e) => {
                tracing::error!(error = %e, kind = e.kind().as_str(), "Microservice call failed");
                (e.to_string(), Vec::new())
            }
            Self::Config(_) | Self::Security(_) | Self::Server { .. } => {
                tracing::error!(error = %self, "Internal error");
                ("An internal error occurred".to_string(), Vec::new())
            }
            other => (other.to_string(), Vec::new())
        };

        (status, Json(Envelope::error(message, errors))).into_response()
    }
}
