//! JSON envelope shared by every entity endpoint.
//!
//! ```json
//! {"status": "success", "data": {...}}
//! {"status": "success", "data": {...}, "message": "Process validated successfully"}
//! {"status": "success", "message": "Model deleted successfully"}
//! {"status": "error", "message": "Invalid model", "errors": ["name: must not be blank"]}
//! ```

use axum::{Json, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            message: None,
            errors: Vec::new()
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            data: None,
            message: Some(message.into()),
            errors: Vec::new()
        }
    }

    pub fn error(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status: Status::Error,
            data: None,
            message: Some(message.into()),
            errors
        }
    }
}

/// Status code and envelope returned by a successful handler.
pub type Reply<T> = (StatusCode, Json<Envelope<T>>);

pub fn ok<T>(data: T) -> Reply<T> {
    (StatusCode::OK, Json(Envelope::success(data)))
}

pub fn created<T>(data: T) -> Reply<T> {
    (StatusCode::CREATED, Json(Envelope::success(data)))
}

/// 200 with both the entity and a confirmation message.
pub fn ok_with_message<T>(data: T, message: impl Into<String>) -> Reply<T> {
    (
        StatusCode::OK,
        Json(Envelope::success(data).with_message(message))
    )
}

pub fn done(message: impl Into<String>) -> Reply<()> {
    (StatusCode::OK, Json(Envelope::message(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_empty_fields() {
        let value = serde_json::to_value(Envelope::success(json!({"id": 1}))).unwrap();
        assert_eq!(value, json!({"status": "success", "data": {"id": 1}}));
    }

    #[test]
    fn test_error_with_details() {
        let value = serde_json::to_value(Envelope::error(
            "Invalid model",
            vec!["name: must not be blank".to_string()]
        ))
        .unwrap();
        assert_eq!(
            value,
            json!({
                "status": "error",
                "message": "Invalid model",
                "errors": ["name: must not be blank"]
            })
        );
    }

    #[test]
    fn test_done_is_message_only() {
        let (status, Json(envelope)) = done("Model deleted successfully");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({"status": "success", "message": "Model deleted successfully"})
        );
    }

    #[test]
    fn test_data_with_message() {
        let (status, Json(envelope)) =
            ok_with_message(json!({"id": "p-1"}), "Process validated successfully");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(envelope).unwrap(),
            json!({
                "status": "success",
                "data": {"id": "p-1"},
                "message": "Process validated successfully"
            })
        );
    }
}
