//! HTTP request handlers.
//!
//! Entity handlers check the caller's role first, then the payload, then
//! forward to the microservice.

pub mod characteristics;
pub mod ingredients;
pub mod models;
pub mod processes;
pub mod series;
pub mod system;

use errors::ApiError;
use rnd_core::EntityInput;
use validator::Validate;

use crate::error::GatewayError;
use crate::telemetry;

/// Required fields present, then field validation.
pub(crate) fn check_create<T: EntityInput>(input: &T, invalid: &str) -> Result<(), GatewayError> {
    let missing = input.missing_on_create();
    if !missing.is_empty() {
        return Err(GatewayError::bad_request(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }
    input
        .validate()
        .map_err(|errors| GatewayError::invalid(invalid, &errors))
}

/// Non-empty payload, then field validation.
pub(crate) fn check_update<T: EntityInput>(input: &T, invalid: &str) -> Result<(), GatewayError> {
    if input.is_empty() {
        return Err(GatewayError::bad_request("No data provided for update"));
    }
    input
        .validate()
        .map_err(|errors| GatewayError::invalid(invalid, &errors))
}

/// Counts the operation and its upstream failure, if any.
pub(crate) fn track<T>(
    entity: &'static str,
    operation: &'static str,
    result: Result<T, ApiError>
) -> Result<T, GatewayError> {
    telemetry::record_request(entity, operation);
    result.map_err(|e| {
        if !e.is_not_found() {
            telemetry::record_upstream_error(entity, e.kind().as_str());
        }
        GatewayError::from(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rnd_core::{IngredientInput, ModelInput};

    #[test]
    fn test_check_create_reports_missing_fields() {
        let input = IngredientInput {
            name: Some("Cocoa".to_string()),
            description: None
        };
        match check_create(&input, "Invalid ingredient").unwrap_err() {
            GatewayError::BadRequest { message, .. } => {
                assert_eq!(message, "Missing required fields: description");
            }
            other => panic!("unexpected error: {other:?}")
        }
    }

    #[test]
    fn test_check_update_rejects_empty_payload() {
        assert!(matches!(
            check_update(&ModelInput::default(), "Invalid update"),
            Err(GatewayError::BadRequest { .. })
        ));
    }

    #[test]
    fn test_check_update_validates_present_fields() {
        let input = ModelInput {
            series_id: Some(0),
            ..Default::default()
        };
        match check_update(&input, "Invalid update").unwrap_err() {
            GatewayError::BadRequest { errors, .. } => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other:?}")
        }
    }

    #[test]
    fn test_track_passes_values_through() {
        assert_eq!(track("series", "list", Ok::<_, ApiError>(3)).unwrap(), 3);
        assert!(matches!(
            track::<()>("series", "list", Err(ApiError::Timeout)),
            Err(GatewayError::Api(ApiError::Timeout))
        ));
    }
}
