//! Response types for the pay-run engine API.
//!
//! This module defines the success and error response structures and the
//! mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{PayRun, PayRunLine};

/// Response body for `POST /pay-runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayRunResponse {
    /// The persisted run header.
    pub run: PayRun,
    /// The persisted lines, one per priced employee.
    pub lines: Vec<PayRunLine>,
    /// Employees skipped for lack of a rate in effect; the caller should
    /// alert an operator.
    pub skipped_employee_ids: Vec<String>,
}

/// Response body for `GET /pay-runs/:run_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunDetailResponse {
    /// The run header with its current totals.
    pub run: PayRun,
    /// The run's lines.
    pub lines: Vec<PayRunLine>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::Validation { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid field '{}': {}", field, message),
                    format!("The field '{}' failed validation", field),
                ),
            },
            EngineError::Conflict { message } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("CONFLICT", message),
            },
            EngineError::Immutability { message } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "PAY_RUN_FINALISED",
                    message,
                    "Finalised pay runs accept no further mutation",
                ),
            },
            EngineError::Computation {
                employee_id,
                message,
            } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "COMPUTATION_ERROR",
                    format!("Cannot compute pay for employee '{}'", employee_id),
                    message,
                ),
            },
            EngineError::Forbidden { actor, action } => ApiErrorResponse {
                status: StatusCode::FORBIDDEN,
                error: ApiError::new(
                    "FORBIDDEN",
                    format!("Actor '{}' is not permitted to {}", actor, action),
                ),
            },
            EngineError::NotFound { entity, id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("NOT_FOUND", format!("{} not found: {}", entity, id)),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Tenant settings error",
                    format!("Tenant settings file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Tenant settings parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let engine_error = EngineError::validation("timezone", "unknown IANA timezone 'X'");
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "VALIDATION_ERROR");
        assert!(api_error.error.message.contains("timezone"));
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let engine_error = EngineError::conflict("duplicate period run");
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.error.code, "CONFLICT");
    }

    #[test]
    fn test_immutability_maps_to_finalised_code() {
        let engine_error = EngineError::Immutability {
            message: "run is finalised".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::CONFLICT);
        assert_eq!(api_error.error.code, "PAY_RUN_FINALISED");
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let engine_error = EngineError::Forbidden {
            actor: "intruder".to_string(),
            action: "edit a pay run line".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::FORBIDDEN);
        assert_eq!(api_error.error.code, "FORBIDDEN");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let engine_error = EngineError::NotFound {
            entity: "pay run".to_string(),
            id: "abc".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
    }
}
