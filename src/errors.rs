//! Centralized error handling.
//!
//! Provides a unified error type for the entire application and the
//! `ApiError` body every failed request is answered with.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::MSG_VALIDATION_ERROR;

/// Field name -> message of the first rule that field violates.
pub type ValidationErrorMap = BTreeMap<String, String>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(ValidationErrorMap),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(_) => MSG_VALIDATION_ERROR.to_string(),
            AppError::BadRequest(msg) => msg.clone(),

            // Hide details for internal errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        }
    }

    /// Build the response body for a request made to `url`.
    pub fn into_api_error(self, url: impl Into<String>) -> ApiError {
        let status = self.status();
        let message = self.user_message();
        let validation_errors = match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        };

        ApiError {
            status,
            body: ApiErrorBody {
                url: url.into(),
                timestamp: chrono::Utc::now().timestamp_millis(),
                message,
                validation_errors,
            },
        }
    }
}

/// Convenience constructors
impl AppError {
    /// Validation failure on a single field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrorMap::new();
        errors.insert(name.into(), message.into());
        AppError::Validation(errors)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

/// Failed request: HTTP status plus the body sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorBody,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ApiErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Error body returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Path of the rejected request
    #[schema(example = "/api/1.0/users")]
    pub url: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[schema(example = "validation error")]
    pub message: String,
    /// One entry per invalid field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<BTreeMap<String, String>>,
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::field("username", "Username cannot be null");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.user_message(), "validation error");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::internal("argon2 exploded");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "An internal error occurred");

        let err = AppError::from(sea_orm::DbErr::Custom("connection reset".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.user_message().contains("connection reset"));
    }

    #[test]
    fn test_api_error_carries_field_errors() {
        let api_error = AppError::field("password", "Cannot be null").into_api_error("/api/1.0/users");

        assert_eq!(api_error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api_error.body().url, "/api/1.0/users");
        assert!(api_error.body().timestamp > 0);

        let json = serde_json::to_value(api_error.body()).unwrap();
        assert_eq!(json["validationErrors"]["password"], "Cannot be null");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_api_error_omits_empty_validation_map() {
        let api_error = AppError::bad_request("Expected request with `Content-Type: application/json`")
            .into_api_error("/api/1.0/users");

        assert_eq!(api_error.status(), StatusCode::BAD_REQUEST);
        let json = serde_json::to_value(api_error.body()).unwrap();
        assert!(json.get("validationErrors").is_none());
        assert_eq!(
            json["message"],
            "Expected request with `Content-Type: application/json`"
        );
    }
}
