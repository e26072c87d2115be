//! API error type mapping domain errors to the JSON envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::DomainError;

/// Error payload: `{"success": false, "error": "..."}`
///
/// `error` is a string for single failures and an array of messages for
/// field validation failures.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub success: bool,
    pub error: Value,
}

/// API error with its HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: Value::String(message.into()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// 400 carrying the full list of field validation messages
    pub fn validation_messages(messages: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: Value::Array(messages.into_iter().map(Value::String).collect()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            success: false,
            error: self.error,
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Conflict { message } => Self::bad_request(message),
            DomainError::Capacity { message } => Self::bad_request(message),
            DomainError::Auth { message } => Self::unauthorized(message),
            DomainError::Storage { message } | DomainError::Internal { message } => {
                // Detail stays in the logs; the client gets a generic reason
                tracing::error!(error = %message, "Internal error");
                Self::internal("Server error")
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for '{}'", field),
                })
            })
            .collect();

        Self::validation_messages(messages)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.error)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_status_mapping() {
        let cases = [
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::conflict("x"), StatusCode::BAD_REQUEST),
            (DomainError::capacity("x"), StatusCode::BAD_REQUEST),
            (DomainError::auth("x"), StatusCode::UNAUTHORIZED),
            (DomainError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_internal_errors_are_generic() {
        let err = ApiError::from(DomainError::storage("connection refused to 10.0.0.1"));

        assert_eq!(err.error, Value::String("Server error".to_string()));
    }

    #[test]
    fn test_body_serialization() {
        let body = ApiErrorBody {
            success: false,
            error: Value::String("Email already exists".to_string()),
        };

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"Email already exists"}"#);
    }

    #[test]
    fn test_validation_messages_are_a_list() {
        let err = ApiError::validation_messages(vec![
            "Full name is required".to_string(),
            "Please provide a valid email".to_string(),
        ]);

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.is_array());
        assert_eq!(err.error.as_array().unwrap().len(), 2);
    }
}
