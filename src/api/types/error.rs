//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Error body: a single message, or the ordered list of field rejections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiErrorBody {
    Single { error: String },
    Many { errors: Vec<String> },
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody::Single {
                error: message.into(),
            },
        }
    }

    /// 400 carrying every field rejection
    pub fn invalid_input(errors: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ApiErrorBody::Many { errors },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// The single message, if this is not a field list
    pub fn message(&self) -> Option<&str> {
        match &self.body {
            ApiErrorBody::Single { error } => Some(error.as_str()),
            ApiErrorBody::Many { .. } => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status.as_u16(), body = ?self.body, "Request failed");
        }

        (self.status, Json(self.body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::InvalidInput { errors } => Self::invalid_input(errors),
            DomainError::Conflict { message } => Self::conflict(message),
            DomainError::Authentication { message } => Self::unauthorized(message),
            DomainError::Storage { message } | DomainError::Internal { message } => {
                Self::internal(message)
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.body {
            ApiErrorBody::Single { error } => write!(f, "{}: {}", self.status, error),
            ApiErrorBody::Many { errors } => write!(f, "{}: {}", self.status, errors.join("; ")),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_error_serialization() {
        let err = ApiError::not_found("User with ID 9 not found");
        let json = serde_json::to_value(&err.body).unwrap();

        assert_eq!(json, serde_json::json!({ "error": "User with ID 9 not found" }));
    }

    #[test]
    fn test_error_list_serialization() {
        let err = ApiError::invalid_input(vec!["a".to_string(), "b".to_string()]);
        let json = serde_json::to_value(&err.body).unwrap();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({ "errors": ["a", "b"] }));
    }

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::invalid_input(["x"]), StatusCode::BAD_REQUEST),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::authentication("x"), StatusCode::UNAUTHORIZED),
            (DomainError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            assert_eq!(ApiError::from(domain_err).status, status);
        }
    }

    #[test]
    fn test_domain_messages_are_passed_through() {
        let api_err = ApiError::from(DomainError::storage("Error reading user data"));
        assert_eq!(api_err.message(), Some("Error reading user data"));
    }
}
