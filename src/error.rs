// HTTP API error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::store::StoreError;

/// One entry per violated validation rule, so a field breaking two rules
/// produces two entries.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// API error taxonomy with stable codes and client-safe messages.
///
/// Two compatibility quirks are deliberate: duplicate usernames and missing
/// users both answer 400 (not 409/404). Internal errors never echo store
/// detail to the client; the real error is logged where the conversion
/// happens.
#[derive(Debug)]
pub enum ApiError {
    // 422 Unprocessable Entity (registration only)
    Validation { message: String, errors: Vec<FieldError> },

    // 400 Bad Request
    Duplicate(String),
    NotFound(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Duplicate(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Duplicate(_) => "DUPLICATE",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::Duplicate(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Internal(msg) => msg,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { message, errors } => json!({
                "error": true,
                "message": message,
                "code": self.error_code(),
                "errors": errors,
            }),
            _ => json!({
                "error": true,
                "message": self.message(),
                "code": self.error_code(),
            }),
        }
    }

    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        ApiError::Validation { message: message.into(), errors }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        ApiError::Duplicate(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(username) => {
                ApiError::duplicate(format!("{username} already exists"))
            }
            StoreError::NotFound(username) => {
                ApiError::not_found(format!("{username} was not found"))
            }
            StoreError::Query(msg) => {
                // Log the real error but keep the client message generic
                tracing::error!("store error: {msg}");
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            AuthError::InvalidToken(msg) => {
                tracing::debug!("token rejected: {msg}");
                ApiError::unauthorized("invalid or expired token")
            }
            AuthError::TokenGeneration(msg) | AuthError::Hashing(msg) => {
                tracing::error!("auth error: {msg}");
                ApiError::internal("An error occurred while processing your request")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
