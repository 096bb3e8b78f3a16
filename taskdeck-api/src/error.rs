/// Error handling for the API server
///
/// One unified error type that maps onto the four-bucket taxonomy the API
/// exposes: validation failures (400), auth failures (401), missing or
/// unowned resources (404), and everything unexpected (500). Handlers
/// return `Result<T, ApiError>` and the conversion to an HTTP response is
/// automatic.
///
/// Internal errors are logged with their detail and answered with a
/// generic message; nothing about the store or its failure modes leaks to
/// clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input (400)
    BadRequest(String),

    /// Per-field validation failures (400)
    Validation(Vec<FieldError>),

    /// Missing/invalid/expired session or bad credentials (401)
    Unauthorized(String),

    /// Resource absent or not owned by the caller (404)
    NotFound(String),

    /// Unexpected failure (500); detail is logged, not returned
    Internal(String),
}

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "validation_error", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional field-level details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Converts `validator` derive output into a 400 with field details
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Internal(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint on the email column surfaces as a
                // validation failure, not a conflict
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Validation(vec![FieldError {
                            field: "email".to_string(),
                            message: "Email is already registered".to_string(),
                        }]);
                    }
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert session resolution errors to API errors
impl From<taskdeck_shared::auth::session::SessionError> for ApiError {
    fn from(err: taskdeck_shared::auth::session::SessionError) -> Self {
        use taskdeck_shared::auth::session::SessionError;

        match err {
            SessionError::MissingToken => {
                ApiError::Unauthorized("No session token provided".to_string())
            }
            SessionError::InvalidToken(msg) => ApiError::Unauthorized(msg),
            SessionError::UnknownUser => ApiError::Unauthorized("Invalid session".to_string()),
            SessionError::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
        }
    }
}

/// Convert token errors to API errors
impl From<taskdeck_shared::auth::token::TokenError> for ApiError {
    fn from(err: taskdeck_shared::auth::token::TokenError) -> Self {
        use taskdeck_shared::auth::token::TokenError;

        match err {
            TokenError::Expired => ApiError::Unauthorized("Token has expired".to_string()),
            TokenError::ValidationError(_) => {
                ApiError::Unauthorized("Invalid session token".to_string())
            }
            TokenError::CreateError(msg) => {
                ApiError::Internal(format!("Token creation failed: {}", msg))
            }
        }
    }
}

/// Convert password errors to API errors
impl From<taskdeck_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskdeck_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}
