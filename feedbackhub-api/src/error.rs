/// Error handling for the API server
///
/// All handlers return `ApiResult<T>`; `ApiError` converts into a JSON
/// response of the form:
///
/// ```json
/// { "error": "validation_error", "message": "Request validation failed", "details": [...] }
/// ```
///
/// Library errors (database, auth, validation, pagination, analyzer) convert
/// with `?` through the `From` impls below.
///
/// # Example
///
/// ```
/// use feedbackhub_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(id: Option<u32>) -> ApiResult<Json<serde_json::Value>> {
///     let id = id.ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;
///     Ok(Json(json!({ "id": id })))
/// }
/// ```

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use feedbackhub_analyzer::AnalyzerError;
use feedbackhub_shared::auth::{
    authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError,
};
use feedbackhub_shared::pagination::PaginationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Too many requests (429)
    RateLimitExceeded { retry_after: u64, message: String },

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

impl ApiError {
    /// Single-field validation error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: field.into(),
            message: message.into(),
        }])
    }
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::RateLimitExceeded { message, .. } => {
                write!(f, "Rate limit exceeded: {}", message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let retry_after = match &self {
            ApiError::RateLimitExceeded { retry_after, .. } => Some(*retry_after),
            _ => None,
        };

        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::RateLimitExceeded { message, .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limit_exceeded",
                message,
                None,
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        let mut response = (status, body).into_response();
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    if db_err.constraint().is_some_and(|c| c.contains("email")) {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    return ApiError::Conflict("Resource already exists".to_string());
                }
                if db_err.is_foreign_key_violation() {
                    return ApiError::BadRequest("Referenced resource does not exist".to_string());
                }
                if db_err.is_check_violation() {
                    return ApiError::BadRequest("Value out of allowed range".to_string());
                }

                // Other database errors are internal
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert `validator` errors into 422 details, sorted by field
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code)),
                })
            })
            .collect();

        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(details)
    }
}

impl From<PaginationError> for ApiError {
    fn from(err: PaginationError) -> Self {
        ApiError::invalid_field(err.field(), err.to_string())
    }
}

/// Convert auth errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
        }
    }
}

/// Convert authorization errors to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::InsufficientRole { .. } => {
                ApiError::Forbidden("Insufficient permissions".to_string())
            }
            AuthzError::NoProjectAccess(_) => {
                ApiError::Forbidden("No access to this project".to_string())
            }
            AuthzError::NotAuthorized => {
                ApiError::Forbidden("Not authorized to access this resource".to_string())
            }
            AuthzError::DatabaseError(err) => ApiError::from(err),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => {
                ApiError::Unauthorized("Invalid token issuer".to_string())
            }
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

/// Convert analyzer errors to API errors
///
/// Only used where analysis is the whole point of the request; feedback
/// creation treats analyzer failures as non-fatal.
impl From<AnalyzerError> for ApiError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            AnalyzerError::Failed(msg) => ApiError::InternalError(format!("Analysis failed: {}", msg)),
        }
    }
}
