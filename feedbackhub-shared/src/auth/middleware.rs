/// Request authentication for Axum
///
/// Parses `Authorization: Bearer <token>` headers, validates the access
/// token and produces an [`AuthContext`]. The API's auth layer inserts the
/// context into request extensions; handlers then take it as an extractor.
///
/// # Example
///
/// ```no_run
/// use feedbackhub_shared::auth::middleware::AuthContext;
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("Hello, user {} ({})!", auth.user_id, auth.role)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, Claims, JwtError};
use crate::models::user::UserRole;

/// Authenticated caller, added to request extensions by the auth layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Role carried by the access token
    pub role: UserRole,
}

impl AuthContext {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Error type for request authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            AuthError::MissingCredentials => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AuthError::InvalidFormat(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AuthError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
        };

        let body = Json(serde_json::json!({
            "error": code,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

/// Extracts the bearer token from request headers
///
/// # Errors
///
/// - `AuthError::MissingCredentials` when no Authorization header is present
/// - `AuthError::InvalidFormat` when the header is not `Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Authenticates a request from its headers
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_access_token(token, secret)?;
    Ok(AuthContext::from_claims(&claims))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, TokenType};
    use axum::http::HeaderValue;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_auth_context_from_claims() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, UserRole::Admin, TokenType::Access);

        let context = AuthContext::from_claims(&claims);
        assert_eq!(context.user_id, user_id);
        assert!(context.is_admin());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Basic abc")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_authenticate_rejects_refresh_token() {
        let claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Refresh);
        let token = create_token(&claims, SECRET).unwrap();

        let result = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_authenticate_accepts_access_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, UserRole::Manager, TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let context = authenticate(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(context, AuthContext::new(user_id, UserRole::Manager));
    }

    #[test]
    fn test_auth_error_into_response() {
        assert_eq!(
            AuthError::MissingCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidFormat("test".to_string()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidToken("test".to_string()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
