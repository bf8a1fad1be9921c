/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the user id and role, so the API
/// can authorize most requests without a database round trip.
///
/// # Token Types
///
/// - **Access Token**: Short-lived (15 minutes by default), sent as
///   `Authorization: Bearer <token>`
/// - **Refresh Token**: Long-lived (7 days by default), stored in an
///   httpOnly cookie and exchanged for new access tokens
///
/// # Example
///
/// ```
/// use feedbackhub_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use feedbackhub_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let claims = Claims::new(user_id, UserRole::Manager, TokenType::Access);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, user_id);
/// assert_eq!(validated.role, UserRole::Manager);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Token issuer
pub const ISSUER: &str = "feedbackhub";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },

    /// Token type mismatch (refresh used as access or vice versa)
    #[error("Expected {expected} token, got {actual} token")]
    WrongTokenType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::minutes(15),
            TokenType::Refresh => Duration::days(7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus the user's role
/// and the token type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "feedbackhub"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Role at the time the token was issued
    pub role: UserRole,

    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims with the default expiration for the token type
    pub fn new(user_id: Uuid, role: UserRole, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, role, token_type, token_type.default_expiration())
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(
        user_id: Uuid,
        role: UserRole,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            role,
            token_type,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Seconds until expiration (None when already expired)
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Access and refresh token issued together on login/register
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Issues an access/refresh token pair for a user
///
/// # Errors
///
/// Returns `JwtError::CreateError` if signing fails
pub fn issue_token_pair(
    user_id: Uuid,
    role: UserRole,
    secret: &str,
    access_ttl: Duration,
    refresh_ttl: Duration,
) -> Result<TokenPair, JwtError> {
    let access = Claims::with_expiration(user_id, role, TokenType::Access, access_ttl);
    let refresh = Claims::with_expiration(user_id, role, TokenType::Refresh, refresh_ttl);

    Ok(TokenPair {
        access_token: create_token(&access, secret)?,
        refresh_token: create_token(&refresh, secret)?,
        expires_in: access_ttl.num_seconds(),
    })
}

/// Creates a signed JWT from claims
///
/// The secret should be at least 32 bytes; the API enforces this at startup.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT and extracts its claims
///
/// Verifies signature, expiration, not-before and issuer.
///
/// # Errors
///
/// - `JwtError::Expired` when `exp` has passed
/// - `JwtError::InvalidIssuer` when `iss` is not "feedbackhub"
/// - `JwtError::ValidationError` for everything else
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks it is an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_typed(token, secret, TokenType::Access)
}

/// Validates a token and checks it is a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_typed(token, secret, TokenType::Refresh)
}

fn validate_typed(token: &str, secret: &str, expected: TokenType) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != expected {
        return Err(JwtError::WrongTokenType {
            expected: expected.as_str(),
            actual: claims.token_type.as_str(),
        });
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::minutes(15));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(7));
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, UserRole::Admin, TokenType::Access);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "feedbackhub");
        assert_eq!(claims.role, UserRole::Admin);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            UserRole::User,
            TokenType::Access,
            Duration::hours(1),
        );

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500);
        assert!(time_left.num_seconds() <= 3600);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, UserRole::Manager, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.role, UserRole::Manager);
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, "another-secret-key-at-least-32-bytes").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            UserRole::User,
            TokenType::Access,
            Duration::seconds(-3600),
        );
        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let access = create_token(
            &Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Access),
            SECRET,
        )
        .unwrap();
        let refresh = create_token(
            &Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Refresh),
            SECRET,
        )
        .unwrap();

        assert!(validate_access_token(&access, SECRET).is_ok());
        assert!(validate_refresh_token(&refresh, SECRET).is_ok());
        assert!(matches!(
            validate_access_token(&refresh, SECRET),
            Err(JwtError::WrongTokenType { expected: "access", .. })
        ));
        assert!(validate_refresh_token(&access, SECRET).is_err());
    }

    #[test]
    fn test_issue_token_pair() {
        let user_id = Uuid::new_v4();
        let pair = issue_token_pair(
            user_id,
            UserRole::User,
            SECRET,
            Duration::minutes(15),
            Duration::days(7),
        )
        .unwrap();

        assert_eq!(pair.expires_in, 900);
        assert_eq!(validate_access_token(&pair.access_token, SECRET).unwrap().sub, user_id);
        assert_eq!(validate_refresh_token(&pair.refresh_token, SECRET).unwrap().sub, user_id);
    }
}
