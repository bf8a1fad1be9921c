/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Exchange a refresh token for a new access token
/// - `POST /v1/auth/logout` - Clear the refresh cookie
/// - `GET /v1/auth/me` - Current user profile
///
/// # Token Delivery
///
/// Access tokens are returned in the JSON body and sent back as
/// `Authorization: Bearer <token>`. Refresh tokens travel in an httpOnly
/// `refresh_token` cookie scoped to `/v1/auth`; clients that cannot use
/// cookies may post `{"refresh_token": "..."}` to the refresh endpoint.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use feedbackhub_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

const REFRESH_COOKIE: &str = "refresh_token";
const REFRESH_COOKIE_PATH: &str = "/v1/auth";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 50, message = "First name must be 1-50 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name must be 1-50 characters"))]
    pub last_name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Refresh token request body (cookie takes precedence)
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Response for register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    pub token_type: &'static str,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Register a new user
///
/// New accounts get the `user` role.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "olena@example.com",
///   "password": "secret1",
///   "first_name": "Olena",
///   "last_name": "Koval"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<Response> {
    let email = req.email.trim().to_string();

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
            first_name: req.first_name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    session_response(&state, StatusCode::CREATED, user)
}

/// Login endpoint
///
/// Verifies the password, rejects deactivated accounts and records the
/// login time.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password
/// - `403 Forbidden`: Account is deactivated
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Response> {
    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Failed login attempt");
        return Err(invalid());
    }

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is deactivated".to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    session_response(&state, StatusCode::OK, user)
}

/// Exchanges a refresh token for a new access token
///
/// The user is reloaded so role changes and deactivation take effect
/// immediately. A new refresh cookie is issued alongside.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing, invalid or expired refresh token, or the
///   user no longer exists or is deactivated
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> ApiResult<Response> {
    let body_token = body.and_then(|Json(req)| req.refresh_token);
    let token = cookie_value(&headers, REFRESH_COOKIE)
        .map(str::to_string)
        .or(body_token)
        .ok_or_else(|| ApiError::Unauthorized("Refresh token required".to_string()))?;

    let claims = jwt::validate_refresh_token(&token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .filter(|user| user.is_active)
        .ok_or_else(|| ApiError::Unauthorized("User not found or inactive".to_string()))?;

    let tokens = issue_tokens(&state, &user)?;
    let cookie = refresh_cookie(&state, &tokens.refresh_token)?;

    tracing::debug!(user_id = %user.id, "Access token refreshed");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(RefreshResponse {
            access_token: tokens.access_token,
            token_type: "Bearer",
            expires_in: tokens.expires_in,
        }),
    )
        .into_response())
}

/// Clears the refresh cookie
///
/// Access tokens are stateless and stay valid until they expire.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = expired_cookie(state.config.api.production);

    (
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({ "message": "Logged out" })),
    )
        .into_response()
}

/// Returns the authenticated user's profile
pub async fn me(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

fn issue_tokens(state: &AppState, user: &User) -> ApiResult<jwt::TokenPair> {
    let tokens = jwt::issue_token_pair(
        user.id,
        user.role,
        state.jwt_secret(),
        state.config.jwt.access_ttl(),
        state.config.jwt.refresh_ttl(),
    )?;

    Ok(tokens)
}

fn session_response(state: &AppState, status: StatusCode, user: User) -> ApiResult<Response> {
    let tokens = issue_tokens(state, &user)?;
    let cookie = refresh_cookie(state, &tokens.refresh_token)?;

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            user,
            access_token: tokens.access_token,
            token_type: "Bearer",
            expires_in: tokens.expires_in,
        }),
    )
        .into_response())
}

fn refresh_cookie(state: &AppState, token: &str) -> ApiResult<HeaderValue> {
    let max_age = state.config.jwt.refresh_ttl().num_seconds();
    let cookie = build_cookie(token, max_age, state.config.api.production);

    HeaderValue::from_str(&cookie)
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie value: {}", e)))
}

fn expired_cookie(secure: bool) -> HeaderValue {
    HeaderValue::from_static(if secure {
        "refresh_token=; HttpOnly; SameSite=Strict; Path=/v1/auth; Max-Age=0; Secure"
    } else {
        "refresh_token=; HttpOnly; SameSite=Strict; Path=/v1/auth; Max-Age=0"
    })
}

fn build_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path={}; Max-Age={}",
        REFRESH_COOKIE, token, REFRESH_COOKIE_PATH, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Finds a cookie by name in the `Cookie` headers
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
