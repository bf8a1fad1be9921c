/// User administration endpoints
///
/// - `GET /v1/users` - List users (manager or admin)
/// - `PATCH /v1/users/:id/role` - Change a user's role (admin)
/// - `PATCH /v1/users/:id/status` - Activate or deactivate a user (admin)
///
/// Admins cannot demote or deactivate themselves.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{QueryParams, ValidatedJson},
    routes::ListQuery,
};
use axum::{
    extract::{Path, State},
    Json,
};
use feedbackhub_shared::{
    auth::{authorization::require_role, middleware::AuthContext},
    models::user::{User, UserRole},
    pagination::Paginated,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub is_active: bool,
}

/// Lists users, optionally filtered by `search` (email or name)
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthContext,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult<Json<Paginated<User>>> {
    require_role(&auth, UserRole::Manager)?;

    let pagination = query.pagination().validate()?;
    let search = query.search();

    let users = User::list(&state.db, search, pagination).await?;
    let total = User::count(&state.db, search).await?;

    Ok(Json(Paginated::new(users, total, pagination)))
}

/// Changes a user's role
///
/// # Errors
///
/// - `403 Forbidden`: Caller is not an admin
/// - `400 Bad Request`: Admin tried to demote themselves
/// - `404 Not Found`: Unknown user
pub async fn update_role(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateRoleRequest>,
) -> ApiResult<Json<User>> {
    require_role(&auth, UserRole::Admin)?;

    if id == auth.user_id && req.role != UserRole::Admin {
        return Err(ApiError::BadRequest("You cannot demote yourself".to_string()));
    }

    let user = User::update_role(&state.db, id, req.role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(
        admin_id = %auth.user_id,
        user_id = %user.id,
        role = %user.role,
        "User role changed"
    );

    Ok(Json(user))
}

/// Activates or deactivates a user
///
/// Deactivated users cannot log in or refresh tokens; access tokens they
/// already hold expire normally.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<Json<User>> {
    require_role(&auth, UserRole::Admin)?;

    if id == auth.user_id && !req.is_active {
        return Err(ApiError::BadRequest(
            "You cannot deactivate yourself".to_string(),
        ));
    }

    let user = User::set_active(&state.db, id, req.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(
        admin_id = %auth.user_id,
        user_id = %user.id,
        is_active = user.is_active,
        "User status changed"
    );

    Ok(Json(user))
}
