/// Project and membership endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects` - Projects the caller owns or belongs to (admins see all)
/// - `POST /v1/projects` - Create a project owned by the caller
/// - `GET /v1/projects/:id` - Project details (owner, member or admin)
/// - `PUT /v1/projects/:id` - Update (owner or admin)
/// - `DELETE /v1/projects/:id` - Soft delete with its feedback (owner or admin)
/// - `GET /v1/projects/:id/members` - List members (owner, member or admin)
/// - `POST /v1/projects/:id/members` - Add a member (owner or admin)
/// - `DELETE /v1/projects/:id/members/:user_id` - Remove a member (owner or admin)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{QueryParams, ValidatedJson},
    routes::{nullable, ListQuery},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use feedbackhub_shared::{
    auth::{
        authorization::{require_project_access, require_project_owner},
        middleware::AuthContext,
    },
    models::{
        project::{CreateProject, Project, UpdateProject},
        project_member::{MemberDetails, ProjectMember},
        user::User,
    },
    pagination::Paginated,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(url(message = "Invalid URL"))]
    pub url: Option<String>,
}

/// Project update; `null` clears `description` or `url`
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(url(message = "Invalid URL"))]
    pub url: Option<Option<String>>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    pub user_id: Uuid,
}

/// Loads a live project or fails with 404
pub(crate) async fn load_project(pool: &PgPool, id: Uuid) -> ApiResult<Project> {
    Project::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

/// Lists visible projects, optionally filtered by `search` (name or description)
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthContext,
    QueryParams(query): QueryParams<ListQuery>,
) -> ApiResult<Json<Paginated<Project>>> {
    let pagination = query.pagination().validate()?;
    let search = query.search();

    // Admins see every project
    let scope = (!auth.is_admin()).then_some(auth.user_id);

    let projects = Project::list_for_user(&state.db, scope, search, pagination).await?;
    let total = Project::count_for_user(&state.db, scope, search).await?;

    Ok(Json(Paginated::new(projects, total, pagination)))
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name.trim().to_string(),
            description: req.description,
            url: req.url,
            owner_id: auth.user_id,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, owner_id = %auth.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = load_project(&state.db, id).await?;
    require_project_access(&state.db, &auth, &project).await?;

    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    let project = load_project(&state.db, id).await?;
    require_project_owner(&auth, &project)?;

    let update = UpdateProject {
        name: req.name.map(|name| name.trim().to_string()),
        description: req.description,
        url: req.url,
        is_active: req.is_active,
    };

    let project = Project::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    tracing::info!(project_id = %project.id, "Project updated");

    Ok(Json(project))
}

/// Soft-deletes the project together with its feedback, comments,
/// attachments and memberships
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let project = load_project(&state.db, id).await?;
    require_project_owner(&auth, &project)?;

    if !Project::soft_delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    tracing::info!(project_id = %id, deleted_by = %auth.user_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<MemberDetails>>> {
    let project = load_project(&state.db, id).await?;
    require_project_access(&state.db, &auth, &project).await?;

    let members = ProjectMember::list_by_project(&state.db, id).await?;

    Ok(Json(members))
}

/// Adds a member
///
/// # Errors
///
/// - `400 Bad Request`: The user is the project owner
/// - `404 Not Found`: Unknown project or user
/// - `409 Conflict`: Already a member
pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<ProjectMember>)> {
    let project = load_project(&state.db, id).await?;
    require_project_owner(&auth, &project)?;

    if req.user_id == project.owner_id {
        return Err(ApiError::BadRequest(
            "The project owner cannot be added as a member".to_string(),
        ));
    }

    if User::find_by_id(&state.db, req.user_id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let member = ProjectMember::add(&state.db, id, req.user_id)
        .await?
        .ok_or_else(|| ApiError::Conflict("User is already a member".to_string()))?;

    tracing::info!(project_id = %id, user_id = %req.user_id, "Member added");

    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn remove_member(
    State(state): State<AppState>,
    auth: AuthContext,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let project = load_project(&state.db, id).await?;
    require_project_owner(&auth, &project)?;

    if !ProjectMember::remove(&state.db, id, user_id).await? {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    tracing::info!(project_id = %id, user_id = %user_id, "Member removed");

    Ok(StatusCode::NO_CONTENT)
}
