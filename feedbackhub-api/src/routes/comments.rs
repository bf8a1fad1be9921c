/// Comment endpoints
///
/// - `GET /v1/feedback/:id/comments` - Comments on a feedback item, oldest first
/// - `POST /v1/feedback/:id/comments` - Add a comment
/// - `DELETE /v1/comments/:id` - Delete (author, project owner or admin)
///
/// Reading and writing comments needs access to the feedback's project.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::feedback::load_accessible_feedback,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use feedbackhub_shared::{
    auth::{authorization::require_ownership, middleware::AuthContext},
    models::comment::{Comment, CreateComment},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub content: String,
}

pub async fn list_comments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(feedback_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    load_accessible_feedback(&state, &auth, feedback_id).await?;

    let comments = Comment::list_by_feedback(&state.db, feedback_id).await?;

    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(feedback_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    load_accessible_feedback(&state, &auth, feedback_id).await?;

    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(ApiError::invalid_field("content", "Comment must not be blank"));
    }

    let comment = Comment::create(
        &state.db,
        CreateComment {
            feedback_id,
            author_id: auth.user_id,
            content,
        },
    )
    .await?;

    tracing::info!(comment_id = %comment.id, feedback_id = %feedback_id, "Comment added");

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;

    let (_, project) = load_accessible_feedback(&state, &auth, comment.feedback_id).await?;
    require_ownership(&auth, &[comment.author_id, project.owner_id])?;

    if !Comment::soft_delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    tracing::info!(comment_id = %id, deleted_by = %auth.user_id, "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}
