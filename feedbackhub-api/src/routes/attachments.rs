/// Attachment metadata endpoints
///
/// Files are uploaded to external storage by the client; these endpoints
/// only record where a file lives and what it is.
///
/// - `GET /v1/feedback/:id/attachments`
/// - `POST /v1/feedback/:id/attachments`
/// - `DELETE /v1/attachments/:id` - Uploader, project owner or admin

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
    models::attachment::{Attachment, CreateAttachment},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAttachmentRequest {
    #[validate(length(min = 1, max = 255, message = "File name must be 1-255 characters"))]
    pub file_name: String,

    #[validate(url(message = "Invalid URL"))]
    pub url: String,

    #[validate(length(min = 1, max = 100, message = "MIME type must be 1-100 characters"))]
    pub mime_type: String,

    #[validate(range(min = 1, max = 10485760, message = "File size must be between 1 byte and 10 MiB"))]
    pub size_bytes: i64,
}

pub async fn list_attachments(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(feedback_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Attachment>>> {
    load_accessible_feedback(&state, &auth, feedback_id).await?;

    let attachments = Attachment::list_by_feedback(&state.db, feedback_id).await?;

    Ok(Json(attachments))
}

pub async fn create_attachment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(feedback_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateAttachmentRequest>,
) -> ApiResult<(StatusCode, Json<Attachment>)> {
    load_accessible_feedback(&state, &auth, feedback_id).await?;

    let attachment = Attachment::create(
        &state.db,
        CreateAttachment {
            feedback_id,
            uploader_id: auth.user_id,
            file_name: req.file_name.trim().to_string(),
            url: req.url,
            mime_type: req.mime_type,
            size_bytes: req.size_bytes,
        },
    )
    .await?;

    tracing::info!(
        attachment_id = %attachment.id,
        feedback_id = %feedback_id,
        size_bytes = attachment.size_bytes,
        "Attachment recorded"
    );

    Ok((StatusCode::CREATED, Json(attachment)))
}

pub async fn delete_attachment(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let attachment = Attachment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Attachment not found".to_string()))?;

    let (_, project) = load_accessible_feedback(&state, &auth, attachment.feedback_id).await?;
    require_ownership(&auth, &[attachment.uploader_id, project.owner_id])?;

    if !Attachment::soft_delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Attachment not found".to_string()));
    }

    tracing::info!(attachment_id = %id, deleted_by = %auth.user_id, "Attachment deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedbackhub_shared::models::attachment::MAX_ATTACHMENT_BYTES;

    fn request(size_bytes: i64) -> CreateAttachmentRequest {
        CreateAttachmentRequest {
            file_name: "screenshot.png".to_string(),
            url: "https://files.example.com/screenshot.png".to_string(),
            mime_type: "image/png".to_string(),
            size_bytes,
        }
    }

    #[test]
    fn test_size_limits() {
        assert!(request(1).validate().is_ok());
        assert!(request(MAX_ATTACHMENT_BYTES).validate().is_ok());
        assert!(request(0).validate().is_err());
        assert!(request(MAX_ATTACHMENT_BYTES + 1).validate().is_err());
    }

    #[test]
    fn test_file_name_and_url() {
        let mut req = request(1024);
        req.file_name = "a".repeat(256);
        req.url = "files/screenshot.png".to_string();

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("file_name"));
        assert!(fields.contains_key("url"));
    }
}
