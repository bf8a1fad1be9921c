/// Attachment metadata
///
/// Files themselves live in external storage; this table only records
/// where they are and what they look like.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Largest accepted attachment, 10 MiB
pub const MAX_ATTACHMENT_BYTES: i64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub feedback_id: Uuid,
    pub uploader_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,

    #[serde(skip_serializing)]
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAttachment {
    pub feedback_id: Uuid,
    pub uploader_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

impl Attachment {
    pub async fn create(pool: &PgPool, data: CreateAttachment) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Attachment>(
            r#"
            INSERT INTO attachments (feedback_id, uploader_id, file_name, url, mime_type, size_bytes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, feedback_id, uploader_id, file_name, url, mime_type, size_bytes,
                      is_deleted, created_at
            "#,
        )
        .bind(data.feedback_id)
        .bind(data.uploader_id)
        .bind(data.file_name)
        .bind(data.url)
        .bind(data.mime_type)
        .bind(data.size_bytes)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attachment>(
            r#"
            SELECT id, feedback_id, uploader_id, file_name, url, mime_type, size_bytes,
                   is_deleted, created_at
            FROM attachments
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_feedback(pool: &PgPool, feedback_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Attachment>(
            r#"
            SELECT id, feedback_id, uploader_id, file_name, url, mime_type, size_bytes,
                   is_deleted, created_at
            FROM attachments
            WHERE feedback_id = $1 AND is_deleted = FALSE
            ORDER BY created_at
            "#,
        )
        .bind(feedback_id)
        .fetch_all(pool)
        .await
    }

    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE attachments SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
