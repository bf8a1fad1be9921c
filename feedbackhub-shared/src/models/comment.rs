/// Comments on feedback

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub feedback_id: Uuid,
    pub author_id: Uuid,
    pub content: String,

    #[serde(skip_serializing)]
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateComment {
    pub feedback_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
}

impl Comment {
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (feedback_id, author_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, feedback_id, author_id, content, is_deleted, created_at, updated_at
            "#,
        )
        .bind(data.feedback_id)
        .bind(data.author_id)
        .bind(data.content)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, feedback_id, author_id, content, is_deleted, created_at, updated_at
            FROM comments
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a feedback item's comments, oldest first
    pub async fn list_by_feedback(pool: &PgPool, feedback_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, feedback_id, author_id, content, is_deleted, created_at, updated_at
            FROM comments
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
            "UPDATE comments SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
