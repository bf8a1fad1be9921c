/// Project model and database operations
///
/// A project belongs to exactly one owning user. Other users get access
/// through [`ProjectMember`](super::project_member::ProjectMember) rows.
///
/// # Example
///
/// ```no_run
/// use feedbackhub_shared::models::project::{CreateProject, Project, UpdateProject};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner_id: Uuid) -> Result<(), sqlx::Error> {
/// let project = Project::create(&pool, CreateProject {
///     name: "Landing page".to_string(),
///     description: Some("Spring campaign".to_string()),
///     url: Some("https://example.com".to_string()),
///     owner_id,
/// }).await?;
///
/// let update = UpdateProject {
///     is_active: Some(false),
///     ..Default::default()
/// };
/// Project::update(&pool, project.id, update).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::user::like_pattern;
use crate::pagination::Pagination;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub owner_id: Uuid,

    /// Inactive projects reject anonymous widget submissions
    pub is_active: bool,

    #[serde(skip_serializing)]
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub owner_id: Uuid,
}

/// Input for updating a project
///
/// Only non-None fields are updated. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub url: Option<Option<String>>,
    pub is_active: Option<bool>,
}

const PROJECT_COLUMNS: &str =
    "id, name, description, url, owner_id, is_active, is_deleted, created_at, updated_at";

impl Project {
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, url, owner_id) \
             VALUES ($1, $2, $3, $4) RETURNING {PROJECT_COLUMNS}"
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(data.name)
            .bind(data.description)
            .bind(data.url)
            .bind(data.owner_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query =
            format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1 AND is_deleted = FALSE");

        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Updates a project
    ///
    /// Returns None if the project doesn't exist or is deleted
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", url = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND is_deleted = FALSE RETURNING {PROJECT_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(url) = data.url {
            q = q.bind(url);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        q.fetch_optional(pool).await
    }

    /// Soft-deletes a project with its feedback, their comments and
    /// attachments, and its memberships
    ///
    /// Everything happens in one transaction. Returns false if the project
    /// was not found.
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE projects SET is_deleted = TRUE, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE comments SET is_deleted = TRUE, updated_at = NOW()
            WHERE is_deleted = FALSE
              AND feedback_id IN (SELECT id FROM feedback WHERE project_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE attachments SET is_deleted = TRUE
            WHERE is_deleted = FALSE
              AND feedback_id IN (SELECT id FROM feedback WHERE project_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE feedback SET is_deleted = TRUE, updated_at = NOW() \
             WHERE project_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE project_members SET is_deleted = TRUE \
             WHERE project_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    /// Lists projects visible to a user, newest first
    ///
    /// `user_id = None` lists every project (admin view). Otherwise only
    /// owned projects and projects with an active membership are returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Option<Uuid>,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p \
             WHERE p.is_deleted = FALSE \
               AND ($1::uuid IS NULL OR p.owner_id = $1 OR EXISTS ( \
                    SELECT 1 FROM project_members m \
                    WHERE m.project_id = p.id AND m.user_id = $1 AND m.is_deleted = FALSE)) \
               AND ($2::text IS NULL OR p.name ILIKE $2 OR p.description ILIKE $2) \
             ORDER BY p.created_at DESC \
             LIMIT $3 OFFSET $4"
        );

        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(search.map(like_pattern))
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count_for_user(
        pool: &PgPool,
        user_id: Option<Uuid>,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM projects p
            WHERE p.is_deleted = FALSE
              AND ($1::uuid IS NULL OR p.owner_id = $1 OR EXISTS (
                   SELECT 1 FROM project_members m
                   WHERE m.project_id = p.id AND m.user_id = $1 AND m.is_deleted = FALSE))
              AND ($2::text IS NULL OR p.name ILIKE $2 OR p.description ILIKE $2)
            "#,
        )
        .bind(user_id)
        .bind(search.map(like_pattern))
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
