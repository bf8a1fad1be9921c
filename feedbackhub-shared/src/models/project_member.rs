/// Project membership
///
/// A membership grants a non-owner user read access to a project and its
/// feedback. Removing a member flips `is_deleted`; adding them back
/// revives the same row.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::user::UserRole;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectMember {
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Member row joined with the user's public profile
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberDetails {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub joined_at: DateTime<Utc>,
}

impl ProjectMember {
    /// Adds a member to a project
    ///
    /// Returns None if the user is already an active member.
    pub async fn add(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, ProjectMember>(
            r#"
            INSERT INTO project_members (project_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (project_id, user_id) DO UPDATE
                SET is_deleted = FALSE, created_at = NOW()
                WHERE project_members.is_deleted = TRUE
            RETURNING project_id, user_id, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Removes a member; returns false if they were not a member
    pub async fn remove(pool: &PgPool, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE project_members SET is_deleted = TRUE \
             WHERE project_id = $1 AND user_id = $2 AND is_deleted = FALSE",
        )
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_member(pool: &PgPool, project_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM project_members
                WHERE project_id = $1 AND user_id = $2 AND is_deleted = FALSE
            )
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists active members of a project in join order
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<MemberDetails>, sqlx::Error> {
        sqlx::query_as::<_, MemberDetails>(
            r#"
            SELECT u.id AS user_id, u.email::text AS email, u.first_name, u.last_name, u.role,
                   m.created_at AS joined_at
            FROM project_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.project_id = $1 AND m.is_deleted = FALSE AND u.is_deleted = FALSE
            ORDER BY m.created_at
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
