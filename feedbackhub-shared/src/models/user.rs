/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('user', 'manager', 'admin');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     first_name VARCHAR(50) NOT NULL,
///     last_name VARCHAR(50) NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_deleted BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use feedbackhub_shared::models::user::{CreateUser, User};
/// use feedbackhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "olena@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     first_name: "Olena".to_string(),
///     last_name: "Koval".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "OLENA@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::pagination::Pagination;

/// Global user role
///
/// # Permission Hierarchy
///
/// `Admin` > `Manager` > `User`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account; sees own and shared projects
    User,

    /// Can list all users
    Manager,

    /// Full control, including role and status changes
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }

    /// Checks if this role is at least `required`
    pub fn has_permission(&self, required: &UserRole) -> bool {
        self.permission_level() >= required.permission_level()
    }

    fn permission_level(&self) -> u8 {
        match self {
            UserRole::User => 1,
            UserRole::Manager => 2,
            UserRole::Admin => 3,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "manager" => Ok(UserRole::Manager),
            "admin" => Ok(UserRole::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// User account
///
/// The password hash never leaves the server: it is skipped on
/// serialization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT)
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,

    /// Inactive users cannot log in or refresh tokens
    pub is_active: bool,

    #[serde(skip_serializing)]
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
///
/// New accounts always start with the `user` role.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,
}

/// `email` is CITEXT; cast so it decodes as `String`
const USER_COLUMNS: &str = "id, email::text AS email, password_hash, first_name, last_name, role, is_active, \
                            is_deleted, created_at, updated_at, last_login_at";

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a unique-constraint database error if the email is taken
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, first_name, last_name) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.first_name)
            .bind(data.last_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_deleted = FALSE");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address (case-insensitive)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1::citext AND is_deleted = FALSE");

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Updates the last login timestamp, called after successful authentication
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Lists users, newest first, optionally filtered by name or email
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        pagination: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE is_deleted = FALSE \
               AND ($1::text IS NULL OR email::text ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1) \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(search.map(like_pattern))
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM users
            WHERE is_deleted = FALSE
              AND ($1::text IS NULL OR email::text ILIKE $1 OR first_name ILIKE $1 OR last_name ILIKE $1)
            "#,
        )
        .bind(search.map(like_pattern))
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Changes a user's role
    ///
    /// Returns None if the user doesn't exist
    pub async fn update_role(
        pool: &PgPool,
        id: Uuid,
        role: UserRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET role = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Activates or deactivates a user
    pub async fn set_active(
        pool: &PgPool,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET is_active = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(is_active)
            .fetch_optional(pool)
            .await
    }
}

/// Wraps a search term for ILIKE, escaping wildcard characters
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
