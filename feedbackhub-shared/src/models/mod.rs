/// Database models
///
/// Each model owns its SQL: rows are plain structs deriving `sqlx::FromRow`
/// and operations are associated async functions taking a `&PgPool`.
///
/// Reads never return soft-deleted rows. Deletes are soft and cascade to
/// child rows inside a single transaction.

pub mod attachment;
pub mod comment;
pub mod feedback;
pub mod project;
pub mod project_member;
pub mod user;
