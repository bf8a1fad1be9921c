/// Feedback model and database operations
///
/// Feedback belongs to exactly one project. It is written either by a
/// registered user (`author_id`) or anonymously through the embeddable
/// widget (`author_email`, `author_name`). Widget submissions usually carry
/// click coordinates, the viewport size and a CSS selector.
///
/// The keyword analysis is stored as a JSONB blob in `ai_analysis`; it is
/// `NULL` until the analyzer succeeds.
///
/// # Example
///
/// ```no_run
/// use feedbackhub_shared::models::feedback::{Feedback, FeedbackFilter, FeedbackStatus};
/// use feedbackhub_shared::pagination::Pagination;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, project_id: Uuid) -> Result<(), sqlx::Error> {
/// let filter = FeedbackFilter {
///     status: Some(FeedbackStatus::Open),
///     ..Default::default()
/// };
///
/// let open = Feedback::list_by_project(&pool, project_id, &filter, Pagination::default()).await?;
/// println!("{} open items on this page", open.len());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use feedbackhub_analyzer::{FeedbackAnalysis, Priority};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::user::like_pattern;
use crate::pagination::Pagination;

/// Feedback priority as stored in Postgres
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "feedback_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl FeedbackPriority {
    pub fn as_str(&self) -> &'static str {
        Priority::from(*self).as_str()
    }
}

impl From<Priority> for FeedbackPriority {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Low => FeedbackPriority::Low,
            Priority::Medium => FeedbackPriority::Medium,
            Priority::High => FeedbackPriority::High,
            Priority::Critical => FeedbackPriority::Critical,
        }
    }
}

impl From<FeedbackPriority> for Priority {
    fn from(priority: FeedbackPriority) -> Self {
        match priority {
            FeedbackPriority::Low => Priority::Low,
            FeedbackPriority::Medium => Priority::Medium,
            FeedbackPriority::High => Priority::High,
            FeedbackPriority::Critical => Priority::Critical,
        }
    }
}

/// Workflow status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "feedback_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Open => "open",
            FeedbackStatus::InProgress => "in_progress",
            FeedbackStatus::Resolved => "resolved",
            FeedbackStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub priority: FeedbackPriority,
    pub status: FeedbackStatus,

    /// Category supplied by the caller, if any
    pub category: Option<String>,

    pub project_id: Uuid,

    /// Registered author (None for widget submissions)
    pub author_id: Option<Uuid>,

    /// Anonymous author contact
    pub author_email: Option<String>,
    pub author_name: Option<String>,

    pub assignee_id: Option<Uuid>,

    /// Click position within the page
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub viewport_width: Option<i32>,
    pub viewport_height: Option<i32>,

    /// CSS selector of the element the feedback points at
    pub selector: Option<String>,
    pub page_url: Option<String>,

    pub ai_analysis: Option<Json<FeedbackAnalysis>>,

    #[serde(skip_serializing)]
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    /// Stored analysis, if one was generated
    pub fn analysis(&self) -> Option<&FeedbackAnalysis> {
        self.ai_analysis.as_ref().map(|json| &json.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateFeedback {
    pub title: String,
    pub description: String,
    pub priority: FeedbackPriority,
    pub category: Option<String>,
    pub project_id: Uuid,
    pub author_id: Option<Uuid>,
    pub author_email: Option<String>,
    pub author_name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub viewport_width: Option<i32>,
    pub viewport_height: Option<i32>,
    pub selector: Option<String>,
    pub page_url: Option<String>,
}

/// Input for updating feedback
///
/// Only non-None fields are updated. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct UpdateFeedback {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<FeedbackPriority>,
    pub status: Option<FeedbackStatus>,
    pub category: Option<Option<String>>,
    pub assignee_id: Option<Option<Uuid>>,
}

/// List filters for a project's feedback
#[derive(Debug, Clone, Default)]
pub struct FeedbackFilter {
    pub status: Option<FeedbackStatus>,
    pub priority: Option<FeedbackPriority>,

    /// Matched against title and description
    pub search: Option<String>,
}

const FEEDBACK_COLUMNS: &str = "id, title, description, priority, status, category, project_id, \
                                author_id, author_email, author_name, assignee_id, x, y, \
                                viewport_width, viewport_height, selector, page_url, ai_analysis, \
                                is_deleted, created_at, updated_at";

impl Feedback {
    pub async fn create(pool: &PgPool, data: CreateFeedback) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback (title, description, priority, category, project_id, author_id, \
                                   author_email, author_name, x, y, viewport_width, viewport_height, \
                                   selector, page_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {FEEDBACK_COLUMNS}"
        );

        sqlx::query_as::<_, Feedback>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.priority)
            .bind(data.category)
            .bind(data.project_id)
            .bind(data.author_id)
            .bind(data.author_email)
            .bind(data.author_name)
            .bind(data.x)
            .bind(data.y)
            .bind(data.viewport_width)
            .bind(data.viewport_height)
            .bind(data.selector)
            .bind(data.page_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query =
            format!("SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE id = $1 AND is_deleted = FALSE");

        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateFeedback,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE feedback SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.category.is_some() {
            bind_count += 1;
            query.push_str(&format!(", category = ${}", bind_count));
        }
        if data.assignee_id.is_some() {
            bind_count += 1;
            query.push_str(&format!(", assignee_id = ${}", bind_count));
        }

        query.push_str(&format!(
            " WHERE id = $1 AND is_deleted = FALSE RETURNING {FEEDBACK_COLUMNS}"
        ));

        let mut q = sqlx::query_as::<_, Feedback>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(category) = data.category {
            q = q.bind(category);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }

        q.fetch_optional(pool).await
    }

    /// Stores (or clears) the analysis blob
    pub async fn set_analysis(
        pool: &PgPool,
        id: Uuid,
        analysis: Option<&FeedbackAnalysis>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE feedback SET ai_analysis = $2, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = FALSE RETURNING {FEEDBACK_COLUMNS}"
        );

        sqlx::query_as::<_, Feedback>(&query)
            .bind(id)
            .bind(analysis.map(Json))
            .fetch_optional(pool)
            .await
    }

    /// Soft-deletes feedback with its comments and attachments in one
    /// transaction
    pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE feedback SET is_deleted = TRUE, updated_at = NOW() \
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
            "UPDATE comments SET is_deleted = TRUE, updated_at = NOW() \
             WHERE feedback_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE attachments SET is_deleted = TRUE WHERE feedback_id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    /// Lists a project's feedback, newest first
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        filter: &FeedbackFilter,
        pagination: Pagination,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback \
             WHERE project_id = $1 AND is_deleted = FALSE \
               AND ($2::feedback_status IS NULL OR status = $2) \
               AND ($3::feedback_priority IS NULL OR priority = $3) \
               AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4) \
             ORDER BY created_at DESC \
             LIMIT $5 OFFSET $6"
        );

        sqlx::query_as::<_, Feedback>(&query)
            .bind(project_id)
            .bind(filter.status)
            .bind(filter.priority)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_project(
        pool: &PgPool,
        project_id: Uuid,
        filter: &FeedbackFilter,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM feedback
            WHERE project_id = $1 AND is_deleted = FALSE
              AND ($2::feedback_status IS NULL OR status = $2)
              AND ($3::feedback_priority IS NULL OR priority = $3)
              AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4)
            "#,
        )
        .bind(project_id)
        .bind(filter.status)
        .bind(filter.priority)
        .bind(filter.search.as_deref().map(like_pattern))
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}

/// Number of analyses in one category
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Number of feedback items at one priority
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PriorityCount {
    pub priority: FeedbackPriority,
    pub count: i64,
}

/// Aggregates over stored analyses
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStats {
    pub total_feedback: i64,
    pub analyzed_feedback: i64,

    /// Mean analysis score, None when nothing has been analyzed
    pub average_score: Option<f64>,

    /// Most frequent primary categories, at most five
    pub top_categories: Vec<CategoryCount>,

    pub priority_breakdown: Vec<PriorityCount>,
}

// Visible feedback: live projects, optionally restricted to those a user
// owns or is a member of.
const STATS_SCOPE: &str = "FROM feedback f \
     JOIN projects p ON p.id = f.project_id AND p.is_deleted = FALSE \
     WHERE f.is_deleted = FALSE \
       AND ($1::uuid IS NULL OR p.owner_id = $1 OR EXISTS ( \
            SELECT 1 FROM project_members m \
            WHERE m.project_id = p.id AND m.user_id = $1 AND m.is_deleted = FALSE))";

impl AnalysisStats {
    /// Computes stats over all feedback visible to `user_id`
    ///
    /// `None` computes stats over every project.
    pub async fn compute(pool: &PgPool, user_id: Option<Uuid>) -> Result<Self, sqlx::Error> {
        let totals_query = format!(
            "SELECT COUNT(*), COUNT(f.ai_analysis), AVG((f.ai_analysis->>'score')::float8) \
             {STATS_SCOPE}"
        );
        let (total_feedback, analyzed_feedback, average_score): (i64, i64, Option<f64>) =
            sqlx::query_as(&totals_query)
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        let categories_query = format!(
            "SELECT f.ai_analysis->>'category' AS category, COUNT(*) AS count \
             {STATS_SCOPE} AND f.ai_analysis IS NOT NULL \
             GROUP BY 1 ORDER BY count DESC, category LIMIT 5"
        );
        let top_categories = sqlx::query_as::<_, CategoryCount>(&categories_query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        let priority_query = format!(
            "SELECT f.priority AS priority, COUNT(*) AS count \
             {STATS_SCOPE} GROUP BY f.priority ORDER BY f.priority"
        );
        let priority_breakdown = sqlx::query_as::<_, PriorityCount>(&priority_query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        Ok(Self {
            total_feedback,
            analyzed_feedback,
            average_score,
            top_categories,
            priority_breakdown,
        })
    }
}
