/// Feedback endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/feedback` - List a project's feedback
/// - `POST /v1/projects/:id/feedback` - Submit feedback and analyze it
/// - `GET /v1/feedback/:id` - Feedback details
/// - `PUT /v1/feedback/:id` - Update (project owner, author or admin)
/// - `DELETE /v1/feedback/:id` - Soft delete with comments and attachments
/// - `POST /v1/feedback/:id/regenerate-analysis` - Re-run the analyzer
///
/// # Analysis
///
/// Feedback is stored before it is analyzed. If the analyzer fails the
/// item is still returned with `ai_analysis: null` and a warning is
/// logged. When the caller does not set a priority, the analyzer's
/// priority is stored.
///
/// # Filters
///
/// `status`, `priority` and `search` (title or description) combine with
/// the usual `page` and `limit`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{QueryParams, ValidatedJson},
    routes::{non_blank, nullable, projects::load_project},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use feedbackhub_analyzer::{AnalysisContext, AnalysisRequest, Priority, RegenerationContext};
use feedbackhub_shared::{
    auth::{
        authorization::{require_ownership, require_project_access},
        middleware::AuthContext,
    },
    models::{
        feedback::{
            CreateFeedback, Feedback, FeedbackFilter, FeedbackPriority, FeedbackStatus,
            UpdateFeedback,
        },
        project::Project,
    },
    pagination::{Paginated, PaginationParams},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<FeedbackStatus>,
    pub priority: Option<FeedbackPriority>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    /// Explicit priority; overrides the analyzer's
    pub priority: Option<FeedbackPriority>,

    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<String>,

    #[validate(range(min = 0.0, message = "Coordinates must not be negative"))]
    pub x: Option<f64>,

    #[validate(range(min = 0.0, message = "Coordinates must not be negative"))]
    pub y: Option<f64>,

    #[validate(range(min = 1, message = "Viewport size must be positive"))]
    pub viewport_width: Option<i32>,

    #[validate(range(min = 1, message = "Viewport size must be positive"))]
    pub viewport_height: Option<i32>,

    #[validate(length(max = 500, message = "Selector must be at most 500 characters"))]
    pub selector: Option<String>,

    #[validate(url(message = "Invalid page URL"))]
    pub page_url: Option<String>,
}

/// Feedback update; `null` clears `category` or `assignee_id`
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFeedbackRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub priority: Option<FeedbackPriority>,
    pub status: Option<FeedbackStatus>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 50, message = "Category must be at most 50 characters"))]
    pub category: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    pub assignee_id: Option<Option<Uuid>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegenerateRequest {
    /// Reviewer notes on the previous analysis
    pub user_feedback: Option<String>,
}

/// Loads live feedback and its project, checking the caller can read it
pub(crate) async fn load_accessible_feedback(
    state: &AppState,
    auth: &AuthContext,
    id: Uuid,
) -> ApiResult<(Feedback, Project)> {
    let feedback = Feedback::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    let project = load_project(&state.db, feedback.project_id).await?;
    require_project_access(&state.db, auth, &project).await?;

    Ok((feedback, project))
}

/// Builds the analyzer input for stored feedback
pub(crate) fn analysis_request(
    feedback: &Feedback,
    project: &Project,
    severity: Option<Priority>,
) -> AnalysisRequest {
    AnalysisRequest {
        title: feedback.title.clone(),
        description: feedback.description.clone(),
        category: feedback.category.clone(),
        severity,
        context: Some(AnalysisContext {
            project_name: Some(project.name.clone()),
            project_description: project.description.clone(),
            url: project.url.clone(),
        }),
    }
}

/// Runs the analyzer over freshly stored feedback and saves the result
///
/// Never fails: analyzer or storage errors are logged and the feedback is
/// returned without an analysis.
pub(crate) async fn analyze_and_store(
    state: &AppState,
    project: &Project,
    mut feedback: Feedback,
    severity: Option<Priority>,
) -> Feedback {
    let request = analysis_request(&feedback, project, severity);

    let analysis = match state.analyzer.analyze(&request).await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(
                feedback_id = %feedback.id,
                analyzer = state.analyzer.name(),
                error = %e,
                "Analysis failed, feedback stored without it"
            );
            return feedback;
        }
    };

    let derived_priority = FeedbackPriority::from(analysis.priority);
    if severity.is_none() && derived_priority != feedback.priority {
        let update = UpdateFeedback {
            priority: Some(derived_priority),
            ..Default::default()
        };
        match Feedback::update(&state.db, feedback.id, update).await {
            Ok(Some(updated)) => feedback = updated,
            Ok(None) => return feedback,
            Err(e) => {
                tracing::warn!(feedback_id = %feedback.id, error = %e, "Failed to store derived priority");
            }
        }
    }

    match Feedback::set_analysis(&state.db, feedback.id, Some(&analysis)).await {
        Ok(Some(updated)) => {
            tracing::info!(
                feedback_id = %updated.id,
                category = analysis.category.as_str(),
                score = analysis.score,
                "Feedback analyzed"
            );
            updated
        }
        Ok(None) => feedback,
        Err(e) => {
            tracing::warn!(feedback_id = %feedback.id, error = %e, "Failed to store analysis");
            feedback
        }
    }
}

pub async fn list_feedback(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    QueryParams(query): QueryParams<FeedbackQuery>,
) -> ApiResult<Json<Paginated<Feedback>>> {
    let pagination = PaginationParams {
        page: query.page,
        limit: query.limit,
    }
    .validate()?;

    let project = load_project(&state.db, project_id).await?;
    require_project_access(&state.db, &auth, &project).await?;

    let filter = FeedbackFilter {
        status: query.status,
        priority: query.priority,
        search: non_blank(query.search.as_deref()).map(str::to_string),
    };

    let items = Feedback::list_by_project(&state.db, project_id, &filter, pagination).await?;
    let total = Feedback::count_by_project(&state.db, project_id, &filter).await?;

    Ok(Json(Paginated::new(items, total, pagination)))
}

/// Submits feedback as the authenticated user
///
/// # Errors
///
/// - `403 Forbidden`: Caller cannot access the project
/// - `404 Not Found`: Unknown project
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_feedback(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(project_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateFeedbackRequest>,
) -> ApiResult<(StatusCode, Json<Feedback>)> {
    let project = load_project(&state.db, project_id).await?;
    require_project_access(&state.db, &auth, &project).await?;

    let severity = req.priority.map(Priority::from);

    let feedback = Feedback::create(
        &state.db,
        CreateFeedback {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            priority: req.priority.unwrap_or_default(),
            category: req.category,
            project_id,
            author_id: Some(auth.user_id),
            x: req.x,
            y: req.y,
            viewport_width: req.viewport_width,
            viewport_height: req.viewport_height,
            selector: req.selector,
            page_url: req.page_url,
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(
        feedback_id = %feedback.id,
        project_id = %project_id,
        author_id = %auth.user_id,
        "Feedback created"
    );

    let feedback = analyze_and_store(&state, &project, feedback, severity).await;

    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn get_feedback(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Feedback>> {
    let (feedback, _) = load_accessible_feedback(&state, &auth, id).await?;
    Ok(Json(feedback))
}

pub async fn update_feedback(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateFeedbackRequest>,
) -> ApiResult<Json<Feedback>> {
    let (feedback, project) = load_accessible_feedback(&state, &auth, id).await?;
    require_ownership(&auth, &editors(&feedback, &project))?;

    let update = UpdateFeedback {
        title: req.title.map(|title| title.trim().to_string()),
        description: req.description.map(|description| description.trim().to_string()),
        priority: req.priority,
        status: req.status,
        category: req.category,
        assignee_id: req.assignee_id,
    };

    let feedback = Feedback::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    tracing::info!(feedback_id = %id, status = feedback.status.as_str(), "Feedback updated");

    Ok(Json(feedback))
}

/// Soft-deletes feedback with its comments and attachments
pub async fn delete_feedback(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let (feedback, project) = load_accessible_feedback(&state, &auth, id).await?;
    require_ownership(&auth, &editors(&feedback, &project))?;

    if !Feedback::soft_delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Feedback not found".to_string()));
    }

    tracing::info!(feedback_id = %id, deleted_by = %auth.user_id, "Feedback deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Re-runs the analyzer with the previous analysis as context
///
/// Unlike creation, analyzer failures are returned to the caller.
pub async fn regenerate_analysis(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    body: Option<Json<RegenerateRequest>>,
) -> ApiResult<Json<Feedback>> {
    let (feedback, project) = load_accessible_feedback(&state, &auth, id).await?;

    let req = body.map(|Json(req)| req).unwrap_or_default();
    let context = RegenerationContext {
        previous_analysis: feedback.analysis().cloned(),
        user_feedback: non_blank(req.user_feedback.as_deref()).map(str::to_string),
    };

    let request = analysis_request(&feedback, &project, Some(feedback.priority.into()));
    let analysis = state.analyzer.regenerate(&request, &context).await?;

    let feedback = Feedback::set_analysis(&state.db, id, Some(&analysis))
        .await?
        .ok_or_else(|| ApiError::NotFound("Feedback not found".to_string()))?;

    tracing::info!(feedback_id = %id, score = analysis.score, "Analysis regenerated");

    Ok(Json(feedback))
}

/// Users allowed to edit or delete feedback besides admins
fn editors(feedback: &Feedback, project: &Project) -> Vec<Uuid> {
    std::iter::once(project.owner_id)
        .chain(feedback.author_id)
        .collect()
}
