/// Anonymous feedback from the embeddable widget
///
/// # Endpoint
///
/// ```text
/// POST /v1/public/projects/:id/feedback
/// Content-Type: application/json
///
/// {
///   "title": "Кнопка не працює",
///   "description": "Нічого не відбувається після натискання",
///   "author_email": "client@example.com",
///   "x": 412.0, "y": 96.5,
///   "viewport_width": 1440, "viewport_height": 900,
///   "selector": "#hero > button.cta",
///   "page_url": "https://example.com/"
/// }
/// ```
///
/// No token is needed; the submission is rate limited per client and the
/// project must be active.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ValidatedJson,
    routes::{feedback::analyze_and_store, projects::load_project},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use feedbackhub_analyzer::Priority;
use feedbackhub_shared::models::feedback::{CreateFeedback, Feedback, FeedbackPriority};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct PublicFeedbackRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    #[validate(email(message = "Invalid email format"))]
    pub author_email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub author_name: Option<String>,

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

/// Stores an anonymous submission and analyzes it
///
/// # Errors
///
/// - `403 Forbidden`: Project is inactive
/// - `404 Not Found`: Unknown project
/// - `422 Unprocessable Entity`: Validation failed
/// - `429 Too Many Requests`: Create rate limit exceeded
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<PublicFeedbackRequest>,
) -> ApiResult<(StatusCode, Json<Feedback>)> {
    let project = load_project(&state.db, project_id).await?;

    if !project.is_active {
        return Err(ApiError::Forbidden(
            "Project is not accepting feedback".to_string(),
        ));
    }

    let severity = req.priority.map(Priority::from);

    let feedback = Feedback::create(
        &state.db,
        CreateFeedback {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            priority: req.priority.unwrap_or_default(),
            category: req.category,
            project_id,
            author_id: None,
            author_email: Some(req.author_email.trim().to_string()),
            author_name: req.author_name.map(|name| name.trim().to_string()),
            x: req.x,
            y: req.y,
            viewport_width: req.viewport_width,
            viewport_height: req.viewport_height,
            selector: req.selector,
            page_url: req.page_url,
        },
    )
    .await?;

    tracing::info!(
        feedback_id = %feedback.id,
        project_id = %project_id,
        "Widget feedback received"
    );

    let feedback = analyze_and_store(&state, &project, feedback, severity).await;

    Ok((StatusCode::CREATED, Json(feedback)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_email_required() {
        let missing = serde_json::from_value::<PublicFeedbackRequest>(serde_json::json!({
            "title": "Hi",
            "description": "there"
        }));
        assert!(missing.is_err());

        let invalid: PublicFeedbackRequest = serde_json::from_value(serde_json::json!({
            "title": "Hi",
            "description": "there",
            "author_email": "nobody"
        }))
        .unwrap();
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("author_email"));
    }

    #[test]
    fn test_widget_payload_valid() {
        let req: PublicFeedbackRequest = serde_json::from_value(serde_json::json!({
            "title": "Кнопка не працює",
            "description": "Нічого не відбувається",
            "author_email": "client@example.com",
            "author_name": "Client",
            "x": 412.0,
            "y": 96.5,
            "viewport_width": 1440,
            "viewport_height": 900,
            "selector": "#hero > button.cta",
            "page_url": "https://example.com/"
        }))
        .unwrap();
        assert!(req.validate().is_ok());
    }
}
