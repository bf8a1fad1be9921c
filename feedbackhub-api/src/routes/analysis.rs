/// Analyzer endpoints
///
/// Stateless wrappers around the analyzer crate plus aggregate stats over
/// stored analyses.
///
/// - `POST /v1/analysis/classify` - Classify ad-hoc feedback text
/// - `POST /v1/analysis/design` - Analyze a designer review
/// - `POST /v1/analysis/recommendations` - Canned recommendations for a design category
/// - `POST /v1/analysis/accessibility` - Baseline accessibility report
/// - `GET /v1/analysis/stats` - Stats over visible feedback
///
/// Stats cover every project for managers and admins, and owned or shared
/// projects for everyone else.

use crate::{app::AppState, error::ApiResult, extract::ValidatedJson};
use axum::{extract::State, Json};
use feedbackhub_analyzer::{
    analyze_design, design_recommendations, evaluate_accessibility, AccessibilityReport,
    AnalysisContext, AnalysisRequest, DesignAnalysis, DesignCategory, FeedbackAnalysis, Priority,
};
use feedbackhub_shared::{
    auth::middleware::AuthContext,
    models::{feedback::AnalysisStats, user::UserRole},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ClassifyRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    pub category: Option<String>,
    pub severity: Option<Priority>,
    pub context: Option<AnalysisContext>,
}

impl From<ClassifyRequest> for AnalysisRequest {
    fn from(req: ClassifyRequest) -> Self {
        AnalysisRequest {
            title: req.title,
            description: req.description,
            category: req.category,
            severity: req.severity,
            context: req.context,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct DesignRequest {
    #[validate(length(min = 1, max = 5000, message = "Content must be 1-5000 characters"))]
    pub content: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationsRequest {
    pub category: DesignCategory,

    #[validate(length(max = 50, message = "Project type must be at most 50 characters"))]
    pub project_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub category: DesignCategory,
    pub project_type: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AccessibilityRequest {
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: AnalysisStats,

    /// Analyzer name and configuration
    pub analyzer: serde_json::Value,
}

/// Classifies feedback text without storing it
pub async fn classify(
    State(state): State<AppState>,
    _auth: AuthContext,
    ValidatedJson(req): ValidatedJson<ClassifyRequest>,
) -> ApiResult<Json<FeedbackAnalysis>> {
    let request = AnalysisRequest::from(req);
    let analysis = state.analyzer.analyze(&request).await?;

    Ok(Json(analysis))
}

pub async fn design(
    _auth: AuthContext,
    ValidatedJson(req): ValidatedJson<DesignRequest>,
) -> Json<DesignAnalysis> {
    Json(analyze_design(&req.content))
}

/// Recommendations for a design category; `project_type` defaults to `web`
pub async fn recommendations(
    _auth: AuthContext,
    ValidatedJson(req): ValidatedJson<RecommendationsRequest>,
) -> Json<RecommendationsResponse> {
    let project_type = req
        .project_type
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "web".to_string());

    Json(RecommendationsResponse {
        category: req.category,
        recommendations: design_recommendations(req.category, &project_type),
        project_type,
    })
}

pub async fn accessibility(
    _auth: AuthContext,
    ValidatedJson(req): ValidatedJson<AccessibilityRequest>,
) -> Json<AccessibilityReport> {
    Json(evaluate_accessibility(&req.description))
}

pub async fn stats(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<Json<StatsResponse>> {
    let scope = (!auth.role.has_permission(&UserRole::Manager)).then_some(auth.user_id);

    let stats = AnalysisStats::compute(&state.db, scope).await?;

    Ok(Json(StatsResponse {
        stats,
        analyzer: state.analyzer.metadata(),
    }))
}
