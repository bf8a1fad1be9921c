/// Core Analyzer trait and types
///
/// This module defines the contract the API layer depends on to turn stored
/// feedback into a [`FeedbackAnalysis`]. The keyword classifier is the only
/// production implementation today; the trait keeps the HTTP handlers
/// independent of how analyses are produced (and lets tests inject
/// failing or instant analyzers).
///
/// # Failure Policy
///
/// Callers treat analyzer errors as non-fatal: the feedback is persisted
/// first, and a failed analysis leaves `ai_analysis` empty.
///
/// # Example
///
/// ```no_run
/// use feedbackhub_analyzer::{
///     classify, AnalysisRequest, Analyzer, AnalyzerResult, FeedbackAnalysis,
///     RegenerationContext,
/// };
/// use async_trait::async_trait;
///
/// struct InstantAnalyzer;
///
/// #[async_trait]
/// impl Analyzer for InstantAnalyzer {
///     fn name(&self) -> &str {
///         "instant"
///     }
///
///     async fn analyze(&self, request: &AnalysisRequest) -> AnalyzerResult<FeedbackAnalysis> {
///         Ok(classify(request))
///     }
///
///     async fn regenerate(
///         &self,
///         request: &AnalysisRequest,
///         context: &RegenerationContext,
///     ) -> AnalyzerResult<FeedbackAnalysis> {
///         Ok(feedbackhub_analyzer::regenerate(request, context))
///     }
/// }
/// ```

use async_trait::async_trait;

use crate::classifier::{AnalysisRequest, FeedbackAnalysis, RegenerationContext};

/// Analyzer error types
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// Analysis could not be produced
    #[error("Analysis failed: {0}")]
    Failed(String),

    /// Backing service is unavailable
    #[error("Analyzer unavailable: {0}")]
    Unavailable(String),
}

/// Analyzer result type alias
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Core Analyzer trait
///
/// Implementations must be cheap to share behind an `Arc`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Returns the analyzer name (used in logs)
    fn name(&self) -> &str;

    /// Analyzes a single feedback item
    ///
    /// # Errors
    ///
    /// Returns an error only when the implementation cannot produce an
    /// analysis at all. The keyword analyzer never fails.
    async fn analyze(&self, request: &AnalysisRequest) -> AnalyzerResult<FeedbackAnalysis>;

    /// Re-analyzes feedback, taking the previous result and extra human
    /// input into account
    async fn regenerate(
        &self,
        request: &AnalysisRequest,
        context: &RegenerationContext,
    ) -> AnalyzerResult<FeedbackAnalysis>;

    /// Returns analyzer metadata (shown by the stats endpoint)
    fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name(),
        })
    }
}
