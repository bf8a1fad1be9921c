//! # FeedbackHub Analyzer
//!
//! Rule-based analysis of design feedback.
//!
//! ## Modules
//!
//! - `patterns`: static keyword table for the feedback categories
//! - `classifier`: pure feedback classifier and regeneration
//! - `design`: design-review analyzer and accessibility report
//! - `analyzer_trait`: async `Analyzer` seam used by the API
//! - `keyword`: `KeywordAnalyzer` with simulated latency
//!
//! ## Example
//!
//! ```
//! use feedbackhub_analyzer::{classify, AnalysisRequest};
//!
//! let analysis = classify(&AnalysisRequest::new("Кнопка", "кнопку не видно"));
//! assert!(analysis.score >= 60 && analysis.score <= 98);
//! ```

pub mod analyzer_trait;
pub mod classifier;
pub mod design;
pub mod keyword;
pub mod patterns;

pub use analyzer_trait::{Analyzer, AnalyzerError, AnalyzerResult};
pub use classifier::{
    classify, regenerate, AnalysisContext, AnalysisRequest, FeedbackAnalysis, Priority,
    RegenerationContext,
};
pub use design::{
    analyze_design, design_recommendations, evaluate_accessibility, AccessibilityReport,
    DesignAnalysis, DesignCategory, Sentiment,
};
pub use keyword::{KeywordAnalyzer, LatencyProfile};
pub use patterns::FeedbackPattern;

/// Analyzer crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
