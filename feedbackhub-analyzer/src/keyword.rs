/// Keyword analyzer
///
/// Wraps the pure classifier in the [`Analyzer`] trait and adds a simulated
/// processing delay so clients see realistic "analyzing..." states.
///
/// # Latency
///
/// | operation | base | jitter |
/// |---|---|---|
/// | analyze | 1000 ms | 0..2000 ms |
/// | regenerate | 1500 ms | 0..2500 ms |
///
/// The delay is a single `tokio::time::sleep`; there is no timeout or abort
/// path. Use [`KeywordAnalyzer::instant`] to disable it.
///
/// # Example
///
/// ```no_run
/// use feedbackhub_analyzer::{AnalysisRequest, Analyzer, KeywordAnalyzer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let analyzer = KeywordAnalyzer::new();
/// let analysis = analyzer
///     .analyze(&AnalysisRequest::new("Меню", "меню не видно на телефоні"))
///     .await?;
///
/// println!("{} ({})", analysis.category, analysis.priority);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use rand::Rng;
use tokio::time::{sleep, Duration};

use crate::analyzer_trait::{Analyzer, AnalyzerResult};
use crate::classifier::{self, AnalysisRequest, FeedbackAnalysis, RegenerationContext};

/// Simulated delay: `base_ms + rand(0..jitter_ms)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub base_ms: u64,
    pub jitter_ms: u64,
}

impl LatencyProfile {
    /// No delay at all
    pub const NONE: LatencyProfile = LatencyProfile {
        base_ms: 0,
        jitter_ms: 0,
    };

    /// Default delay for a fresh analysis
    pub const ANALYZE: LatencyProfile = LatencyProfile {
        base_ms: 1000,
        jitter_ms: 2000,
    };

    /// Default delay for a regeneration
    pub const REGENERATE: LatencyProfile = LatencyProfile {
        base_ms: 1500,
        jitter_ms: 2500,
    };

    /// Draws one delay from the profile
    pub fn sample(&self) -> Duration {
        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..self.jitter_ms)
        };
        Duration::from_millis(self.base_ms + jitter)
    }

    fn is_zero(&self) -> bool {
        self.base_ms == 0 && self.jitter_ms == 0
    }
}

/// Rule-based analyzer over the static keyword table
#[derive(Debug, Clone)]
pub struct KeywordAnalyzer {
    analyze_latency: LatencyProfile,
    regenerate_latency: LatencyProfile,
}

impl KeywordAnalyzer {
    /// Creates an analyzer with the default simulated latency
    pub fn new() -> Self {
        Self::with_latency(LatencyProfile::ANALYZE, LatencyProfile::REGENERATE)
    }

    /// Creates an analyzer that answers immediately
    pub fn instant() -> Self {
        Self::with_latency(LatencyProfile::NONE, LatencyProfile::NONE)
    }

    /// Creates an analyzer with custom latency profiles
    pub fn with_latency(analyze: LatencyProfile, regenerate: LatencyProfile) -> Self {
        KeywordAnalyzer {
            analyze_latency: analyze,
            regenerate_latency: regenerate,
        }
    }

    async fn wait(profile: LatencyProfile) {
        if profile.is_zero() {
            return;
        }
        let delay = profile.sample();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Simulating analysis latency");
        sleep(delay).await;
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for KeywordAnalyzer {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn analyze(&self, request: &AnalysisRequest) -> AnalyzerResult<FeedbackAnalysis> {
        Self::wait(self.analyze_latency).await;

        let analysis = classifier::classify(request);
        tracing::info!(
            category = %analysis.category,
            priority = %analysis.priority,
            score = analysis.score,
            "Feedback analyzed"
        );
        Ok(analysis)
    }

    async fn regenerate(
        &self,
        request: &AnalysisRequest,
        context: &RegenerationContext,
    ) -> AnalyzerResult<FeedbackAnalysis> {
        Self::wait(self.regenerate_latency).await;

        let analysis = classifier::regenerate(request, context);
        tracing::info!(
            category = %analysis.category,
            score = analysis.score,
            had_previous = context.previous_analysis.is_some(),
            "Feedback analysis regenerated"
        );
        Ok(analysis)
    }

    fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "name": "keyword",
            "version": crate::VERSION,
            "description": "Rule-based keyword classifier",
            "simulated_latency": !self.analyze_latency.is_zero(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::FeedbackPattern;
    use tokio::time::Instant;

    #[test]
    fn test_latency_sample_within_bounds() {
        for _ in 0..100 {
            let delay = LatencyProfile::ANALYZE.sample();
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay < Duration::from_millis(3000));
        }
        assert_eq!(LatencyProfile::NONE.sample(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_waits_simulated_latency() {
        let analyzer = KeywordAnalyzer::new();
        let start = Instant::now();

        let analysis = analyzer
            .analyze(&AnalysisRequest::new("", "сайт повільно працює"))
            .await
            .unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000));
        assert!(elapsed < Duration::from_millis(3000));
        assert_eq!(analysis.category, FeedbackPattern::PerformanceIssues);
    }

    #[tokio::test(start_paused = true)]
    async fn test_regenerate_uses_own_profile() {
        let analyzer = KeywordAnalyzer::new();
        let request = AnalysisRequest::new("", "повільно");
        let start = Instant::now();

        analyzer
            .regenerate(&request, &RegenerationContext::default())
            .await
            .unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1500));
        assert!(elapsed < Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn test_instant_analyzer_matches_classifier() {
        let analyzer = KeywordAnalyzer::instant();
        let request = AnalysisRequest::new("Форма", "форма не відправляється");

        let analysis = analyzer.analyze(&request).await.unwrap();
        let expected = classifier::classify(&request);

        assert_eq!(analysis.category, expected.category);
        assert_eq!(analysis.tasks, expected.tasks);
        assert_eq!(analysis.score, expected.score);
    }

    #[test]
    fn test_metadata() {
        let metadata = KeywordAnalyzer::instant().metadata();
        assert_eq!(metadata["name"], "keyword");
        assert_eq!(metadata["simulated_latency"], false);
    }
}
