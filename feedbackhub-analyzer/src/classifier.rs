/// Keyword feedback classifier
///
/// Turns free-text client feedback into a structured [`FeedbackAnalysis`]:
/// a primary category, a priority, an effort estimate, a score, and capped
/// lists of designer tasks and suggestions.
///
/// The classifier is a pure function over the static pattern table in
/// [`crate::patterns`]. It never fails: text that matches nothing falls
/// back to [`FeedbackPattern::DEFAULT`] with a lower score.
///
/// # Pipeline
///
/// 1. Lower-case `title + " " + description`
/// 2. Detect patterns and rank them by matched keyword count
/// 3. Build tasks (cap 6) and suggestions (cap 4)
/// 4. Resolve priority (explicit severity, then keywords, then medium)
/// 5. Estimate hours and compute the score (clamped to 60..=98)
///
/// # Example
///
/// ```
/// use feedbackhub_analyzer::classifier::{classify, AnalysisRequest, Priority};
/// use feedbackhub_analyzer::patterns::FeedbackPattern;
///
/// let request = AnalysisRequest::new("Кнопка", "кнопка не працює, критично");
/// let analysis = classify(&request);
///
/// assert_eq!(analysis.category, FeedbackPattern::FormIssues);
/// assert_eq!(analysis.priority, Priority::Critical);
/// assert!(analysis.tasks.len() <= 6);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::patterns::FeedbackPattern;

/// Maximum number of designer tasks
pub const MAX_TASKS: usize = 6;

/// Maximum number of suggestions
pub const MAX_SUGGESTIONS: usize = 4;

/// Maximum number of category tags
pub const MAX_CATEGORIES: usize = 3;

/// Maximum number of technical requirements
pub const MAX_TECHNICAL_REQUIREMENTS: usize = 4;

/// Maximum number of usability insights
pub const MAX_USABILITY_INSIGHTS: usize = 3;

/// Lowest score the classifier reports
pub const MIN_SCORE: u8 = 60;

/// Highest score the classifier reports
pub const MAX_SCORE: u8 = 98;

/// Scores at or above this value count as confident
pub const CONFIDENT_SCORE: u8 = 70;

const BASE_SCORE: i32 = 75;
const HOURS_PER_TASK: f64 = 1.5;

const CRITICAL_KEYWORDS: &[&str] = &["не працює", "зламано", "помилка", "краш", "недоступно"];
const HIGH_KEYWORDS: &[&str] = &["кнопка", "форма", "замовлення", "оплата", "реєстрація"];

const COLOR_TASK: &str = "Переглянути колірну схему та її контрастність";
const TYPOGRAPHY_TASK: &str = "Оптимізувати типографіку та читабельність";
const BUTTON_TASK: &str = "Покращити дизайн та стан кнопок (hover, active, disabled)";

const GENERAL_SUGGESTIONS: &[&str] = &[
    "Документувати зміни для майбутніх оновлень",
    "Створити style guide для подібних елементів",
];
const MOBILE_FIRST_SUGGESTION: &str = "Розглянути mobile-first підхід у дизайні";
const DEVELOPER_SUGGESTION: &str = "Співпрацювати з розробниками для оптимізації";

/// Suggestion prepended when a previous analysis is taken into account
pub const PREVIOUS_ANALYSIS_NOTE: &str = "Врахувати результати попереднього аналізу";

/// Suggestion appended when extra user feedback is supplied
pub const USER_FEEDBACK_NOTE: &str = "Інкорпорувати додатковий фідбек користувача";

const GENERAL_INSIGHTS: &[&str] = &[
    "Рекомендується провести usability тестування після впровадження змін",
    "Розглянути можливість A/B тестування різних варіантів рішення",
];

/// Technical requirements are always listed in this order
const REQUIREMENT_ORDER: [FeedbackPattern; 3] = [
    FeedbackPattern::MobileIssues,
    FeedbackPattern::PerformanceIssues,
    FeedbackPattern::UiVisibility,
];

/// Task priority
///
/// Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Converts priority to its wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    /// Effort multiplier applied to the base hour estimate
    ///
    /// Critical issues are usually small, urgent fixes, hence < 1.
    pub fn effort_multiplier(&self) -> f64 {
        match self {
            Priority::Low => 0.8,
            Priority::Medium => 1.0,
            Priority::High => 1.3,
            Priority::Critical => 0.7,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Priority::Low => "низький",
            Priority::Medium => "середній",
            Priority::High => "високий",
            Priority::Critical => "критичний",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown priority
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown priority: {0}")]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    /// Parses a priority case-insensitively (`"HIGH"` and `"high"` both work)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

/// Optional project context for an analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub project_name: Option<String>,
    pub project_description: Option<String>,
    pub url: Option<String>,
}

/// Input to the classifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Feedback title
    pub title: String,

    /// Feedback body
    #[serde(default)]
    pub description: String,

    /// Caller-supplied category, kept as the first tag
    #[serde(default)]
    pub category: Option<String>,

    /// Explicit severity; overrides keyword-derived priority
    #[serde(default)]
    pub severity: Option<Priority>,

    /// Project context
    #[serde(default)]
    pub context: Option<AnalysisContext>,
}

impl AnalysisRequest {
    /// Creates a request from title and description
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Sets an explicit severity
    pub fn with_severity(mut self, severity: Priority) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Sets the caller category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the project context
    pub fn with_context(mut self, context: AnalysisContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Lower-cased text the classifier scans
    pub fn normalized_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}

/// Structured result of a feedback analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackAnalysis {
    /// Primary category
    pub category: FeedbackPattern,

    /// All detected categories, strongest first (empty when nothing matched)
    pub detected_categories: Vec<FeedbackPattern>,

    pub priority: Priority,

    /// Estimated designer effort in hours
    pub estimated_hours: u32,

    /// Analysis confidence, 60..=98
    pub score: u8,

    pub analysis_text: String,

    /// Designer tasks (at most 6, no duplicates)
    pub tasks: Vec<String>,

    /// Suggestions (at most 4, no duplicates)
    pub suggestions: Vec<String>,

    /// Category tags (at most 3)
    pub categories: Vec<String>,

    pub technical_requirements: Vec<String>,

    pub usability_insights: Vec<String>,

    pub generated_at: DateTime<Utc>,
}

impl FeedbackAnalysis {
    /// Whether the score reaches the confident threshold
    pub fn is_confident(&self) -> bool {
        self.score >= CONFIDENT_SCORE
    }
}

/// Extra input for regenerating an analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegenerationContext {
    /// Analysis being replaced
    #[serde(default)]
    pub previous_analysis: Option<FeedbackAnalysis>,

    /// Additional human feedback about the previous result
    #[serde(default)]
    pub user_feedback: Option<String>,
}

/// Classifies a feedback request
///
/// Pure and infallible. See the module docs for the pipeline.
pub fn classify(request: &AnalysisRequest) -> FeedbackAnalysis {
    let text = request.normalized_text();
    let detected = detect_patterns(&text);
    let primary = detected.first().copied().unwrap_or(FeedbackPattern::DEFAULT);

    let tasks = generate_tasks(&text, primary, &detected);
    let suggestions = generate_suggestions(primary, &detected);
    let priority = determine_priority(&text, request.severity);
    let estimated_hours = estimate_hours(tasks.len(), priority);
    let score = calculate_score(detected.len(), &text);

    FeedbackAnalysis {
        category: primary,
        analysis_text: analysis_text(primary, detected.len(), priority, request.context.as_ref()),
        categories: generate_categories(&detected, request.category.as_deref()),
        technical_requirements: generate_technical_requirements(&detected),
        usability_insights: generate_usability_insights(&text, &detected),
        detected_categories: detected,
        priority,
        estimated_hours,
        score,
        tasks,
        suggestions,
        generated_at: Utc::now(),
    }
}

/// Re-runs the classifier with regeneration context
///
/// With a previous analysis the score becomes `max(new, previous) + 5`
/// (clamped to [`MAX_SCORE`]) and [`PREVIOUS_ANALYSIS_NOTE`] leads the
/// suggestions. Non-empty user feedback appends [`USER_FEEDBACK_NOTE`].
/// Notes are kept when re-capping; canned suggestions make room for them.
pub fn regenerate(request: &AnalysisRequest, context: &RegenerationContext) -> FeedbackAnalysis {
    let mut analysis = classify(request);

    let mut front = Vec::new();
    let mut back = Vec::new();

    if let Some(previous) = &context.previous_analysis {
        analysis.score = analysis
            .score
            .max(previous.score)
            .saturating_add(5)
            .min(MAX_SCORE);
        front.push(PREVIOUS_ANALYSIS_NOTE.to_string());
    }

    let has_feedback = context
        .user_feedback
        .as_deref()
        .is_some_and(|feedback| !feedback.trim().is_empty());
    if has_feedback {
        back.push(USER_FEEDBACK_NOTE.to_string());
    }

    let room = MAX_SUGGESTIONS - front.len() - back.len();
    let base: Vec<String> = analysis
        .suggestions
        .drain(..)
        .filter(|s| !front.contains(s) && !back.contains(s))
        .take(room)
        .collect();

    analysis.suggestions = front.into_iter().chain(base).chain(back).collect();
    analysis
}

/// Detects patterns in lower-cased text
///
/// Returns every pattern with at least one keyword hit, strongest first.
/// Ties on hit count go to the pattern whose matched keywords are longer,
/// then to table order.
pub fn detect_patterns(text: &str) -> Vec<FeedbackPattern> {
    let mut scored: Vec<(FeedbackPattern, (usize, usize))> = FeedbackPattern::ALL
        .into_iter()
        .map(|pattern| (pattern, pattern.match_strength(text)))
        .filter(|(_, (count, _))| *count > 0)
        .collect();

    // sort_by is stable, so equal strengths keep table order
    scored.sort_by(|(_, a), (_, b)| b.cmp(a));
    scored.into_iter().map(|(pattern, _)| pattern).collect()
}

/// Resolves priority
///
/// Explicit severity wins, then critical keywords, then conversion-related
/// keywords, then [`Priority::Medium`].
pub fn determine_priority(text: &str, severity: Option<Priority>) -> Priority {
    if let Some(severity) = severity {
        return severity;
    }

    if CRITICAL_KEYWORDS.iter().any(|k| text.contains(k)) {
        return Priority::Critical;
    }

    if HIGH_KEYWORDS.iter().any(|k| text.contains(k)) {
        return Priority::High;
    }

    Priority::Medium
}

/// Estimates designer hours: 1.5h per task scaled by priority, rounded
pub fn estimate_hours(task_count: usize, priority: Priority) -> u32 {
    let hours = task_count as f64 * HOURS_PER_TASK * priority.effort_multiplier();
    hours.round() as u32
}

/// Computes the analysis score
///
/// Base 75, +5 per detected pattern (max +15), +5 above 100 chars, +5 above
/// 200 chars, -10 below 50 chars, clamped to `MIN_SCORE..=MAX_SCORE`.
pub fn calculate_score(detected_count: usize, text: &str) -> u8 {
    let length = text.chars().count();
    let mut score = BASE_SCORE;

    score += (detected_count as i32 * 5).min(15);

    if length > 100 {
        score += 5;
    }
    if length > 200 {
        score += 5;
    }
    if length < 50 {
        score -= 10;
    }

    score.clamp(MIN_SCORE as i32, MAX_SCORE as i32) as u8
}

fn generate_tasks(text: &str, primary: FeedbackPattern, detected: &[FeedbackPattern]) -> Vec<String> {
    let mut tasks: Vec<&str> = primary.config().tasks.to_vec();

    for runner_up in detected.iter().skip(1).take(2) {
        tasks.extend(runner_up.config().tasks.iter().take(2));
    }

    if text.contains("кольор") || text.contains("колір") {
        tasks.push(COLOR_TASK);
    }
    if text.contains("шрифт") || text.contains("текст") {
        tasks.push(TYPOGRAPHY_TASK);
    }
    if text.contains("кнопка") {
        tasks.push(BUTTON_TASK);
    }

    dedup_capped(tasks, MAX_TASKS)
}

fn generate_suggestions(primary: FeedbackPattern, detected: &[FeedbackPattern]) -> Vec<String> {
    let mut suggestions: Vec<&str> = primary.config().suggestions.to_vec();
    suggestions.extend(GENERAL_SUGGESTIONS);

    if detected.contains(&FeedbackPattern::MobileIssues) {
        suggestions.push(MOBILE_FIRST_SUGGESTION);
    }
    if detected.contains(&FeedbackPattern::PerformanceIssues) {
        suggestions.push(DEVELOPER_SUGGESTION);
    }

    dedup_capped(suggestions, MAX_SUGGESTIONS)
}

fn generate_categories(detected: &[FeedbackPattern], caller_category: Option<&str>) -> Vec<String> {
    let caller = caller_category
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let tags = detected
        .iter()
        .flat_map(|pattern| pattern.config().tags.iter().copied());

    dedup_capped(caller.into_iter().chain(tags), MAX_CATEGORIES)
}

fn generate_technical_requirements(detected: &[FeedbackPattern]) -> Vec<String> {
    let requirements = REQUIREMENT_ORDER
        .iter()
        .filter(|pattern| detected.contains(pattern))
        .flat_map(|pattern| pattern.config().technical_requirements.iter().copied());

    dedup_capped(requirements, MAX_TECHNICAL_REQUIREMENTS)
}

fn generate_usability_insights(text: &str, detected: &[FeedbackPattern]) -> Vec<String> {
    let mut insights = Vec::new();

    if text.contains("не знаю") || text.contains("незрозуміло") {
        insights.push("Користувач потребує кращих підказок та навігації");
    }
    if text.contains("довго") || text.contains("повільно") {
        insights.push("Швидкість відгуку критично впливає на UX");
    }
    if detected.contains(&FeedbackPattern::MobileIssues) {
        insights.push("Mobile experience потребує окремої уваги та тестування");
    }
    if text.contains("кнопка") && (text.contains("не працює") || text.contains("не реагує")) {
        insights.push("Критична проблема з основним user flow");
    }

    insights.extend(GENERAL_INSIGHTS);
    dedup_capped(insights, MAX_USABILITY_INSIGHTS)
}

fn analysis_text(
    primary: FeedbackPattern,
    detected_count: usize,
    priority: Priority,
    context: Option<&AnalysisContext>,
) -> String {
    let mut text = format!(
        "{} Виявлено категорій проблем: {}. Пріоритет: {}.",
        primary.config().summary,
        detected_count,
        priority.label()
    );

    if let Some(name) = context
        .and_then(|c| c.project_name.as_deref())
        .filter(|name| !name.trim().is_empty())
    {
        text.push_str(&format!(" Проєкт: {}.", name.trim()));
    }

    text
}

/// Deduplicates preserving first occurrence, then truncates
fn dedup_capped<'a>(items: impl IntoIterator<Item = &'a str>, cap: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(cap);
    for item in items {
        if out.len() == cap {
            break;
        }
        if !out.iter().any(|existing| existing == item) {
            out.push(item.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(title: &str, description: &str) -> FeedbackAnalysis {
        classify(&AnalysisRequest::new(title, description))
    }

    #[test]
    fn test_empty_input_falls_back_to_default() {
        let analysis = analyze("", "");

        assert_eq!(analysis.category, FeedbackPattern::UxIssues);
        assert!(analysis.detected_categories.is_empty());
        assert_eq!(analysis.priority, Priority::Medium);
        assert_eq!(analysis.score, 65);
        assert!(!analysis.is_confident());
        assert_eq!(analysis.tasks.len(), 4);
        assert_eq!(analysis.suggestions.len(), 4);
    }

    #[test]
    fn test_whitespace_only_input() {
        let analysis = analyze("   ", "\n\t ");
        assert_eq!(analysis.category, FeedbackPattern::DEFAULT);
        assert!(analysis.score < CONFIDENT_SCORE);
    }

    #[test]
    fn test_broken_button_is_critical_form_issue() {
        let analysis = analyze("", "кнопка не працює, критично");

        assert_eq!(analysis.category, FeedbackPattern::FormIssues);
        assert_eq!(analysis.priority, Priority::Critical);
        assert!(analysis.tasks.contains(&BUTTON_TASK.to_string()));
        assert!(analysis
            .usability_insights
            .contains(&"Критична проблема з основним user flow".to_string()));
    }

    #[test]
    fn test_explicit_severity_overrides_keywords() {
        let request = AnalysisRequest::new("Помилка", "все зламано").with_severity(Priority::Low);
        let analysis = classify(&request);
        assert_eq!(analysis.priority, Priority::Low);
    }

    #[test]
    fn test_conversion_keywords_raise_priority_to_high() {
        assert_eq!(determine_priority("оплата незручна", None), Priority::High);
        assert_eq!(determine_priority("реєстрація", None), Priority::High);
    }

    #[test]
    fn test_medium_is_default_priority() {
        assert_eq!(determine_priority("складно зрозуміти", None), Priority::Medium);
        assert_eq!(determine_priority("", None), Priority::Medium);
    }

    #[test]
    fn test_detect_patterns_ranks_by_match_count() {
        let detected = detect_patterns("повільно і лагає, а ще не видно меню");
        assert_eq!(
            detected,
            vec![FeedbackPattern::PerformanceIssues, FeedbackPattern::UiVisibility]
        );
    }

    #[test]
    fn test_detect_patterns_prefers_more_specific_phrase_on_tie() {
        let detected = detect_patterns("дрібний текст");
        assert_eq!(detected[0], FeedbackPattern::MobileIssues);
        assert_eq!(detected[1], FeedbackPattern::UiVisibility);
    }

    #[test]
    fn test_runner_up_contributes_two_tasks() {
        let analysis = analyze("Меню", "повільно і лагає, а ще не видно меню");

        let performance = FeedbackPattern::PerformanceIssues.config();
        let visibility = FeedbackPattern::UiVisibility.config();

        assert_eq!(analysis.tasks.len(), 6);
        assert_eq!(&analysis.tasks[..4], performance.tasks);
        assert_eq!(analysis.tasks[4], visibility.tasks[0]);
        assert_eq!(analysis.tasks[5], visibility.tasks[1]);
    }

    #[test]
    fn test_ad_hoc_tasks_are_appended() {
        let analysis = analyze("Колір", "колір кнопки поганий");
        assert!(analysis.tasks.contains(&COLOR_TASK.to_string()));
        assert!(!analysis.tasks.contains(&BUTTON_TASK.to_string()));
        assert!(analysis.tasks.len() <= MAX_TASKS);
    }

    #[test]
    fn test_suggestions_include_general_advice() {
        let analysis = analyze("", "заплутано");
        assert_eq!(analysis.suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(analysis.suggestions[3], GENERAL_SUGGESTIONS[0]);
    }

    #[test]
    fn test_estimate_hours() {
        assert_eq!(estimate_hours(4, Priority::Medium), 6);
        assert_eq!(estimate_hours(6, Priority::High), 12);
        assert_eq!(estimate_hours(4, Priority::Critical), 4);
        assert_eq!(estimate_hours(5, Priority::Low), 6);
        assert_eq!(estimate_hours(0, Priority::Critical), 0);
    }

    #[test]
    fn test_score_bounds_and_length_bonus() {
        assert_eq!(calculate_score(0, ""), 65);
        assert_eq!(calculate_score(0, &"а".repeat(60)), 75);
        assert_eq!(calculate_score(1, &"а".repeat(150)), 85);
        assert_eq!(calculate_score(5, &"а".repeat(250)), 98);
        assert_eq!(calculate_score(3, &"а".repeat(250)), 98);
        assert_eq!(calculate_score(2, &"а".repeat(201)), 95);
    }

    #[test]
    fn test_score_counts_characters_not_bytes() {
        // 40 Cyrillic chars are 80 bytes but still "short"
        assert_eq!(calculate_score(0, &"ж".repeat(40)), 65);
    }

    #[test]
    fn test_categories_include_caller_category_first() {
        let request = AnalysisRequest::new("", "не видно кнопку").with_category("дизайн");
        let analysis = classify(&request);
        assert_eq!(analysis.categories, vec!["дизайн".to_string(), "UX".to_string()]);
    }

    #[test]
    fn test_categories_capped_at_three() {
        let analysis = analyze("", "мобільний телефон повільно не видно");
        assert_eq!(analysis.categories.len(), MAX_CATEGORIES);
    }

    #[test]
    fn test_technical_requirements_order_and_cap() {
        let analysis = analyze("", "не видно на телефоні, і повільно");
        assert_eq!(analysis.technical_requirements.len(), MAX_TECHNICAL_REQUIREMENTS);
        assert_eq!(
            analysis.technical_requirements[0],
            FeedbackPattern::MobileIssues.config().technical_requirements[0]
        );
        assert_eq!(
            analysis.technical_requirements[3],
            FeedbackPattern::PerformanceIssues.config().technical_requirements[0]
        );
    }

    #[test]
    fn test_usability_insights_always_capped() {
        let analysis = analyze("", "не знаю, довго, мобільний, кнопка не реагує");
        assert_eq!(analysis.usability_insights.len(), MAX_USABILITY_INSIGHTS);
        assert_eq!(
            analysis.usability_insights[0],
            "Користувач потребує кращих підказок та навігації"
        );
    }

    #[test]
    fn test_analysis_text_mentions_project() {
        let request = AnalysisRequest::new("", "повільно").with_context(AnalysisContext {
            project_name: Some("Лендінг".to_string()),
            ..Default::default()
        });
        let analysis = classify(&request);
        assert!(analysis.analysis_text.contains("Лендінг"));
        assert!(analysis.analysis_text.contains("середній"));
    }

    #[test]
    fn test_regenerate_with_previous_analysis() {
        let request = AnalysisRequest::new("", "повільно");
        let previous = classify(&request);

        let regenerated = regenerate(
            &request,
            &RegenerationContext {
                previous_analysis: Some(previous.clone()),
                user_feedback: None,
            },
        );

        assert!(regenerated.score >= previous.score);
        assert_eq!(regenerated.score, (previous.score + 5).min(MAX_SCORE));
        assert_eq!(regenerated.suggestions[0], PREVIOUS_ANALYSIS_NOTE);
        assert_eq!(regenerated.suggestions.len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_regenerate_keeps_user_feedback_note() {
        let request = AnalysisRequest::new("", "повільно");
        let regenerated = regenerate(
            &request,
            &RegenerationContext {
                previous_analysis: Some(classify(&request)),
                user_feedback: Some("Не врахована мобільна версія".to_string()),
            },
        );

        assert_eq!(regenerated.suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(regenerated.suggestions[0], PREVIOUS_ANALYSIS_NOTE);
        assert_eq!(regenerated.suggestions[3], USER_FEEDBACK_NOTE);
    }

    #[test]
    fn test_regenerate_ignores_blank_user_feedback() {
        let request = AnalysisRequest::new("", "повільно");
        let regenerated = regenerate(
            &request,
            &RegenerationContext {
                previous_analysis: None,
                user_feedback: Some("   ".to_string()),
            },
        );
        assert!(!regenerated.suggestions.contains(&USER_FEEDBACK_NOTE.to_string()));
    }

    #[test]
    fn test_regenerate_never_lowers_score_below_previous() {
        let request = AnalysisRequest::new("", "");
        let mut previous = classify(&request);
        previous.score = 96;

        let regenerated = regenerate(
            &request,
            &RegenerationContext {
                previous_analysis: Some(previous),
                user_feedback: None,
            },
        );
        assert_eq!(regenerated.score, MAX_SCORE);
    }

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!("CRITICAL".parse::<Priority>(), Ok(Priority::Critical));
        assert_eq!("Medium".parse::<Priority>(), Ok(Priority::Medium));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_analysis_serializes_with_snake_case_fields() {
        let analysis = analyze("", "повільно");
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["category"], "performance_issues");
        assert_eq!(json["priority"], "medium");
        assert!(json["estimated_hours"].is_number());
        assert!(json["generated_at"].is_string());
    }
}
