/// Design feedback analyzer
///
/// A second, coarser rule table aimed at designer-written reviews rather
/// than client bug reports. It picks a design category, a priority and a
/// sentiment, and returns canned recommendations for the category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::classifier::Priority;

/// Design area a review is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignCategory {
    Colors,
    Typography,
    Layout,
    Ux,
    Accessibility,
    Branding,
}

/// Category keyword groups, checked in order; the first hit wins
const CATEGORY_KEYWORDS: &[(DesignCategory, &[&str])] = &[
    (DesignCategory::Colors, &["колір", "кольор", "схема"]),
    (DesignCategory::Typography, &["шрифт", "текст", "читабельн"]),
    (DesignCategory::Layout, &["розташ", "макет", "компоновк"]),
    (DesignCategory::Accessibility, &["доступн", "accessibility", "контраст"]),
    (DesignCategory::Branding, &["логотип", "бренд", "фірмов"]),
];

const HIGH_PRIORITY_KEYWORDS: &[&str] = &["критичн", "терміново", "не працює"];
const LOW_PRIORITY_KEYWORDS: &[&str] = &["непогано", "можна", "бажано"];

const NEGATIVE_KEYWORDS: &[&str] = &["погано", "не подобається", "проблема"];
const POSITIVE_KEYWORDS: &[&str] = &["чудово", "відмінно", "подобається"];

impl DesignCategory {
    pub const ALL: [DesignCategory; 6] = [
        DesignCategory::Colors,
        DesignCategory::Typography,
        DesignCategory::Layout,
        DesignCategory::Ux,
        DesignCategory::Accessibility,
        DesignCategory::Branding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DesignCategory::Colors => "colors",
            DesignCategory::Typography => "typography",
            DesignCategory::Layout => "layout",
            DesignCategory::Ux => "ux",
            DesignCategory::Accessibility => "accessibility",
            DesignCategory::Branding => "branding",
        }
    }

    /// Canned recommendations for the category
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            DesignCategory::Colors => &[
                "Перевірити контрастність за стандартами WCAG AA",
                "Створити палітру з 3-5 основних кольорів",
                "Додати темну тему для користувачів",
            ],
            DesignCategory::Typography => &[
                "Використовувати мінімум 16px для основного тексту",
                "Встановити чіткий інтерлін'яж (1.4-1.6)",
                "Обмежити кількість шрифтових гарнітур до 2-3",
            ],
            DesignCategory::Layout => &[
                "Дотримуватися правила золотого перерізу",
                "Використовувати послідовні відступи (8px grid)",
                "Забезпечити адаптивність під мобільні пристрої",
            ],
            DesignCategory::Ux => &[
                "Скоротити кількість кроків до цільової дії",
                "Додати мікроанімації для зворотного зв'язку",
                "Провести A/B тестування ключових елементів",
            ],
            DesignCategory::Accessibility => &[
                "Забезпечити контрастність мінімум 4.5:1",
                "Додати alt-тексти для всіх зображень",
                "Реалізувати повну навігацію з клавіатури",
            ],
            DesignCategory::Branding => &[
                "Створити style guide для команди",
                "Забезпечити консистентність у всіх точках контакту",
                "Розробити адаптивні версії логотипу",
            ],
        }
    }

    fn analysis_text(&self, sentiment: Sentiment) -> &'static str {
        let negative = sentiment == Sentiment::Negative;
        match (self, negative) {
            (DesignCategory::Colors, true) => {
                "Виявлено проблеми з кольоровою схемою. Рекомендується перевірити контрастність та відповідність бренду."
            }
            (DesignCategory::Colors, false) => {
                "Кольорова палітра підібрана гармонійно. Варто розглянути додаткові акцентні кольори."
            }
            (DesignCategory::Typography, true) => {
                "Типографіка потребує оптимізації. Перевірте розміри шрифтів та інтерлін'яж."
            }
            (DesignCategory::Typography, false) => {
                "Шрифтова ієрархія побудована логічно. Можна розглянути альтернативні гарнітури."
            }
            (DesignCategory::Layout, true) => {
                "Компоновка елементів потребує перегляду. Рекомендується поліпшити візуальну ієрархію."
            }
            (DesignCategory::Layout, false) => {
                "Макет структурований добре. Варто оптимізувати відступи між блоками."
            }
            (DesignCategory::Ux, true) => {
                "Виявлено проблеми з користувацьким досвідом. Потрібно спростити user journey."
            }
            (DesignCategory::Ux, false) => {
                "Користувацький досвід інтуїтивний. Можна додати мікроанімації для покращення."
            }
            (DesignCategory::Accessibility, true) => {
                "Знайдено порушення доступності. Терміново потрібно виправити контрастність та навігацію."
            }
            (DesignCategory::Accessibility, false) => {
                "Рівень доступності задовільний. Рекомендується додати ARIA-атрибути."
            }
            (DesignCategory::Branding, true) => {
                "Брендинг не узгоджується з фірмовим стилем. Потрібно переглянути використання логотипу."
            }
            (DesignCategory::Branding, false) => {
                "Фірмовий стиль витриманий послідовно. Варто розширити палітру брендових елементів."
            }
        }
    }
}

impl fmt::Display for DesignCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown design category: {0}")]
pub struct UnknownDesignCategory(pub String);

impl FromStr for DesignCategory {
    type Err = UnknownDesignCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DesignCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == lowered)
            .ok_or_else(|| UnknownDesignCategory(s.to_string()))
    }
}

/// Tone of a design review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Design score on a 1-10 scale
    pub fn design_score(&self) -> f32 {
        match self {
            Sentiment::Positive => 8.5,
            Sentiment::Neutral => 7.0,
            Sentiment::Negative => 5.2,
        }
    }
}

/// Result of [`analyze_design`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignAnalysis {
    pub category: DesignCategory,
    /// One of low, medium, high
    pub priority: Priority,
    pub sentiment: Sentiment,
    pub design_score: f32,
    pub analysis: String,
    pub recommendations: Vec<String>,
}

/// Accessibility evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityReport {
    pub score: f32,
    pub issues: Vec<String>,
    pub improvements: Vec<String>,
}

/// Analyzes a designer review
///
/// # Example
///
/// ```
/// use feedbackhub_analyzer::design::{analyze_design, DesignCategory, Sentiment};
///
/// let analysis = analyze_design("Шрифт погано читається");
/// assert_eq!(analysis.category, DesignCategory::Typography);
/// assert_eq!(analysis.sentiment, Sentiment::Negative);
/// ```
pub fn analyze_design(content: &str) -> DesignAnalysis {
    let text = content.to_lowercase();

    let category = CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&text, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(DesignCategory::Ux);

    let priority = if contains_any(&text, HIGH_PRIORITY_KEYWORDS) {
        Priority::High
    } else if contains_any(&text, LOW_PRIORITY_KEYWORDS) {
        Priority::Low
    } else {
        Priority::Medium
    };

    // "не подобається" contains "подобається"; negative must be checked first
    let sentiment = if contains_any(&text, NEGATIVE_KEYWORDS) {
        Sentiment::Negative
    } else if contains_any(&text, POSITIVE_KEYWORDS) {
        Sentiment::Positive
    } else {
        Sentiment::Neutral
    };

    DesignAnalysis {
        category,
        priority,
        sentiment,
        design_score: sentiment.design_score(),
        analysis: category.analysis_text(sentiment).to_string(),
        recommendations: design_recommendations(category, "web"),
    }
}

/// Returns canned recommendations for a category
///
/// `project_type` is accepted for API compatibility and does not change the result.
pub fn design_recommendations(category: DesignCategory, project_type: &str) -> Vec<String> {
    tracing::trace!(category = %category, project_type, "Generating design recommendations");
    category
        .recommendations()
        .iter()
        .map(|r| r.to_string())
        .collect()
}

/// Evaluates accessibility of a design description
///
/// Always returns the same baseline report.
pub fn evaluate_accessibility(description: &str) -> AccessibilityReport {
    tracing::trace!(length = description.len(), "Evaluating accessibility");
    AccessibilityReport {
        score: 7.2,
        issues: vec![
            "Недостатній контраст для тексту на кнопках".to_string(),
            "Відсутні aria-labels для іконок".to_string(),
            "Фокус не завжди видимий при навігації з клавіатури".to_string(),
        ],
        improvements: vec![
            "Збільшити контрастність до рівня AA".to_string(),
            "Додати описи для декоративних елементів".to_string(),
            "Реалізувати skip-to-content посилання".to_string(),
        ],
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
