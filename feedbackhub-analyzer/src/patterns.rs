/// Feedback pattern table
///
/// Every feedback category the classifier knows about is a variant of
/// [`FeedbackPattern`]. Each variant carries a `'static` [`PatternConfig`]
/// with the keywords that detect it and the canned output it contributes.
///
/// # Categories
///
/// | pattern | detects |
/// |---|---|
/// | `ui_visibility` | elements that are hard to see or find |
/// | `mobile_issues` | phone/tablet/touch problems |
/// | `form_issues` | broken forms, unresponsive buttons, errors |
/// | `performance_issues` | slowness, lag, freezes |
/// | `ux_issues` | confusing flows (the default bucket) |
///
/// Keywords are stored lower-case and matched as plain substrings of the
/// lower-cased feedback text.
///
/// # Example
///
/// ```
/// use feedbackhub_analyzer::patterns::FeedbackPattern;
///
/// let pattern = FeedbackPattern::MobileIssues;
/// assert_eq!(pattern.as_str(), "mobile_issues");
/// assert_eq!(pattern.config().tasks.len(), 4);
/// ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Static configuration attached to a pattern
#[derive(Debug)]
pub struct PatternConfig {
    /// Lower-case keywords that detect the pattern
    pub keywords: &'static [&'static str],

    /// Designer tasks contributed when the pattern is detected
    pub tasks: &'static [&'static str],

    /// Suggestions contributed when the pattern is primary
    pub suggestions: &'static [&'static str],

    /// Category tags shown on the feedback card
    pub tags: &'static [&'static str],

    /// Technical requirements (empty for patterns without any)
    pub technical_requirements: &'static [&'static str],

    /// One-sentence summary used in the analysis text
    pub summary: &'static str,
}

static UI_VISIBILITY: PatternConfig = PatternConfig {
    keywords: &[
        "не видно",
        "не помітно",
        "сховано",
        "дрібний",
        "блідний",
        "незручно знайти",
    ],
    tasks: &[
        "Збільшити контрастність елемента відносно фону",
        "Додати візуальні акценти (тінь, обводка, градієнт)",
        "Оптимізувати розміри та позиціонування",
        "Провести A/B тест видимості елемента",
    ],
    suggestions: &[
        "Перевірити дотримання принципів контрастності WCAG",
        "Розглянути додавання мікроанімацій для привернення уваги",
        "Тестувати на різних екранах та при різному освітленні",
    ],
    tags: &["дизайн", "UX"],
    technical_requirements: &[
        "WCAG 2.1 AA сумісність",
        "Контрастність мінімум 4.5:1",
        "Keyboard navigation",
    ],
    summary: "Елемент інтерфейсу погано помітний для користувача.",
};

static MOBILE_ISSUES: PatternConfig = PatternConfig {
    keywords: &[
        "мобільний",
        "телефон",
        "планшет",
        "дрібний текст",
        "важко натиснути",
        "сенсорний",
    ],
    tasks: &[
        "Збільшити мінімальний розмір шрифту до 16px для мобільних",
        "Оптимізувати touch targets (мінімум 44px)",
        "Покращити адаптивність інтерфейсу",
        "Перевірити читабельність на малих екранах",
    ],
    suggestions: &[
        "Використати CSS clamp() для адаптивних розмірів",
        "Провести тестування на реальних пристроях",
        "Розглянути Progressive Web App підходи",
    ],
    tags: &["мобільний", "адаптивність"],
    technical_requirements: &[
        "Responsive design для екранів 320px+",
        "Touch-friendly інтерфейси (44px мінімум)",
        "Тестування на iOS та Android",
    ],
    summary: "Проблема проявляється на мобільних пристроях.",
};

static FORM_ISSUES: PatternConfig = PatternConfig {
    keywords: &[
        "форма",
        "не працює",
        "не відправляється",
        "кнопка не реагує",
        "помилка",
    ],
    tasks: &[
        "Додати візуальний індикатор завантаження",
        "Створити чіткі повідомлення про помилки",
        "Покращити валідацію полів з миттєвим фідбеком",
        "Додати fallback для випадків без JavaScript",
    ],
    suggestions: &[
        "Реалізувати автозбереження чернетки",
        "Додати прогрес-індикатори для довгих операцій",
        "Покращити accessibility для screen readers",
    ],
    tags: &["функціональність", "UX"],
    technical_requirements: &[],
    summary: "Форма або інтерактивний елемент працює некоректно.",
};

static PERFORMANCE_ISSUES: PatternConfig = PatternConfig {
    keywords: &[
        "повільно",
        "тормозить",
        "довго завантажується",
        "лагає",
        "зависає",
    ],
    tasks: &[
        "Оптимізувати зображення та мультимедіа",
        "Впровадити lazy loading для контенту",
        "Мінімізувати JavaScript та CSS",
        "Додати skeleton loading states",
    ],
    suggestions: &[
        "Використати CDN для статичних ресурсів",
        "Впровадити кешування на клієнті",
        "Розглянути Server-Side Rendering",
    ],
    tags: &["продуктивність", "технічні"],
    technical_requirements: &[
        "Core Web Vitals оптимізація",
        "Lazy loading зображень",
        "Bundle size оптимізація",
    ],
    summary: "Інтерфейс реагує повільно.",
};

static UX_ISSUES: PatternConfig = PatternConfig {
    keywords: &[
        "незрозуміло",
        "складно",
        "не інтуїтивно",
        "заплутано",
        "не знаю що робити",
    ],
    tasks: &[
        "Покращити копірайтинг та мікротексти",
        "Додати підказки та onboarding елементи",
        "Оптимізувати user flow та навігацію",
        "Створити більш чітку ІА (інформаційну архітектуру)",
    ],
    suggestions: &[
        "Провести usability тестування",
        "Додати інтерактивні туториали",
        "Використати принципи progressive disclosure",
    ],
    tags: &["UX", "usability"],
    technical_requirements: &[],
    summary: "Користувачу складно зрозуміти інтерфейс.",
};

/// Feedback category detected by keyword matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackPattern {
    /// Element is hard to see or find
    UiVisibility,

    /// Phone, tablet or touch problems
    MobileIssues,

    /// Broken forms and unresponsive controls
    FormIssues,

    /// Slowness and freezes
    PerformanceIssues,

    /// Confusing flows (default bucket)
    UxIssues,
}

impl FeedbackPattern {
    /// All patterns in table order
    pub const ALL: [FeedbackPattern; 5] = [
        FeedbackPattern::UiVisibility,
        FeedbackPattern::MobileIssues,
        FeedbackPattern::FormIssues,
        FeedbackPattern::PerformanceIssues,
        FeedbackPattern::UxIssues,
    ];

    /// Pattern used when nothing matches
    pub const DEFAULT: FeedbackPattern = FeedbackPattern::UxIssues;

    /// Returns the static configuration for this pattern
    pub fn config(self) -> &'static PatternConfig {
        match self {
            FeedbackPattern::UiVisibility => &UI_VISIBILITY,
            FeedbackPattern::MobileIssues => &MOBILE_ISSUES,
            FeedbackPattern::FormIssues => &FORM_ISSUES,
            FeedbackPattern::PerformanceIssues => &PERFORMANCE_ISSUES,
            FeedbackPattern::UxIssues => &UX_ISSUES,
        }
    }

    /// Converts pattern to its wire name
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackPattern::UiVisibility => "ui_visibility",
            FeedbackPattern::MobileIssues => "mobile_issues",
            FeedbackPattern::FormIssues => "form_issues",
            FeedbackPattern::PerformanceIssues => "performance_issues",
            FeedbackPattern::UxIssues => "ux_issues",
        }
    }

    /// Scores this pattern against lower-cased text
    ///
    /// Returns `(matched keyword count, total matched keyword length)`.
    /// The length is used to prefer the more specific pattern when counts tie.
    pub fn match_strength(self, text: &str) -> (usize, usize) {
        self.config()
            .keywords
            .iter()
            .filter(|keyword| text.contains(*keyword))
            .fold((0, 0), |(count, len), keyword| {
                (count + 1, len + keyword.chars().count())
            })
    }
}

impl fmt::Display for FeedbackPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown pattern name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown feedback pattern: {0}")]
pub struct UnknownPattern(pub String);

impl FromStr for FeedbackPattern {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedbackPattern::ALL
            .into_iter()
            .find(|pattern| pattern.as_str() == s)
            .ok_or_else(|| UnknownPattern(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_has_four_tasks_and_three_suggestions() {
        for pattern in FeedbackPattern::ALL {
            let config = pattern.config();
            assert_eq!(config.tasks.len(), 4, "{} tasks", pattern);
            assert_eq!(config.suggestions.len(), 3, "{} suggestions", pattern);
            assert_eq!(config.tags.len(), 2, "{} tags", pattern);
            assert!(!config.keywords.is_empty());
        }
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for pattern in FeedbackPattern::ALL {
            for keyword in pattern.config().keywords {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }

    #[test]
    fn test_name_roundtrip() {
        for pattern in FeedbackPattern::ALL {
            assert_eq!(pattern.as_str().parse::<FeedbackPattern>(), Ok(pattern));
        }
        assert!("nonsense".parse::<FeedbackPattern>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&FeedbackPattern::PerformanceIssues).unwrap();
        assert_eq!(json, "\"performance_issues\"");
    }

    #[test]
    fn test_match_strength_counts_and_lengths() {
        let text = "дрібний текст на телефоні";
        assert_eq!(FeedbackPattern::UiVisibility.match_strength(text), (1, 7));
        assert_eq!(FeedbackPattern::MobileIssues.match_strength(text), (2, 20));
        assert_eq!(FeedbackPattern::FormIssues.match_strength(text), (0, 0));
    }
}
