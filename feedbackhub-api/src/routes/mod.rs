/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh, logout, current user
/// - `users`: User administration (role-gated)
/// - `projects`: Projects and their members
/// - `feedback`: Feedback items and their analyses
/// - `comments`: Comments on feedback
/// - `attachments`: Attachment metadata on feedback
/// - `analysis`: Stateless analyzer endpoints and stats
/// - `public`: Anonymous widget submissions

pub mod analysis;
pub mod attachments;
pub mod auth;
pub mod comments;
pub mod feedback;
pub mod health;
pub mod projects;
pub mod public;
pub mod users;

use feedbackhub_shared::pagination::PaginationParams;
use serde::{Deserialize, Deserializer};

/// Query parameters shared by searchable list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,

    /// Case-insensitive substring filter
    pub search: Option<String>,
}

impl ListQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }

    /// Trimmed search term, None when blank
    pub fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }
}

/// Trims a string, mapping blank input to None
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Deserializes a present field into `Some`, so `null` becomes `Some(None)`
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`; an absent
/// field stays `None`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        url: Option<Option<String>>,
    }

    #[test]
    fn test_nullable_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.url, None);

        let null: Patch = serde_json::from_str(r#"{"url":null}"#).unwrap();
        assert_eq!(null.url, Some(None));

        let set: Patch = serde_json::from_str(r#"{"url":"https://a.example"}"#).unwrap();
        assert_eq!(set.url, Some(Some("https://a.example".to_string())));
    }

    #[test]
    fn test_list_query_search_trimmed() {
        let query = ListQuery {
            search: Some("  logo  ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.search(), Some("logo"));

        let blank = ListQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.search(), None);
    }

    #[test]
    fn test_list_query_pagination() {
        let query = ListQuery {
            page: Some(2),
            limit: None,
            search: None,
        };
        let pagination = query.pagination().validate().unwrap();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.limit, 10);
    }
}
