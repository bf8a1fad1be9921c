/// Page/limit pagination
///
/// List endpoints accept `?page=&limit=` query parameters and answer with a
/// [`Paginated`] envelope.
///
/// # Example
///
/// ```
/// use feedbackhub_shared::pagination::{Paginated, PaginationParams};
///
/// let params = PaginationParams { page: Some(2), limit: Some(10) };
/// let page = params.validate().unwrap();
/// assert_eq!(page.offset(), 10);
///
/// let response = Paginated::new(vec!["a", "b"], 12, page);
/// assert_eq!(response.total_pages, 2);
/// assert!(!response.has_next);
/// assert!(response.has_prev);
/// ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Error returned for out-of-range pagination parameters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("page must be at least 1")]
    InvalidPage,

    #[error("limit must be between 1 and 100")]
    InvalidLimit,
}

impl PaginationError {
    /// Query parameter the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            PaginationError::InvalidPage => "page",
            PaginationError::InvalidLimit => "limit",
        }
    }
}

/// Raw query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationParams {
    /// Applies defaults and range checks
    pub fn validate(&self) -> Result<Pagination, PaginationError> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);

        if page < 1 {
            return Err(PaginationError::InvalidPage);
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(PaginationError::InvalidLimit);
        }

        Ok(Pagination { page, limit })
    }
}

/// Validated page selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        let total_pages = (total + pagination.limit - 1) / pagination.limit;

        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }

    /// Converts the items while keeping page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}
