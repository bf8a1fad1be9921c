//! # FeedbackHub Shared Library
//!
//! This crate contains shared types, persistence and auth logic used by the
//! FeedbackHub API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, JWT tokens, request auth context, access rules
//! - `db`: Connection pool and migrations
//! - `models`: Database models and their queries
//! - `pagination`: Page/limit parameters and paginated responses

pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;

/// Current version of the FeedbackHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
