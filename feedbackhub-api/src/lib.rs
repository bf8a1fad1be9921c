//! # FeedbackHub API Server Library
//!
//! HTTP API for collecting design feedback on projects and running the
//! keyword analyzer over it.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Validating request extractors
//! - `middleware`: Rate limiting and security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
