/// Middleware modules for the API server
///
/// - `rate_limit`: per-IP token bucket limits
/// - `security`: security response headers

pub mod rate_limit;
pub mod security;
