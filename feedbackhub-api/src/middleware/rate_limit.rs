/// Rate limiting middleware
///
/// In-memory token buckets keyed by client IP. Each limiter refills at a
/// constant rate so that `capacity` requests are allowed per `window`.
///
/// # Limits
///
/// - **General**: 100 requests / 60 s on every `/v1` route
/// - **Auth**: 10 requests / 300 s on register, login and refresh
/// - **Create**: 20 requests / 60 s on feedback creation
///
/// # Client Identification
///
/// The first address in `X-Forwarded-For`, then `X-Real-IP`, then the TCP
/// peer address. Requests with none of these share the `unknown` bucket.
///
/// # Headers
///
/// - `X-RateLimit-Limit`: bucket capacity
/// - `X-RateLimit-Remaining`: whole tokens left after this request
/// - `Retry-After`: seconds to wait (429 responses only)

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Buckets kept before idle (full) ones are pruned
const MAX_TRACKED_CLIENTS: usize = 10_000;

/// Capacity per window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimit {
    /// Maximum requests per window (burst capacity)
    pub capacity: u32,

    pub window: Duration,
}

impl RateLimit {
    pub const GENERAL: RateLimit = RateLimit {
        capacity: 100,
        window: Duration::from_secs(60),
    };

    pub const AUTH: RateLimit = RateLimit {
        capacity: 10,
        window: Duration::from_secs(300),
    };

    pub const CREATE: RateLimit = RateLimit {
        capacity: 20,
        window: Duration::from_secs(60),
    };

    /// Tokens per second
    pub fn refill_rate(&self) -> f64 {
        f64::from(self.capacity) / self.window.as_secs_f64()
    }
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: u32, now: Instant) -> Self {
        TokenBucket {
            tokens: f64::from(capacity),
            last_refill: now,
        }
    }

    /// Refills tokens based on elapsed time
    fn refill(&mut self, rate: f64, capacity: u32, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * rate).min(f64::from(capacity));
        self.last_refill = now;
    }

    fn try_consume(&mut self) -> bool {
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Seconds until one token is available (at least 1)
    fn seconds_until_available(&self, rate: f64) -> u64 {
        let deficit = 1.0 - self.tokens;
        if deficit <= 0.0 {
            0
        } else {
            ((deficit / rate).ceil() as u64).max(1)
        }
    }

    fn is_full(&self, capacity: u32) -> bool {
        self.tokens >= f64::from(capacity)
    }
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

/// Token buckets for one limit, keyed by client
#[derive(Debug)]
pub struct RateLimiter {
    limit: RateLimit,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Takes one token for `key`
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let rate = self.limit.refill_rate();
        let capacity = self.limit.capacity;

        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if buckets.len() >= MAX_TRACKED_CLIENTS && !buckets.contains_key(key) {
            buckets.retain(|_, bucket| {
                bucket.refill(rate, capacity, now);
                !bucket.is_full(capacity)
            });
        }

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(capacity, now));
        bucket.refill(rate, capacity, now);

        if bucket.try_consume() {
            RateLimitDecision::Allowed {
                remaining: bucket.tokens.floor() as u32,
            }
        } else {
            RateLimitDecision::Limited {
                retry_after: bucket.seconds_until_available(rate),
            }
        }
    }
}

/// The three limiters used by the router
#[derive(Debug)]
pub struct RateLimiters {
    pub enabled: bool,
    pub general: RateLimiter,
    pub auth: RateLimiter,
    pub create: RateLimiter,
}

impl RateLimiters {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            general: RateLimiter::new(RateLimit::GENERAL),
            auth: RateLimiter::new(RateLimit::AUTH),
            create: RateLimiter::new(RateLimit::CREATE),
        }
    }
}

/// Identifies the client for rate limiting
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    forwarded
        .or(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

async fn enforce(
    limiter: &RateLimiter,
    enabled: bool,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !enabled {
        return Ok(next.run(request).await);
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let key = client_key(request.headers(), peer);

    match limiter.check(&key) {
        RateLimitDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("X-RateLimit-Limit", HeaderValue::from(limiter.limit().capacity));
            headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));
            Ok(response)
        }
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!(client = %key, retry_after, "Rate limit exceeded");
            Err(ApiError::RateLimitExceeded {
                retry_after,
                message: format!(
                    "Too many requests. Try again in {} seconds",
                    retry_after
                ),
            })
        }
    }
}

/// General limit for all `/v1` routes
pub async fn general_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limiters = &state.rate_limiters;
    enforce(&limiters.general, limiters.enabled, request, next).await
}

/// Stricter limit for credential endpoints
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limiters = &state.rate_limiters;
    enforce(&limiters.auth, limiters.enabled, request, next).await
}

/// Limit for feedback creation
pub async fn create_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limiters = &state.rate_limiters;
    enforce(&limiters.create, limiters.enabled, request, next).await
}
