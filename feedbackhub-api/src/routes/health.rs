/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "active_connections": 1, "idle_connections": 4, "total_connections": 5 }
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use feedbackhub_shared::db::pool::{get_pool_stats, health_check as db_health_check, PoolStats};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,

    pub pool: PoolStats,
}

/// Reports service and database status
///
/// Always answers 200; a failed database probe only degrades the status.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let connected = match db_health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Ok(Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        pool: get_pool_stats(&state.db),
    }))
}
