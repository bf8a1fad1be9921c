//! # FeedbackHub API Server
//!
//! Loads configuration, connects to PostgreSQL, applies pending migrations
//! and serves the `/v1` API until SIGINT or SIGTERM.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/feedbackhub \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p feedbackhub-api
//! ```

use feedbackhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use feedbackhub_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log.json);

    tracing::info!(
        "FeedbackHub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let pool = create_pool(config.database.pool_config()).await?;
    run_migrations(&pool).await?;

    let addr = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "feedbackhub_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolves when `signal` fires; never resolves if the handler failed to install
async fn wait_for<F>(name: &str, signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, signal = name, "Failed to listen for signal");
        std::future::pending::<()>().await;
    }
}

async fn shutdown_signal() {
    let ctrl_c = wait_for("ctrl_c", tokio::signal::ctrl_c());

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_failed_signal_handler_never_triggers_shutdown() {
        let failed = wait_for("ctrl_c", async {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no signal driver"))
        });

        let outcome = tokio::time::timeout(Duration::from_secs(3600), failed).await;
        assert!(outcome.is_err());
    }

    #[tokio::test]
    async fn test_delivered_signal_resolves() {
        wait_for("ctrl_c", async { Ok(()) }).await;
    }
}
