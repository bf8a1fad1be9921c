/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use feedbackhub_api::{app::AppState, config::Config};
/// use feedbackhub_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.database.pool_config()).await?;
/// let state = AppState::new(pool, config);
/// let app = feedbackhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::{
        rate_limit::{auth_rate_limit, create_rate_limit, general_rate_limit, RateLimiters},
        security::SecurityHeadersLayer,
    },
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use feedbackhub_analyzer::{Analyzer, KeywordAnalyzer};
use feedbackhub_shared::auth::middleware::authenticate;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every
/// field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    pub config: Arc<Config>,

    /// Feedback analyzer
    pub analyzer: Arc<dyn Analyzer>,

    pub rate_limiters: Arc<RateLimiters>,
}

impl AppState {
    /// Creates state with the keyword analyzer configured from `config`
    pub fn new(db: PgPool, config: Config) -> Self {
        let analyzer = if config.analyzer.simulated_latency {
            KeywordAnalyzer::new()
        } else {
            KeywordAnalyzer::instant()
        };

        Self {
            db,
            rate_limiters: Arc::new(RateLimiters::new(config.rate_limit.enabled)),
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
        }
    }

    /// Replaces the analyzer
    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /health                                  GET     public
/// /v1/auth/{register,login,refresh}        POST    public, auth rate limit
/// /v1/auth/logout                          POST    public
/// /v1/auth/me                              GET
/// /v1/public/projects/:id/feedback         POST    public, create rate limit
/// /v1/projects                             GET POST
/// /v1/projects/:id                         GET PUT DELETE
/// /v1/projects/:id/members                 GET POST
/// /v1/projects/:id/members/:user_id        DELETE
/// /v1/projects/:id/feedback                GET POST (create rate limit)
/// /v1/feedback/:id                         GET PUT DELETE
/// /v1/feedback/:id/regenerate-analysis     POST
/// /v1/feedback/:id/comments                GET POST
/// /v1/comments/:id                         DELETE
/// /v1/feedback/:id/attachments             GET POST
/// /v1/attachments/:id                      DELETE
/// /v1/analysis/{classify,design,recommendations,accessibility}  POST
/// /v1/analysis/stats                       GET
/// /v1/users                                GET     manager+
/// /v1/users/:id/{role,status}              PATCH   admin
/// ```
///
/// Everything under `/v1` shares the general rate limit. Routes without
/// a "public" note require a Bearer access token.
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, compression, tracing.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .route_layer(from_fn_with_state(state.clone(), auth_rate_limit))
        .route("/logout", post(routes::auth::logout))
        .route(
            "/me",
            get(routes::auth::me).route_layer(from_fn_with_state(state.clone(), jwt_auth_layer)),
        );

    let public_routes = Router::new().route(
        "/projects/:id/feedback",
        post(routes::public::submit_feedback)
            .route_layer(from_fn_with_state(state.clone(), create_rate_limit)),
    );

    let protected_routes = Router::new()
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/projects/:id/members",
            get(routes::projects::list_members).post(routes::projects::add_member),
        )
        .route(
            "/projects/:id/members/:user_id",
            delete(routes::projects::remove_member),
        )
        .route(
            "/projects/:id/feedback",
            get(routes::feedback::list_feedback).merge(
                post(routes::feedback::create_feedback)
                    .route_layer(from_fn_with_state(state.clone(), create_rate_limit)),
            ),
        )
        .route(
            "/feedback/:id",
            get(routes::feedback::get_feedback)
                .put(routes::feedback::update_feedback)
                .delete(routes::feedback::delete_feedback),
        )
        .route(
            "/feedback/:id/regenerate-analysis",
            post(routes::feedback::regenerate_analysis),
        )
        .route(
            "/feedback/:id/comments",
            get(routes::comments::list_comments).post(routes::comments::create_comment),
        )
        .route("/comments/:id", delete(routes::comments::delete_comment))
        .route(
            "/feedback/:id/attachments",
            get(routes::attachments::list_attachments)
                .post(routes::attachments::create_attachment),
        )
        .route("/attachments/:id", delete(routes::attachments::delete_attachment))
        .route("/analysis/classify", post(routes::analysis::classify))
        .route("/analysis/design", post(routes::analysis::design))
        .route(
            "/analysis/recommendations",
            post(routes::analysis::recommendations),
        )
        .route(
            "/analysis/accessibility",
            post(routes::analysis::accessibility),
        )
        .route("/analysis/stats", get(routes::analysis::stats))
        .route("/users", get(routes::users::list_users))
        .route("/users/:id/role", patch(routes::users::update_role))
        .route("/users/:id/status", patch(routes::users::update_status))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/public", public_routes)
        .merge(protected_routes)
        .layer(from_fn_with_state(state.clone(), general_rate_limit));

    let cors = cors_layer(&state.config);
    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}

/// Permissive CORS when origins contain `*`, explicit origins with
/// credentials otherwise
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the Bearer access token and injects an `AuthContext` into
/// request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
