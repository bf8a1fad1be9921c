/// Configuration management for the API server
///
/// Configuration is read once at startup from environment variables (a
/// `.env` file is loaded first when present).
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `ENVIRONMENT`: `production` enables HSTS and secure cookies (default: development)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for JWT signing, at least 32 characters (required)
/// - `ACCESS_TOKEN_TTL_MINUTES`: Access token lifetime (default: 15)
/// - `REFRESH_TOKEN_TTL_DAYS`: Refresh token lifetime (default: 7)
/// - `ANALYZER_SIMULATED_LATENCY`: Delay analyzer responses (default: true)
/// - `RATE_LIMIT_ENABLED`: Enforce per-IP rate limits (default: true)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for pretty output
/// - `RUST_LOG`: Log filter (default: feedbackhub_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use feedbackhub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use feedbackhub_shared::db::pool::DatabaseConfig as PoolConfig;
use std::env;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub analyzer: AnalyzerConfig,
    pub rate_limit: RateLimitConfig,
    pub log: LogConfig,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,

    /// Production mode: HSTS header and `Secure` cookies
    pub production: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Pool settings with the shared defaults for everything not configured here
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            ..Default::default()
        }
    }
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
}

impl JwtConfig {
    pub fn access_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }

    pub fn refresh_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_ttl_days)
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Sleep before answering, like a remote model would
    pub simulated_latency: bool,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Emit JSON log lines instead of pretty output
    pub json: bool,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `DATABASE_URL` or `JWT_SECRET` is missing
    /// - `JWT_SECRET` is shorter than 32 characters
    /// - A numeric or boolean variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            api: ApiConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env_or("API_PORT", 8080)?,
                cors_origins: parse_origins(
                    &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
                ),
                production: environment.eq_ignore_ascii_case("production"),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_ttl_minutes: env_or("ACCESS_TOKEN_TTL_MINUTES", 15)?,
                refresh_token_ttl_days: env_or("REFRESH_TOKEN_TTL_DAYS", 7)?,
            },
            analyzer: AnalyzerConfig {
                simulated_latency: env_flag("ANALYZER_SIMULATED_LATENCY", true)?,
            },
            rate_limit: RateLimitConfig {
                enabled: env_flag("RATE_LIMIT_ENABLED", true)?,
            },
            log: LogConfig {
                json: env::var("LOG_FORMAT")
                    .map(|format| format.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn env_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, value, e)),
        Err(_) => Ok(default),
    }
}

fn env_flag(name: &str, default: bool) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(value) => parse_flag(&value)
            .ok_or_else(|| anyhow::anyhow!("{} must be true or false, got '{}'", name, value)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
