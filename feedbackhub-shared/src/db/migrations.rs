/// Database migration runner
///
/// Migrations are embedded at compile time from the workspace-level
/// `migrations/` directory. Each migration is a `{version}_{name}.sql` file
/// with a matching `.down.sql` rollback.
///
/// # Example
///
/// ```no_run
/// use feedbackhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use feedbackhub_shared::db::migrations::{run_migrations, get_migration_status};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// run_migrations(&pool).await?;
///
/// let status = get_migration_status(&pool).await?;
/// println!("Applied {} migrations", status.applied_migrations);
/// # Ok(())
/// # }
/// ```

use serde::Serialize;
use sqlx::{migrate::MigrateDatabase, migrate::Migrator, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Number of forward migrations embedded in this build
pub fn known_migrations() -> usize {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
        .count()
}

/// Migration status information
#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Number of migrations embedded in this build
    pub known_migrations: usize,

    /// Latest applied migration version
    pub latest_version: Option<i64>,

    /// Whether every embedded migration has been applied
    pub is_up_to_date: bool,
}

/// Runs all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails or the database is unreachable
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(known = known_migrations(), "Starting database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}

/// Gets the current migration status
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    let known = known_migrations();

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        debug!("Migrations table does not exist yet");
        return Ok(MigrationStatus {
            applied_migrations: 0,
            known_migrations: known,
            latest_version: None,
            is_up_to_date: known == 0,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    let applied_migrations = count as usize;

    debug!(
        applied_migrations,
        latest_version = ?latest_version,
        "Migration status retrieved"
    );

    Ok(MigrationStatus {
        applied_migrations,
        known_migrations: known,
        latest_version,
        is_up_to_date: applied_migrations >= known,
    })
}

/// Creates the database if it doesn't exist (development and tests)
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_embedded() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        assert!(!versions.is_empty());

        let mut sorted = versions.clone();
        sorted.sort_unstable();
        assert_eq!(versions, sorted, "migrations should be ordered by version");
    }
}
