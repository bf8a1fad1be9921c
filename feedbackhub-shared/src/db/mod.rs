/// Database layer
///
/// - `pool`: PostgreSQL connection pool with health checks
/// - `migrations`: Embedded migration runner (SQL lives in `migrations/` at the workspace root)
///
/// Models are in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
