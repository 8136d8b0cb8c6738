//! Embedded schema migrations for the decision store.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

/// Migrations compiled from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply all pending migrations against `database_url`.
///
/// Blocks the calling thread; async callers should run it on a blocking
/// task.
///
/// # Errors
///
/// Returns [`PoolError::Build`] when the connection cannot be established or
/// a migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, PoolError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| PoolError::build(format!("migration connection: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PoolError::build(format!("migration: {err}")))?;
    info!(count = applied.len(), "applied pending migrations");
    Ok(applied.len())
}
