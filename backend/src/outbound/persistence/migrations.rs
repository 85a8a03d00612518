//! Embedded Diesel migrations and their startup runner.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// All migrations from the crate's `migrations/` directory, baked into the
/// binary so deployments need no separate migration step.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while applying migrations at startup.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open the migration connection.
    #[error("failed to connect for migrations: {0}")]
    Connection(String),
    /// A migration failed to apply.
    #[error("failed to run migrations: {0}")]
    Migration(String),
}

/// Apply any pending migrations over a dedicated synchronous connection.
///
/// Runs once at startup before the async pool is built; callers on an async
/// runtime should wrap this in `spawn_blocking`.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection cannot be established or
/// a migration fails.
pub fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| MigrationError::Connection(err.to_string()))?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Migration(err.to_string()))?;

    info!(applied = applied.len(), "database migrations applied");
    Ok(())
}
