//! Database migration command.
//!
//! Runs the application migrations from `crates/api/migrations/` and then
//! the tower-sessions store migration, which manages its own schema.

use tower_sessions_sqlx_store::PostgresStore;

use super::CliError;

/// Run all database migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    tracing::info!("Running application migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
