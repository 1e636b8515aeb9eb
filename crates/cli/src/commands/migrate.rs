//! Database migration command.

use stockroom_server::db::MIGRATOR;

use super::CommandError;

/// Run all pending migrations against `DATABASE_URL`.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
