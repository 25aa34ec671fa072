//! Migrate command - Database migration management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::open(&config).await?;

    match args.action {
        MigrateAction::Up => {
            tracing::info!("Running pending migrations...");
            db.migrate_up().await?;
            tracing::info!("Migrations completed successfully");
        }
        MigrateAction::Down => {
            tracing::info!("Rolling back last migration...");
            db.migrate_down().await?;
            tracing::info!("Rollback completed successfully");
        }
        MigrateAction::Status => {
            for migration in db.migration_states().await? {
                let state = if migration.applied { "applied" } else { "pending" };
                println!("{:<50} {}", migration.name, state);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration...");
            db.migrate_fresh().await?;
            tracing::info!("Fresh migrations completed successfully");
        }
    }

    Ok(())
}
