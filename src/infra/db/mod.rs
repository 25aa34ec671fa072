//! PostgreSQL pool and schema management.

use std::collections::HashSet;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::{seaql_migrations, MigratorTrait};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::{Config, DB_CONNECT_TIMEOUT_SECONDS, DB_IDLE_TIMEOUT_SECONDS};

pub mod migrations;

pub use migrations::Migrator;

/// One embedded migration and whether it has run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MigrationState {
    #[schema(example = "m20240101_000001_create_users_table")]
    pub name: String,
    pub applied: bool,
}

/// Shared handle to the marketplace database
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Open the pool and bring the schema up to date.
    pub async fn connect(config: &Config) -> Result<Self, DbErr> {
        let database = Self::open(config).await?;

        if let Err(e) = database.migrate_up().await {
            tracing::error!(error = %e, "Schema migration failed at startup");
            return Err(e);
        }

        tracing::info!(
            max_connections = config.db_max_connections,
            "Database ready"
        );
        Ok(database)
    }

    /// Open the pool only; the `migrate` command drives the schema itself.
    pub async fn open(config: &Config) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.db_max_connections)
            .min_connections(config.db_min_connections)
            .connect_timeout(Duration::from_secs(DB_CONNECT_TIMEOUT_SECONDS))
            .idle_timeout(Duration::from_secs(DB_IDLE_TIMEOUT_SECONDS))
            .sqlx_logging(false);

        Ok(Self::from_connection(SeaDatabase::connect(options).await?))
    }

    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Cheap clone of the pooled connection for repositories.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    pub async fn migrate_up(&self) -> Result<(), DbErr> {
        Migrator::up(&self.connection, None).await
    }

    /// Revert the most recent migration.
    pub async fn migrate_down(&self) -> Result<(), DbErr> {
        Migrator::down(&self.connection, Some(1)).await
    }

    /// Drop every table and replay all migrations.
    pub async fn migrate_fresh(&self) -> Result<(), DbErr> {
        Migrator::fresh(&self.connection).await
    }

    /// Every embedded migration in order, flagged by whether it has run.
    pub async fn migration_states(&self) -> Result<Vec<MigrationState>, DbErr> {
        let applied: HashSet<String> = seaql_migrations::Entity::find()
            .all(&self.connection)
            .await?
            .into_iter()
            .map(|row| row.version)
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|migration| {
                let name = migration.name().to_string();
                MigrationState {
                    applied: applied.contains(&name),
                    name,
                }
            })
            .collect())
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disconnected_handle_fails_ping() {
        let database = Database::from_connection(DatabaseConnection::Disconnected);

        assert!(database.ping().await.is_err());
    }

    #[test]
    fn test_every_table_has_a_migration() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(names.len(), 7);
        assert!(names.windows(2).all(|w| w[0] < w[1]));
        assert!(names[0].ends_with("create_users_table"));
    }
}
