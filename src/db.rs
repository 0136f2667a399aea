use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

/// Opens the connection pool for `database_url` (Postgres or SQLite).
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.connect_timeout(Duration::from_secs(10));

    // Every connection to an in-memory SQLite URL is a fresh empty database.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    tracing::info!(
        backend = if database_url.starts_with("postgres") { "postgres" } else { "sqlite" },
        "connecting to database"
    );
    Database::connect(options).await
}

/// Applies pending schema migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
