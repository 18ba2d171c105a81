#![cfg(test)]
use configs::DatabaseConfig;
use sea_orm::DatabaseConnection;

use models::db::{connect_with_config, migrate};

/// Fresh in-memory database per test, schema already applied.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migrate(&db).await?;
    Ok(db)
}
