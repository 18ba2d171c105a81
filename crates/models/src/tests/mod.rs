use configs::DatabaseConfig;
use sea_orm::DatabaseConnection;

use crate::db;



/// Fresh in-memory SQLite database with the schema applied
pub async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = db::connect_with_config(&cfg).await?;
    db::migrate(&db).await?;
    Ok(db)
}
