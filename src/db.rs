use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Create a SeaORM connection.
///
/// Statement logging comes from SeaORM's `debug-print` output at `debug`
/// level, so the sqlx per-query log is switched off.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.max_connections(5).sqlx_logging(false);
    let conn = Database::connect(options).await?;
    Ok(conn)
}
