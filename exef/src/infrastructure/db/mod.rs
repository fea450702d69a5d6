//! Database plumbing: the embedded schema and pool-opening helpers that the
//! storage router builds on.

pub mod schema;

use exef_domain::FlowError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// Opens a SQLite pool at `url` (creating the file if missing) and applies
/// the embedded schema. Used both for the shared database and for each
/// per-entity file the storage router opens on demand.
pub async fn open_pool(url: &str) -> Result<SqlitePool, FlowError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| FlowError::Configuration(format!("invalid database url {:?}: {}", url, e)))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
        .map_err(|e| FlowError::Database(e.to_string()))?;

    schema::apply_schema(&pool).await?;
    Ok(pool)
}

/// Builds a `sqlite://` URL for a file path, creating its parent directory
/// if necessary (per-entity databases live under `entity_db_dir`).
pub fn file_url(path: &Path) -> Result<String, FlowError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(format!("sqlite://{}", path.display()))
}
