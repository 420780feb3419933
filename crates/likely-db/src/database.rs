//! Database connection and table management.

use crate::error::Result;
use crate::schema;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Main database handle.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open or create a database at the given `sqlite:` URL.
    pub async fn open(url: &str) -> Result<Self> {
        Self::open_with(url, 5).await
    }

    pub async fn open_with(url: &str, max_connections: u32) -> Result<Self> {
        // Create the parent directory if it doesn't exist
        if let Some(path) = file_path(url) {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        info!(url = %url, "SQLite database opened");
        Ok(Self { pool })
    }

    /// Private in-memory database. A single connection that never expires
    /// keeps every query on the same database.
    pub async fn open_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables if they don't exist.
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(schema::CREATE_RISK_FACTORS)
            .execute(&self.pool)
            .await?;
        sqlx::query(&schema::baseline_table_ddl(schema::TABLE_RISK_BASELINE))
            .execute(&self.pool)
            .await?;
        sqlx::query(schema::CREATE_SUBMISSIONS)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Check if a table exists.
    pub async fn table_exists(&self, name: &str) -> Result<bool> {
        let found: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }
}

/// Filesystem path behind a `sqlite:` URL, if it names a file.
fn file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}
