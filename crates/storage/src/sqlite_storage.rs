//! SQLite storage backend for Buildwise.
//!
//! Keeps every record as a JSON document in a single `entities` table,
//! keyed by `(entity_type, id)`.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use super::trait_::{RecordKind, Result, Storage};

/// SQLite storage implementation.
#[derive(Clone)]
pub struct SqliteStorage {
    /// Database connection pool
    pool: sqlx::SqlitePool,
}

impl SqliteStorage {
    /// Open (creating if missing) the database at `db_path`.
    pub async fn new(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Open the database file at `path`.
    pub async fn new_from_path(path: &Path) -> Result<Self> {
        Self::new(&format!("sqlite://{}", path.display())).await
    }

    /// Create an in-memory SQLite storage for testing.
    ///
    /// A single connection is used so every query sees the same database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let storage = Self { pool };
        storage.init_schema().await?;

        Ok(storage)
    }

    /// Initialize the database schema.
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS entities (
                id TEXT NOT NULL,
                entity_type TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (entity_type, id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_entities_type ON entities(entity_type)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Check the database is reachable.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn put_record(&mut self, kind: RecordKind, id: &str, json: String) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO entities (id, entity_type, data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(entity_type, id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
        )
        .bind(id)
        .bind(kind.as_str())
        .bind(json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!("Upserted {}/{}", kind.as_str(), id);
        Ok(())
    }

    async fn get_record(&self, kind: RecordKind, id: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT data FROM entities WHERE id = ? AND entity_type = ?")
            .bind(id)
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(row.try_get("data")?),
            None => None,
        })
    }

    async fn scan_records(&self, kind: RecordKind) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT data FROM entities WHERE entity_type = ?")
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| row.try_get::<String, _>("data").map_err(Into::into))
            .collect()
    }

    async fn remove_record(&mut self, kind: RecordKind, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entities WHERE id = ? AND entity_type = ?")
            .bind(id)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(&mut self, _message: &str) -> Result<()> {
        // Each statement auto-commits.
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        Ok(())
    }
}
