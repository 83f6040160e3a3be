use anyhow::{Context, Result};
use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::{ItemRepository, RoomRepository};
use crate::storage::traits::Connection;

/// DbConnection manages the SQLite pool shared by all repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database file at `path`
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", path.display()))?;

        Self::setup_schema(&pool).await?;
        info!("Opened inventory database at {}", path.display());

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Fresh in-memory database, used by tests and throwaway sessions
    ///
    /// Every pooled connection to `:memory:` is its own database, so the pool is
    /// pinned to a single connection that never expires.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                icon TEXT NOT NULL DEFAULT 'house',
                color_name TEXT NOT NULL DEFAULT 'blue',
                date_created TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_rooms_name
            ON rooms(name);
            "#,
        )
        .execute(pool)
        .await?;

        // category and item_condition are nullable; readers apply the defaults
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                item_description TEXT NOT NULL DEFAULT '',
                category TEXT,
                item_condition TEXT,
                room_id TEXT REFERENCES rooms (id),
                make TEXT NOT NULL DEFAULT '',
                model TEXT NOT NULL DEFAULT '',
                serial_number TEXT NOT NULL DEFAULT '',
                purchase_price REAL,
                purchase_date TEXT,
                purchase_store TEXT NOT NULL DEFAULT '',
                current_value REAL,
                warranty_expiration TEXT,
                warranty_provider TEXT NOT NULL DEFAULT '',
                notes TEXT NOT NULL DEFAULT '',
                date_added TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_items_room_id
            ON items(room_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS photos (
                id TEXT PRIMARY KEY,
                item_id TEXT NOT NULL REFERENCES items (id),
                position INTEGER NOT NULL,
                image_data BLOB NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_photos_item_id
            ON photos(item_id, position);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS receipts (
                id TEXT PRIMARY KEY,
                item_id TEXT NOT NULL REFERENCES items (id),
                position INTEGER NOT NULL,
                filename TEXT NOT NULL DEFAULT '',
                file_data BLOB NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_receipts_item_id
            ON receipts(item_id, position);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type ItemRepository = ItemRepository;
    type RoomRepository = RoomRepository;

    fn create_item_repository(&self) -> Self::ItemRepository {
        ItemRepository::new(self.clone())
    }

    fn create_room_repository(&self) -> Self::RoomRepository {
        RoomRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_database_is_created_with_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("inventory.db");

        let conn = DbConnection::new(&db_path).await.expect("Failed to open database");
        assert!(db_path.exists());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(conn.pool())
            .await
            .expect("items table should exist");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let conn = DbConnection::in_memory().await.unwrap();
        DbConnection::setup_schema(conn.pool())
            .await
            .expect("Re-running schema setup should succeed");
    }
}
