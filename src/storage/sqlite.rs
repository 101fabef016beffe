// SQLite-backed blob store
// Owns the connection and schema; exposes only the BlobStore interface.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Mutex;

use super::BlobStore;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Blob store over a single SQLite file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the store at the given path and run migrations.
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(&db_path).context("Failed to open database")?;

        run_migrations(&conn).context("Failed to run database migrations")?;

        log::info!("Blob store initialized at: {:?}", db_path);

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
        })
    }

    /// Execute a function with access to the database connection
    fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("Failed to lock database connection: {}", e))?;
        f(&conn)
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }
}

impl BlobStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT value FROM blobs WHERE key = ?")
                .context("Failed to prepare blob load query")?;

            let result = stmt.query_row(params![key], |row| row.get(0));

            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e).context("Failed to load blob"),
            }
        })
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO blobs (key, value, updated_at)
                VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                params![key, value],
            )
            .context("Failed to save blob")?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM blobs WHERE key = ?", params![key])
                .context("Failed to remove blob")?;
            Ok(())
        })
    }
}

/// Run all necessary migrations to bring the database up to date
fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    if current_version > SCHEMA_VERSION {
        log::warn!(
            "Database schema version {} is newer than supported version {}",
            current_version,
            SCHEMA_VERSION
        );
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .context("Failed to create schema_version table")?;

    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })
        .context("Failed to read schema version")?;

    Ok(version.unwrap_or(0))
}

/// Initial schema (version 1)
fn migrate_v1(conn: &Connection) -> Result<()> {
    log::info!("Running database migration v1 - Blob table");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS blobs (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT INTO schema_version (version) VALUES (1);
        "#,
    )
    .context("Failed to run migration v1")?;

    log::info!("Migration v1 completed successfully");
    Ok(())
}
