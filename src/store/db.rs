//! SQLite connection and schema management
//!
//! Manages `~/.bowo/bowo.db` (or the configured path) with versioned migrations.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

use crate::config::StorageSettings;

/// Shared SQLite handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database named by `[storage]`
    pub fn open_configured(settings: &StorageSettings) -> Result<Self> {
        Self::open(&settings.resolved_db_path())
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::from_connection(conn)
    }

    /// Private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Lock the connection. A poisoned lock is recovered: SQLite keeps its
    /// own consistency and every write here is a single statement or transaction.
    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        drop(conn);
        self.run_migrations()
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        if version < 1 {
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (1)", [])?;
        }

        // Migration 2: accounts and sessions
        if version < 2 {
            conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS accounts (
                    id TEXT PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE COLLATE NOCASE,
                    email TEXT NOT NULL,
                    password_hash TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                );

                -- Tokens are stored hashed; the raw values only exist client-side
                CREATE TABLE IF NOT EXISTS sessions (
                    access_hash TEXT PRIMARY KEY,
                    refresh_hash TEXT NOT NULL UNIQUE,
                    user_id TEXT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
                    access_expires_at INTEGER NOT NULL,
                    refresh_expires_at INTEGER NOT NULL,
                    created_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
                "#,
            )?;
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        // Migration 3: per-user trick listing
        if version < 3 {
            conn.execute_batch(
                "CREATE INDEX IF NOT EXISTS idx_trick_progress_user ON trick_progress(user_id);",
            )?;
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (3)", [])?;
        }

        debug!("[bowo:store] Schema at version {}", version.max(3));
        Ok(())
    }

    /// Number of stored progress documents
    pub fn user_count(&self) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM user_progress", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- One JSON document per user, replaced whole on every save
CREATE TABLE IF NOT EXISTS user_progress (
    user_id TEXT PRIMARY KEY,
    doc TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS trick_progress (
    user_id TEXT NOT NULL,
    trick_id TEXT NOT NULL,
    level INTEGER NOT NULL DEFAULT 0 CHECK (level BETWEEN 0 AND 8),
    last_question_at TEXT,
    PRIMARY KEY (user_id, trick_id)
);
"#;
