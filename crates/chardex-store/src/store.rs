use rusqlite::{Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable key-value store over SQLite
///
/// SQLite was chosen because:
/// - Zero-config embedded database
/// - Battle-tested and reliable
/// - Doesn't require a separate process
///
/// Values are JSON blobs written through synchronously on every save.
/// Reads never fail loudly: a missing or malformed value comes back as
/// `None` so callers can fall back to their defaults. Writes are best
/// effort - a failed write is logged and the in-memory state stays
/// authoritative for the rest of the session.
pub struct StateStore {
    conn: Connection,
}

impl StateStore {
    /// Open (or create) the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }

    /// In-memory store for tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Load the value stored under `key`.
    ///
    /// Returns `None` when the key is absent, and also when the stored
    /// value no longer parses - the corrupt value is logged and dropped
    /// rather than surfaced as an error.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self
            .conn
            .query_row("SELECT value FROM state WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored value for key '{}'", key);
                return None;
            }
            Err(e) => {
                warn!("Failed to read key '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Discarding malformed value for key '{}': {}", key, e);
                None
            }
        }
    }

    /// Store `value` under `key`, replacing whatever was there.
    ///
    /// The write goes through immediately - no batching, no debounce. A
    /// failed write is logged and swallowed; the session keeps running on
    /// in-memory state, it just won't survive a restart.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize value for key '{}': {}", key, e);
                return;
            }
        };

        let now = chrono::Utc::now().timestamp();
        let result = self.conn.execute(
            "INSERT INTO state (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, json, now],
        );

        if let Err(e) = result {
            warn!("Failed to persist key '{}' (kept in memory only): {}", key, e);
        }
    }

    /// Delete the value stored under `key`. No-op when absent.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self
            .conn
            .execute("DELETE FROM state WHERE key = ?1", [key])
        {
            warn!("Failed to remove key '{}': {}", key, e);
        }
    }

    /// Drop everything. Mostly useful for a factory reset.
    pub fn clear(&self) {
        if let Err(e) = self.conn.execute("DELETE FROM state", []) {
            warn!("Failed to clear store: {}", e);
        }
    }
}
