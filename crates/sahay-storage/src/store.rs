//! The persistence port and its SQLite implementation.
//!
//! The message log is held as one serialized slot under a fixed key, written
//! whole on every mutation so a reload never loses acknowledged messages.
//! A session-scoped marker distinguishes "fresh session" from "reload within
//! the same session".

use std::path::Path;

use rusqlite::OptionalExtension;

use sahay_core::error::SahayError;
use sahay_core::types::MessageRecord;

use crate::db::Database;

/// Durable slot holding the serialized message log.
pub const HISTORY_KEY: &str = "chat-history";

/// Session-scoped marker key. Present means "this session has already
/// loaded once"; absent means the persisted history is stale and must be
/// discarded before the first read.
pub const SESSION_MARKER_KEY: &str = "visited";

/// Port for conversation history persistence.
///
/// Writes are synchronous; the engine persists the full log after every
/// append or replace before yielding back to the caller.
pub trait HistoryStore: Send + Sync {
    /// Load the persisted message log. An absent slot is an empty log.
    fn load(&self) -> Result<Vec<MessageRecord>, SahayError>;

    /// Overwrite the persisted message log with `records`.
    fn save(&self, records: &[MessageRecord]) -> Result<(), SahayError>;

    /// Remove the persisted message log.
    fn clear(&self) -> Result<(), SahayError>;

    /// Whether this session has already been marked as seen.
    fn session_seen(&self) -> Result<bool, SahayError>;

    /// Mark this session as seen.
    fn mark_session_seen(&self) -> Result<(), SahayError>;
}

/// SQLite-backed [`HistoryStore`].
///
/// The history slot lives in the durable `kv` table; the session marker
/// lives in a TEMP table scoped to the connection, so reopening the store
/// (a new session) starts with no marker while reusing the same store
/// instance (a reload) keeps it.
pub struct ProfileStore {
    db: Database,
}

impl ProfileStore {
    /// Open (or create) the profile store at the given path.
    pub fn open(path: &Path) -> Result<Self, SahayError> {
        Ok(Self {
            db: Database::open(path)?,
        })
    }

    /// Open an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, SahayError> {
        Ok(Self {
            db: Database::in_memory()?,
        })
    }
}

impl HistoryStore for ProfileStore {
    fn load(&self) -> Result<Vec<MessageRecord>, SahayError> {
        let slot: Option<String> = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv WHERE key = ?1",
                rusqlite::params![HISTORY_KEY],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| SahayError::Storage(format!("Failed to load history: {}", e)))
        })?;

        match slot {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[MessageRecord]) -> Result<(), SahayError> {
        let json = serde_json::to_string(records)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now'))
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                rusqlite::params![HISTORY_KEY, json],
            )
            .map_err(|e| SahayError::Storage(format!("Failed to save history: {}", e)))?;
            Ok(())
        })
    }

    fn clear(&self) -> Result<(), SahayError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "DELETE FROM kv WHERE key = ?1",
                rusqlite::params![HISTORY_KEY],
            )
            .map_err(|e| SahayError::Storage(format!("Failed to clear history: {}", e)))?;
            Ok(())
        })
    }

    fn session_seen(&self) -> Result<bool, SahayError> {
        self.db.with_conn(|conn| {
            let seen: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM session_kv WHERE key = ?1",
                    rusqlite::params![SESSION_MARKER_KEY],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| SahayError::Storage(format!("Failed to read marker: {}", e)))?;
            Ok(seen.is_some())
        })
    }

    fn mark_session_seen(&self) -> Result<(), SahayError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO session_kv (key, value) VALUES (?1, 'true')",
                rusqlite::params![SESSION_MARKER_KEY],
            )
            .map_err(|e| SahayError::Storage(format!("Failed to write marker: {}", e)))?;
            Ok(())
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
