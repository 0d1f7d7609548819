//! Database schema migrations.
//!
//! The durable schema is a single key-value table; the session marker lives
//! in a TEMP table created separately per connection.

use rusqlite::Connection;
use tracing::info;

use sahay_core::error::SahayError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Future migrations
/// can be added by checking the current version and applying incremental
/// changes.
pub fn run_migrations(conn: &Connection) -> Result<(), SahayError> {
    // Create the migrations tracking table first.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| SahayError::Storage(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| SahayError::Storage(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: kv_store");
    }

    Ok(())
}

/// Version 1: durable key-value slots.
fn apply_v1(conn: &Connection) -> Result<(), SahayError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kv (
            key         TEXT PRIMARY KEY NOT NULL,
            value       TEXT NOT NULL,
            updated_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );

        INSERT INTO schema_migrations (version, name) VALUES (1, 'kv_store');
        ",
    )
    .map_err(|e| SahayError::Storage(format!("Failed to apply migration v1: {}", e)))
}

/// Create the session-scoped marker table.
///
/// TEMP tables live exactly as long as the connection, so a marker written
/// here survives engine restarts on the same connection but not a new
/// session. This must run on every connection, after migrations.
pub fn create_session_table(conn: &Connection) -> Result<(), SahayError> {
    conn.execute_batch(
        "CREATE TEMP TABLE IF NOT EXISTS session_kv (
            key    TEXT PRIMARY KEY NOT NULL,
            value  TEXT NOT NULL
        );",
    )
    .map_err(|e| SahayError::Storage(format!("Failed to create session table: {}", e)))
}
