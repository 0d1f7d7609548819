//! Sahay storage crate - SQLite-backed conversation history.
//!
//! Provides a WAL-mode SQLite database with migrations and the
//! [`HistoryStore`] port: a durable key-value slot holding the serialized
//! message log plus a session-scoped marker used to detect a fresh session.

pub mod db;
pub mod migrations;
pub mod store;

pub use db::Database;
pub use store::{HistoryStore, ProfileStore, HISTORY_KEY, SESSION_MARKER_KEY};
