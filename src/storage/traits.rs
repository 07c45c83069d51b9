//! Storage trait definition.
//!
//! Defines the interface for persistent session stores.

use crate::core::Turn;
use crate::error::Result;
use serde::Serialize;

/// Trait for persistent session transcript backends.
///
/// Turns are kept per session in arrival order. Sessions are created
/// implicitly by the first appended turn.
pub trait Storage: Send {
    /// Initializes storage (creates schema).
    ///
    /// Should be idempotent - safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    fn init(&mut self) -> Result<()>;

    /// Checks if storage is initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the check cannot be performed.
    fn is_initialized(&self) -> Result<bool>;

    /// Deletes every session and turn but preserves the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    fn reset(&mut self) -> Result<()>;

    /// Appends a turn to a session, creating the session if needed.
    ///
    /// Returns the turn's position within the session, starting at 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn append_turn(&mut self, session_id: &str, turn: &Turn) -> Result<usize>;

    /// Loads a session's turns in arrival order.
    ///
    /// An unknown session yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored role is invalid.
    fn load_turns(&self, session_id: &str) -> Result<Vec<Turn>>;

    /// Removes a session's turns. The session itself is kept.
    ///
    /// Returns the number of turns removed.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    fn clear_session(&mut self, session_id: &str) -> Result<usize>;

    /// Lists all sessions ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_sessions(&self) -> Result<Vec<SessionSummary>>;

    /// Gets storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if statistics cannot be gathered.
    fn stats(&self) -> Result<StorageStats>;
}

/// One row of [`Storage::list_sessions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Session id.
    pub id: String,
    /// Number of stored turns.
    pub turn_count: usize,
    /// Creation time (Unix seconds).
    pub created_at: i64,
    /// Last modification time (Unix seconds).
    pub updated_at: i64,
}

/// Storage statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    /// Number of sessions.
    pub session_count: usize,
    /// Number of turns across all sessions.
    pub turn_count: usize,
    /// Total size of turn content in bytes.
    pub total_content_size: usize,
    /// Schema version.
    pub schema_version: u32,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}
