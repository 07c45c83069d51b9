//! Storage layer for session transcripts.
//!
//! In-process [`SessionMemory`] is the source of truth while the process
//! runs. This layer lets transcripts outlive it: turns are appended to
//! `SQLite` as they are recorded and replayed into memory on startup.

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use schema::{CURRENT_SCHEMA_VERSION, SCHEMA_SQL};
pub use sqlite::SqliteStorage;
pub use traits::{SessionSummary, Storage, StorageStats};

use crate::core::Turn;
use crate::error::Result;
use crate::memory::SessionMemory;
use tracing::debug;

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".ragchat/sessions.db";

/// Replays a persisted session into `memory`.
///
/// Turns are appended after whatever the in-memory session already holds.
/// Returns the number of turns replayed.
///
/// # Errors
///
/// Returns an error if the turns cannot be loaded.
pub fn hydrate(memory: &SessionMemory, storage: &dyn Storage, session_id: &str) -> Result<usize> {
    let turns = storage.load_turns(session_id)?;
    let count = turns.len();
    let session = memory.get_or_create(session_id);
    for turn in turns {
        session.append(turn);
    }
    debug!(session_id, turns = count, "hydrated session");
    Ok(count)
}

/// Records a turn in both memory and storage.
///
/// Storage is written first so a failed write leaves memory unchanged.
///
/// # Errors
///
/// Returns an error if the storage write fails.
pub fn persist_turn(
    memory: &SessionMemory,
    storage: &mut dyn Storage,
    session_id: &str,
    turn: Turn,
) -> Result<usize> {
    let seq = storage.append_turn(session_id, &turn)?;
    memory.append(session_id, turn);
    Ok(seq)
}
