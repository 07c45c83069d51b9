//! `SQLite` storage implementation.
//!
//! Provides persistent session transcripts using `SQLite` with
//! transactional appends.

// SQLite stores all integers as i64. These casts are intentional and safe
// because we only store non-negative values that fit in usize.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

use crate::core::{Speaker, Turn};
use crate::error::{Result, StorageError};
use crate::storage::schema::{
    CHECK_SCHEMA_SQL, CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, SCHEMA_SQL, SET_VERSION_SQL,
};
use crate::storage::traits::{SessionSummary, Storage, StorageStats};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use tracing::debug;

/// SQLite-based session store.
///
/// # Examples
///
/// ```no_run
/// use ragchat::core::Turn;
/// use ragchat::storage::{SqliteStorage, Storage};
///
/// let mut storage = SqliteStorage::open(".ragchat/sessions.db").unwrap();
/// storage.init().unwrap();
/// storage.append_turn("default", &Turn::user("hello")).unwrap();
/// ```
pub struct SqliteStorage {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SqliteStorage {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Database(e.to_string()))?;
            }
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        conn.execute("PRAGMA foreign_keys = ON;", [])
            .map_err(StorageError::from)?;

        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn now() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn count(&self, sql: &str) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row(sql, [], |row| row.get(0))
            .map_err(StorageError::from)?;
        Ok(n as usize)
    }
}

impl Storage for SqliteStorage {
    fn init(&mut self) -> Result<()> {
        if !self.is_initialized()? {
            self.conn
                .execute_batch(SCHEMA_SQL)
                .map_err(StorageError::from)?;
            self.set_schema_version(CURRENT_SCHEMA_VERSION)?;
            debug!(path = ?self.path, "initialized session store");
        }
        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        Ok(self.count(CHECK_SCHEMA_SQL)? > 0)
    }

    fn reset(&mut self) -> Result<()> {
        self.conn
            .execute_batch(
                r"
            DELETE FROM turns;
            DELETE FROM sessions;
        ",
            )
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn append_turn(&mut self, session_id: &str, turn: &Turn) -> Result<usize> {
        let now = Self::now();
        let tx = self.conn.transaction().map_err(StorageError::from)?;

        tx.execute(
            r"
            INSERT INTO sessions (id, created_at, updated_at) VALUES (?1, ?2, ?2)
            ON CONFLICT(id) DO UPDATE SET updated_at = excluded.updated_at
        ",
            params![session_id, now],
        )
        .map_err(StorageError::from)?;

        let seq: i64 = tx
            .query_row(
                "SELECT COALESCE(MAX(seq) + 1, 0) FROM turns WHERE session_id = ?",
                params![session_id],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;

        tx.execute(
            r"
            INSERT INTO turns (session_id, seq, role, content, created_at)
            VALUES (?, ?, ?, ?, ?)
        ",
            params![session_id, seq, turn.role.as_str(), turn.content, now],
        )
        .map_err(StorageError::from)?;

        tx.commit().map_err(StorageError::from)?;
        Ok(seq as usize)
    }

    fn load_turns(&self, session_id: &str) -> Result<Vec<Turn>> {
        let mut stmt = self
            .conn
            .prepare("SELECT role, content FROM turns WHERE session_id = ? ORDER BY seq")
            .map_err(StorageError::from)?;

        let rows = stmt
            .query_map(params![session_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(StorageError::from)?;

        let mut turns = Vec::new();
        for row in rows {
            let (role, content) = row.map_err(StorageError::from)?;
            let speaker: Speaker = role.parse().map_err(StorageError::InvalidRole)?;
            turns.push(Turn::new(speaker, content));
        }
        Ok(turns)
    }

    fn clear_session(&mut self, session_id: &str) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM turns WHERE session_id = ?", params![session_id])
            .map_err(StorageError::from)?;
        self.conn
            .execute(
                "UPDATE sessions SET updated_at = ? WHERE id = ?",
                params![Self::now(), session_id],
            )
            .map_err(StorageError::from)?;
        Ok(removed)
    }

    fn list_sessions(&self) -> Result<Vec<SessionSummary>> {
        let mut stmt = self
            .conn
            .prepare(
                r"
            SELECT s.id, COUNT(t.id), s.created_at, s.updated_at
            FROM sessions s LEFT JOIN turns t ON t.session_id = s.id
            GROUP BY s.id
            ORDER BY s.id
        ",
            )
            .map_err(StorageError::from)?;

        let sessions = stmt
            .query_map([], |row| {
                Ok(SessionSummary {
                    id: row.get(0)?,
                    turn_count: row.get::<_, i64>(1)? as usize,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(sessions)
    }

    fn stats(&self) -> Result<StorageStats> {
        let session_count = self.count("SELECT COUNT(*) FROM sessions")?;
        let turn_count = self.count("SELECT COUNT(*) FROM turns")?;
        let total_content_size =
            self.count("SELECT COALESCE(SUM(LENGTH(CAST(content AS BLOB))), 0) FROM turns")?;
        let schema_version = self.get_schema_version()?.unwrap_or(0);

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok().map(|m| m.len()));

        Ok(StorageStats {
            session_count,
            turn_count,
            total_content_size,
            schema_version,
            db_size,
        })
    }
}
