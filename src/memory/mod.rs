//! Per-session conversational memory.
//!
//! [`SessionMemory`] owns every session transcript in the process. The id
//! map and each session are locked independently, so requests for
//! different sessions never contend on a session lock and never see each
//! other's turns. Two requests racing on the same session may interleave
//! their appends in either order.
//!
//! History is unbounded: nothing is trimmed or summarized for the life of
//! the process. [`SessionMemory::clear`] is the only way to shrink a
//! transcript.

use crate::core::{Session, Speaker, Turn};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Shared handle to one session.
///
/// Handles returned for the same id point at the same session, so an append
/// through one handle is visible through every other.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    fn new(id: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Session::new(id))),
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> String {
        self.read().id.clone()
    }

    /// Appends a turn.
    pub fn append(&self, turn: Turn) {
        self.write().push(turn);
    }

    /// Returns a snapshot of the transcript in arrival order.
    pub fn history(&self) -> Vec<Turn> {
        self.read().turns().to_vec()
    }

    /// Empties the transcript.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether both handles refer to the same session.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // Session mutations are single `Vec` operations; a poisoned lock still
    // guards a consistent transcript.
    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide store of session transcripts keyed by id.
///
/// # Examples
///
/// ```
/// use ragchat::core::Turn;
/// use ragchat::memory::SessionMemory;
///
/// let memory = SessionMemory::new();
/// memory.append("s1", Turn::user("What is the PTO policy?"));
/// memory.append("s1", Turn::assistant("Employees accrue..."));
/// assert_eq!(memory.history("s1").len(), 2);
/// assert!(memory.history("s2").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct SessionMemory {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl SessionMemory {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating an empty one on first use.
    pub fn get_or_create(&self, id: &str) -> SessionHandle {
        if let Some(handle) = self.read_map().get(id) {
            return handle.clone();
        }

        let mut sessions = self.write_map();
        // Another thread may have inserted between the two locks.
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(session_id = id, "created session");
                SessionHandle::new(id)
            })
            .clone()
    }

    /// Appends a turn to the session's transcript.
    pub fn append(&self, id: &str, turn: Turn) {
        self.get_or_create(id).append(turn);
    }

    /// Appends a turn built from a speaker and content.
    pub fn record_turn(&self, id: &str, speaker: Speaker, content: impl Into<String>) {
        self.append(id, Turn::new(speaker, content));
    }

    /// Returns the session's transcript in arrival order.
    pub fn history(&self, id: &str) -> Vec<Turn> {
        self.get_or_create(id).history()
    }

    /// Empties the session's transcript. The id stays valid.
    pub fn clear(&self, id: &str) {
        debug!(session_id = id, "cleared session");
        self.get_or_create(id).clear();
    }

    /// Whether a session with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.read_map().contains_key(id)
    }

    /// Returns all known session ids, sorted.
    pub fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.read_map().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of sessions.
    pub fn len(&self) -> usize {
        self.read_map().len()
    }

    /// Whether no session exists.
    pub fn is_empty(&self) -> bool {
        self.read_map().is_empty()
    }

    fn read_map(&self) -> RwLockReadGuard<'_, HashMap<String, SessionHandle>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_map(&self) -> RwLockWriteGuard<'_, HashMap<String, SessionHandle>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_or_create_returns_same_session() {
        let memory = SessionMemory::new();
        let first = memory.get_or_create("s1");
        memory.append("s1", Turn::user("hello"));
        let second = memory.get_or_create("s1");

        assert!(first.ptr_eq(&second));
        assert_eq!(second.history(), vec![Turn::user("hello")]);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_history_preserves_arrival_order() {
        let memory = SessionMemory::new();
        memory.append("s", Turn::user("q1"));
        memory.append("s", Turn::assistant("a1"));
        memory.record_turn("s", Speaker::User, "q2");

        let contents: Vec<String> = memory.history("s").into_iter().map(|t| t.content).collect();
        assert_eq!(contents, ["q1", "a1", "q2"]);
    }

    #[test]
    fn test_unknown_session_has_empty_history() {
        let memory = SessionMemory::new();
        assert!(!memory.contains("new"));
        assert!(memory.history("new").is_empty());
        assert!(memory.contains("new"));
    }

    #[test]
    fn test_clear_keeps_session_usable() {
        let memory = SessionMemory::new();
        memory.append("s", Turn::user("a"));
        memory.clear("s");
        assert!(memory.history("s").is_empty());

        memory.append("s", Turn::user("b"));
        assert_eq!(memory.history("s"), vec![Turn::user("b")]);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let memory = SessionMemory::new();
        memory.append("a", Turn::user("for a"));
        memory.append("b", Turn::user("for b"));
        memory.clear("a");

        assert!(memory.history("a").is_empty());
        assert_eq!(memory.history("b"), vec![Turn::user("for b")]);
        assert_eq!(memory.session_ids(), ["a", "b"]);
        assert_eq!(memory.len(), 2);
    }

    #[test]
    fn test_handle_id() {
        let memory = SessionMemory::new();
        assert_eq!(memory.get_or_create("xyz").id(), "xyz");
        assert!(memory.get_or_create("xyz").is_empty());
    }

    #[test]
    fn test_concurrent_appends_across_sessions() {
        let memory = Arc::new(SessionMemory::new());
        let threads: Vec<_> = (0..8)
            .map(|t| {
                let memory = Arc::clone(&memory);
                thread::spawn(move || {
                    let id = format!("session-{t}");
                    for i in 0..100 {
                        memory.append(&id, Turn::user(i.to_string()));
                    }
                })
            })
            .collect();
        for handle in threads {
            handle.join().unwrap();
        }

        assert_eq!(memory.len(), 8);
        for t in 0..8 {
            let history = memory.history(&format!("session-{t}"));
            let expected: Vec<Turn> = (0..100).map(|i| Turn::user(i.to_string())).collect();
            assert_eq!(history, expected);
        }
    }

    #[test]
    fn test_concurrent_get_or_create_yields_one_session() {
        let memory = Arc::new(SessionMemory::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let memory = Arc::clone(&memory);
                thread::spawn(move || memory.get_or_create("shared"))
            })
            .collect();
        let handles: Vec<SessionHandle> = threads.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(handles.windows(2).all(|w| w[0].ptr_eq(&w[1])));
        assert_eq!(memory.len(), 1);
    }
}
