//! Server-side session storage.
//!
//! # Design Decisions
//! - The cookie carries only an opaque random ID; session content stays here
//! - Expired sessions read as absent and are evicted on access
//! - A background sweep (`purge_expired`) bounds memory for abandoned sessions

use std::fmt;
use std::str::FromStr;

use dashmap::DashMap;
use uuid::Uuid;

use crate::session::model::Session;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Storage backing the session cookie.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Store a new session under a fresh ID.
    fn create(&self, session: Session) -> SessionId;

    /// Fetch a live session. Expired entries are removed and read as `None`.
    fn load(&self, id: &SessionId) -> Option<Session>;

    /// Replace an existing session. Returns false if the ID is unknown.
    fn update(&self, id: &SessionId, session: Session) -> bool;

    fn remove(&self, id: &SessionId) -> Option<Session>;

    /// Drop every expired session, returning how many were removed.
    fn purge_expired(&self) -> usize;
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, session: Session) -> SessionId {
        let id = SessionId::generate();
        self.sessions.insert(id, session);
        id
    }

    fn load(&self, id: &SessionId) -> Option<Session> {
        // Guard must be released before `remove` on the same shard.
        let session = self.sessions.get(id).map(|e| e.value().clone())?;
        if session.is_expired() {
            self.sessions.remove(id);
            return None;
        }
        Some(session)
    }

    fn update(&self, id: &SessionId, session: Session) -> bool {
        match self.sessions.get_mut(id) {
            Some(mut entry) => {
                *entry = session;
                true
            }
            None => false,
        }
    }

    fn remove(&self, id: &SessionId) -> Option<Session> {
        self.sessions.remove(id).map(|(_, s)| s)
    }

    fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        before.saturating_sub(self.sessions.len())
    }
}
