//! Session trait — keyed conversation history with bounded retention.
//!
//! A session is created lazily on first access and lives until it is
//! cleared. The store caps the number of turns per session; it does not
//! cap the number of sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::SessionError;
use crate::message::Message;

/// Session key used when the client does not supply one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// A server-side conversation context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Client-supplied key
    pub id: String,

    /// Ordered turns, oldest first
    pub turns: Vec<Message>,

    /// When this session was created
    pub created_at: DateTime<Utc>,

    /// When the last turn was appended
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Create a new empty session.
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            turns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a turn, then evict the oldest turns until at most `window`
    /// remain. Returns the resulting length.
    pub fn push_bounded(&mut self, turn: Message, window: usize) -> usize {
        self.turns.push(turn);
        if self.turns.len() > window {
            let excess = self.turns.len() - window;
            self.turns.drain(..excess);
        }
        self.updated_at = Utc::now();
        self.turns.len()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Storage for sessions.
///
/// The in-memory implementation never fails; the `Result` returns leave
/// room for persistent or distributed backends.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The name of this backend (e.g., "in_memory").
    fn name(&self) -> &str;

    /// Maximum number of turns kept per session.
    fn retention_window(&self) -> usize;

    /// Return the existing session or create an empty one.
    async fn get_or_create(&self, session_id: &str) -> Result<Session, SessionError>;

    /// Append a turn, evicting oldest turns past the retention window.
    /// Returns the session length after the append.
    async fn append(&self, session_id: &str, turn: Message) -> Result<usize, SessionError>;

    /// Append a user turn and its reply as one write. Either both turns are
    /// stored or neither is. Returns the session length after the append.
    async fn append_exchange(
        &self,
        session_id: &str,
        user: Message,
        reply: Message,
    ) -> Result<usize, SessionError>;

    /// Remove the session entirely. Clearing an unknown session succeeds.
    async fn clear(&self, session_id: &str) -> Result<(), SessionError>;

    /// Number of live sessions.
    async fn count(&self) -> Result<usize, SessionError>;
}
