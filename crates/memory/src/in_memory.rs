//! In-memory session store — process-wide, lost on restart.

use async_trait::async_trait;
use ecochat_core::error::SessionError;
use ecochat_core::message::Message;
use ecochat_core::session::{Session, SessionStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Default number of turns kept per session.
pub const DEFAULT_RETENTION_WINDOW: usize = 10;

/// A session store that keeps every session in a `HashMap`.
///
/// Locks are held only for the duration of a single map operation, never
/// across a provider call. Concurrent appends to the same session are not
/// serialized beyond that: last write wins.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    window: usize,
}

impl InMemorySessionStore {
    pub fn new(window: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            window: window.max(1),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_WINDOW)
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn retention_window(&self) -> usize {
        self.window
    }

    async fn get_or_create(&self, session_id: &str) -> Result<Session, SessionError> {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            return Ok(session.clone());
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(session_id.to_string()).or_insert_with(|| {
            debug!(session_id, "Creating session");
            Session::new(session_id)
        });
        Ok(session.clone())
    }

    async fn append(&self, session_id: &str, turn: Message) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        Ok(session.push_bounded(turn, self.window))
    }

    async fn append_exchange(
        &self,
        session_id: &str,
        user: Message,
        reply: Message,
    ) -> Result<usize, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id));
        session.push_bounded(user, self.window);
        Ok(session.push_bounded(reply, self.window))
    }

    async fn clear(&self, session_id: &str) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(session_id).is_some() {
            debug!(session_id, "Session cleared");
        }
        Ok(())
    }

    async fn count(&self) -> Result<usize, SessionError> {
        Ok(self.sessions.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_is_lazy_and_stable() {
        let store = InMemorySessionStore::default();
        assert_eq!(store.count().await.unwrap(), 0);

        let session = store.get_or_create("s1").await.unwrap();
        assert_eq!(session.id, "s1");
        assert!(session.is_empty());
        assert_eq!(store.count().await.unwrap(), 1);

        store.append("s1", Message::user("hello")).await.unwrap();
        let again = store.get_or_create("s1").await.unwrap();
        assert_eq!(again.len(), 1);
        assert_eq!(again.created_at, session.created_at);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn append_never_exceeds_window() {
        let store = InMemorySessionStore::new(10);
        for i in 0..25 {
            let len = store
                .append("s1", Message::user(format!("turn {i}")))
                .await
                .unwrap();
            assert!(len <= 10);
        }

        let session = store.get_or_create("s1").await.unwrap();
        assert_eq!(session.len(), 10);
        // Oldest evicted first: turns 15..25 remain in order.
        assert_eq!(session.turns[0].content, "turn 15");
        assert_eq!(session.turns[9].content, "turn 24");
    }

    #[tokio::test]
    async fn exchange_lands_as_a_pair() {
        let store = InMemorySessionStore::new(3);
        store.append("s1", Message::user("old")).await.unwrap();

        let len = store
            .append_exchange("s1", Message::user("solar?"), Message::assistant("Yes!"))
            .await
            .unwrap();
        assert_eq!(len, 3);

        let len = store
            .append_exchange("s1", Message::user("cost?"), Message::assistant("Cheap."))
            .await
            .unwrap();
        assert_eq!(len, 3);

        let session = store.get_or_create("s1").await.unwrap();
        let turns: Vec<&str> = session.turns.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(turns, ["Yes!", "cost?", "Cheap."]);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let store = InMemorySessionStore::default();
        store.clear("missing").await.unwrap();

        store.append("s1", Message::user("hi")).await.unwrap();
        store.append("s1", Message::assistant("hello!")).await.unwrap();
        store.clear("s1").await.unwrap();
        store.clear("s1").await.unwrap();

        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.get_or_create("s1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemorySessionStore::default();
        store.append("a", Message::user("solar")).await.unwrap();
        store.append("b", Message::user("water")).await.unwrap();
        store.append("b", Message::assistant("save it")).await.unwrap();

        assert_eq!(store.get_or_create("a").await.unwrap().len(), 1);
        assert_eq!(store.get_or_create("b").await.unwrap().len(), 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn snapshot_is_detached_from_store() {
        let store = InMemorySessionStore::default();
        let mut snapshot = store.get_or_create("s1").await.unwrap();
        snapshot.turns.push(Message::user("local only"));
        assert!(store.get_or_create("s1").await.unwrap().is_empty());
    }
}
