//! The chat orchestrator: one request, one turn.
//!
//! `handle_turn` runs the whole pipeline for a user message:
//!
//! 1. **Validate** the message (blank → rejected, nothing touched)
//! 2. **Check configuration** of the active provider
//! 3. **Load** the session snapshot, creating it if absent
//! 4. **Assemble** persona + trimmed history + new turn
//! 5. **Dispatch** to the provider (fallback on upstream failure)
//! 6. **Normalize** the reply
//! 7. **Append** the user turn and the reply in one store write
//!
//! No lock is held across the provider call. Two concurrent turns on one
//! session may interleave between step 3 and step 7. A failed append stores
//! neither turn.

use crate::assembler::PromptAssembler;
use crate::normalizer::normalize;
use crate::persona::Persona;
use ecochat_config::{AppConfig, ProviderKind};
use ecochat_core::error::{DispatchError, SessionError};
use ecochat_core::message::Message;
use ecochat_core::session::{DEFAULT_SESSION_ID, SessionStore};
use ecochat_memory::InMemorySessionStore;
use ecochat_providers::{FallbackResponder, ProviderRouter, build_from_config};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Message substituted when the fallback path has no user text to work with.
const FALLBACK_SEED: &str = "Hello";

/// Validation error for a missing or blank message.
pub const NO_MESSAGE: &str = "⚠️ No message provided";

/// The result of a successful turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub api_used: String,
    pub session_id: String,
    pub conversation_length: usize,
    pub degraded: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Configuration(#[from] DispatchError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Resolve an optional client-supplied session id. Blank ids use the
/// shared default session.
pub fn session_or_default(session_id: Option<&str>) -> &str {
    session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or(DEFAULT_SESSION_ID)
}

pub struct ChatOrchestrator {
    store: Arc<dyn SessionStore>,
    router: Arc<ProviderRouter>,
    assembler: PromptAssembler,
}

impl ChatOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        router: Arc<ProviderRouter>,
        assembler: PromptAssembler,
    ) -> Self {
        Self {
            store,
            router,
            assembler,
        }
    }

    /// Wire the in-memory store, configured router and persona.
    pub fn from_config(config: &AppConfig) -> Self {
        let window = config.session.retention_window;
        let fallback = Arc::new(FallbackResponder::default());
        Self::new(
            Arc::new(InMemorySessionStore::new(window)),
            Arc::new(build_from_config(config, fallback)),
            PromptAssembler::new(Persona::from_config(&config.persona), window),
        )
    }

    pub fn active_provider(&self) -> ProviderKind {
        self.router.active_kind()
    }

    pub fn router(&self) -> &ProviderRouter {
        &self.router
    }

    /// Process one user message on a session.
    pub async fn handle_turn(&self, session_id: &str, message: &str) -> Result<ChatReply, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::Validation(NO_MESSAGE.into()));
        }
        self.router.ensure_ready()?;

        let session = self.store.get_or_create(session_id).await?;
        let messages = self.assembler.assemble(&session.turns, message);
        debug!(session_id, history = session.len(), "Assembled prompt");

        let raw = self.router.dispatch(messages).await?;
        let reply = normalize(&raw.text);

        let conversation_length = self
            .store
            .append_exchange(
                session_id,
                Message::user(message),
                Message::assistant(reply.clone()),
            )
            .await?;

        info!(
            session_id,
            provider = %raw.provider,
            degraded = raw.degraded,
            conversation_length,
            "Turn complete"
        );

        Ok(ChatReply {
            reply,
            api_used: raw.provider.as_str().to_string(),
            session_id: session_id.to_string(),
            conversation_length,
            degraded: raw.degraded,
        })
    }

    /// A normalized fallback reply with no session context.
    pub fn fallback_reply(&self, message: Option<&str>) -> String {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(FALLBACK_SEED);
        normalize(&self.router.fallback().respond(message, &[]))
    }

    pub async fn clear_session(&self, session_id: &str) -> Result<(), ChatError> {
        self.store.clear(session_id).await?;
        info!(session_id, "Session cleared");
        Ok(())
    }

    pub async fn session_count(&self) -> Result<usize, ChatError> {
        Ok(self.store.count().await?)
    }
}
