//! Offline provider — answers through the fallback responder, no network.

use crate::fallback::FallbackResponder;
use async_trait::async_trait;
use ecochat_core::error::ProviderError;
use ecochat_core::message::{Message, Role};
use ecochat_core::provider::{Provider, ProviderRequest, ProviderResponse};
use std::sync::Arc;

/// A provider that never leaves the process. Backs the MOCK and
/// HUGGINGFACE selections.
pub struct OfflineProvider {
    name: String,
    responder: Arc<FallbackResponder>,
}

impl OfflineProvider {
    pub fn new(name: impl Into<String>, responder: Arc<FallbackResponder>) -> Self {
        Self {
            name: name.into(),
            responder,
        }
    }

    pub fn mock(responder: Arc<FallbackResponder>) -> Self {
        Self::new("mock", responder)
    }
}

/// Split an assembled conversation into the newest user message and the
/// non-system turns that preceded it.
pub fn conversation_parts(messages: &[Message]) -> (&str, Vec<Message>) {
    let last_user = messages.iter().rposition(|m| m.role == Role::User);
    match last_user {
        Some(idx) => {
            let history = messages[..idx]
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned()
                .collect();
            (messages[idx].content.as_str(), history)
        }
        None => ("", Vec::new()),
    }
}

#[async_trait]
impl Provider for OfflineProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires_credential(&self) -> bool {
        false
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let (message, history) = conversation_parts(&request.messages);
        Ok(ProviderResponse {
            content: self.responder.respond(message, &history),
            model: self.name.clone(),
            usage: None,
        })
    }
}
