//! Provider trait — the abstraction over text-generation backends.
//!
//! A Provider knows how to turn an ordered message list into a single
//! reply. Network-backed providers speak the OpenAI-compatible
//! chat-completions contract; offline providers answer locally.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;
use crate::message::Message;

/// A request to a provider.
///
/// Model, temperature and token bound are tuned per provider and live on
/// the provider itself; the request only carries the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Ordered messages: system persona, trimmed history, new user turn
    pub messages: Vec<Message>,
}

impl ProviderRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// The newest user turn, if any.
    pub fn latest_user_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::message::Role::User)
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated text
    pub content: String,

    /// Which model responded (the provider name for offline providers)
    pub model: String,

    /// Token usage statistics, when the upstream reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The router calls `complete()` without knowing which backend it talks
/// to; credential requirements are declared so misconfiguration can be
/// reported before any call is made.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq", "mock").
    fn name(&self) -> &str;

    /// Whether this provider needs a credential to be contacted.
    fn requires_credential(&self) -> bool;

    /// Whether a credential is present. Offline providers report `true`.
    fn has_credential(&self) -> bool {
        !self.requires_credential()
    }

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Provider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn requires_credential(&self) -> bool {
            false
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            let content = request
                .latest_user_message()
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(ProviderResponse {
                content,
                model: "echo".into(),
                usage: None,
            })
        }
    }

    #[test]
    fn latest_user_message_skips_assistant_turns() {
        let req = ProviderRequest::new(vec![
            Message::system("persona"),
            Message::user("first"),
            Message::assistant("reply"),
            Message::user("second"),
        ]);
        assert_eq!(req.latest_user_message().unwrap().content, "second");
    }

    #[tokio::test]
    async fn offline_provider_defaults_to_having_credential() {
        let echo = Echo;
        assert!(echo.has_credential());
        let resp = echo
            .complete(ProviderRequest::new(vec![Message::user("hi")]))
            .await
            .unwrap();
        assert_eq!(resp.content, "hi");
    }
}
