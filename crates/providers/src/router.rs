//! Provider router — dispatches a conversation to the configured provider.
//!
//! The active selection is fixed at construction. A provider failure is
//! never surfaced to callers: the fallback responder answers instead and
//! the reply is marked degraded. Only a missing credential is an error,
//! and it is detected before any provider is contacted.

use crate::fallback::FallbackResponder;
use crate::offline::{OfflineProvider, conversation_parts};
use crate::openai_compat::OpenAiCompatProvider;
use ecochat_config::{AppConfig, ProviderKind};
use ecochat_core::error::DispatchError;
use ecochat_core::message::Message;
use ecochat_core::provider::{Provider, ProviderRequest};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Appended to fallback replies substituted for a failed network call.
pub const DEGRADED_NOTE: &str = " (Note: Using fallback due to API issues)";

/// A reply before presentation normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReply {
    pub text: String,
    pub provider: ProviderKind,
    /// True when a fallback reply replaced a failed provider call
    pub degraded: bool,
}

/// Routes chat turns to the active provider.
pub struct ProviderRouter {
    active: ProviderKind,
    providers: HashMap<ProviderKind, Arc<dyn Provider>>,
    fallback: Arc<FallbackResponder>,
}

impl ProviderRouter {
    pub fn new(active: ProviderKind, fallback: Arc<FallbackResponder>) -> Self {
        Self {
            active,
            providers: HashMap::new(),
            fallback,
        }
    }

    /// Register a provider for a selection.
    pub fn register(&mut self, kind: ProviderKind, provider: Arc<dyn Provider>) {
        self.providers.insert(kind, provider);
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn Provider>> {
        self.providers.get(&kind).cloned()
    }

    /// The provider answering chat turns, if registered.
    pub fn active(&self) -> Option<Arc<dyn Provider>> {
        self.get(self.active)
    }

    pub fn active_kind(&self) -> ProviderKind {
        self.active
    }

    pub fn fallback(&self) -> &Arc<FallbackResponder> {
        &self.fallback
    }

    /// List registered selections in canonical order.
    pub fn list(&self) -> Vec<ProviderKind> {
        ProviderKind::ALL
            .into_iter()
            .filter(|k| self.providers.contains_key(k))
            .collect()
    }

    /// Check the active provider can be contacted.
    pub fn ensure_ready(&self) -> Result<(), DispatchError> {
        let ready = match self.active() {
            Some(provider) => provider.has_credential(),
            None => !self.active.is_network(),
        };
        if ready {
            return Ok(());
        }
        Err(DispatchError::MissingCredential {
            provider: self.active.as_str().to_string(),
            variable: self
                .active
                .credential_var()
                .unwrap_or("API key")
                .to_string(),
        })
    }

    /// Produce a reply for an assembled conversation.
    ///
    /// Errors only on misconfiguration; upstream failures degrade to the
    /// fallback responder.
    pub async fn dispatch(&self, messages: Vec<Message>) -> Result<RawReply, DispatchError> {
        self.ensure_ready()?;

        let Some(provider) = self.active() else {
            let (message, history) = conversation_parts(&messages);
            return Ok(RawReply {
                text: self.fallback.respond(message, &history),
                provider: self.active,
                degraded: false,
            });
        };

        debug!(provider = provider.name(), turns = messages.len(), "Dispatching");
        let request = ProviderRequest::new(messages);

        match provider.complete(request.clone()).await {
            Ok(response) => Ok(RawReply {
                text: response.content,
                provider: self.active,
                degraded: false,
            }),
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Provider failed, using fallback");
                let (message, history) = conversation_parts(&request.messages);
                let mut text = self.fallback.respond(message, &history);
                text.push_str(DEGRADED_NOTE);
                Ok(RawReply {
                    text,
                    provider: self.active,
                    degraded: true,
                })
            }
        }
    }
}

/// Build a router with every selection registered from configuration.
pub fn build_from_config(config: &AppConfig, fallback: Arc<FallbackResponder>) -> ProviderRouter {
    let mut router = ProviderRouter::new(config.provider, fallback.clone());
    let timeout = Duration::from_secs(config.providers.request_timeout_secs);

    for kind in ProviderKind::ALL {
        let provider: Arc<dyn Provider> = match (kind, config.providers.get(kind)) {
            (ProviderKind::Groq | ProviderKind::OpenAi, Some(settings)) => {
                let base_url = settings
                    .api_url
                    .clone()
                    .or_else(|| kind.default_base_url().map(String::from))
                    .unwrap_or_default();
                let mut p = OpenAiCompatProvider::new(
                    kind.as_str().to_ascii_lowercase(),
                    base_url,
                    settings.api_key.clone(),
                )
                .with_temperature(settings.temperature.unwrap_or(kind.default_temperature()))
                .with_max_tokens(settings.max_tokens_or_default())
                .with_timeout(timeout);
                if let Some(model) = settings.model.clone().or_else(|| kind.default_model().map(String::from)) {
                    p = p.with_model(model);
                }
                Arc::new(p)
            }
            _ => Arc::new(OfflineProvider::new(
                kind.as_str().to_ascii_lowercase(),
                fallback.clone(),
            )),
        };
        router.register(kind, provider);
    }

    info!(
        provider = %config.provider,
        credential = router.ensure_ready().is_ok(),
        "Provider selected"
    );
    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;
    use crate::templates;
    use async_trait::async_trait;
    use ecochat_core::error::ProviderError;
    use ecochat_core::provider::ProviderResponse;
    use std::sync::Mutex;

    fn responder() -> Arc<FallbackResponder> {
        Arc::new(FallbackResponder::new(Arc::new(SequenceRandom::new(vec![0]))))
    }

    fn conversation(text: &str) -> Vec<Message> {
        vec![Message::system("persona"), Message::user(text)]
    }

    /// A network-style provider that always fails.
    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }
        fn requires_credential(&self) -> bool {
            true
        }
        fn has_credential(&self) -> bool {
            true
        }
        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    /// Records what it was sent and echoes a fixed reply.
    struct RecordingProvider {
        seen: Mutex<Vec<ProviderRequest>>,
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }
        fn requires_credential(&self) -> bool {
            true
        }
        fn has_credential(&self) -> bool {
            true
        }
        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            self.seen.lock().unwrap().push(request);
            Ok(ProviderResponse {
                content: "**Great** question!".into(),
                model: "test".into(),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn successful_call_is_not_degraded() {
        let recording = Arc::new(RecordingProvider {
            seen: Mutex::new(Vec::new()),
        });
        let mut router = ProviderRouter::new(ProviderKind::Groq, responder());
        router.register(ProviderKind::Groq, recording.clone());

        let reply = router.dispatch(conversation("hi")).await.unwrap();
        assert_eq!(reply.text, "**Great** question!");
        assert_eq!(reply.provider, ProviderKind::Groq);
        assert!(!reply.degraded);
        assert_eq!(recording.seen.lock().unwrap()[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn failure_degrades_to_fallback_with_note() {
        let mut router = ProviderRouter::new(ProviderKind::OpenAi, responder());
        router.register(ProviderKind::OpenAi, Arc::new(FailingProvider));

        let reply = router
            .dispatch(conversation("Tell me about solar energy"))
            .await
            .unwrap();
        assert!(reply.degraded);
        assert_eq!(reply.text, format!("{}{DEGRADED_NOTE}", templates::SOLAR));
    }

    #[tokio::test]
    async fn missing_credential_is_reported_before_dispatch() {
        let router = build_from_config(&AppConfig::default(), responder());
        assert_eq!(router.active_kind(), ProviderKind::OpenAi);

        let err = router.dispatch(conversation("hi")).await.unwrap_err();
        assert_eq!(err.to_string(), "OPENAI_API_KEY not configured");
    }

    #[tokio::test]
    async fn mock_and_huggingface_answer_offline() {
        for kind in [ProviderKind::Mock, ProviderKind::HuggingFace] {
            let config = AppConfig {
                provider: kind,
                ..AppConfig::default()
            };
            let router = build_from_config(&config, responder());
            router.ensure_ready().unwrap();

            let reply = router
                .dispatch(conversation("How can I save water?"))
                .await
                .unwrap();
            assert_eq!(reply.text, templates::WATER);
            assert_eq!(reply.provider, kind);
            assert!(!reply.degraded);
        }
    }

    #[test]
    fn build_registers_every_selection() {
        let mut config = AppConfig::default();
        config.providers.groq.api_key = Some("gsk".into());
        config.provider = ProviderKind::Groq;

        let router = build_from_config(&config, responder());
        assert_eq!(router.list(), ProviderKind::ALL.to_vec());
        assert!(router.ensure_ready().is_ok());
        assert_eq!(router.get(ProviderKind::Groq).unwrap().name(), "groq");
        assert_eq!(router.get(ProviderKind::Mock).unwrap().name(), "mock");
        assert!(!router.get(ProviderKind::OpenAi).unwrap().has_credential());
    }

    #[tokio::test]
    async fn unregistered_offline_selection_uses_fallback() {
        let router = ProviderRouter::new(ProviderKind::Mock, responder());
        let reply = router.dispatch(conversation("plant trees")).await.unwrap();
        assert_eq!(reply.text, templates::TREES);

        let router = ProviderRouter::new(ProviderKind::Groq, responder());
        assert!(router.ensure_ready().is_err());
    }
}
