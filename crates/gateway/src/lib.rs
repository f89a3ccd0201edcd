//! HTTP API gateway for EcoChat.
//!
//! Exposes the chat surface consumed by the web client: a liveness banner,
//! health and debug probes, `/send` for one chat turn and
//! `/clear-session` to reset a conversation.
//!
//! Built on Axum; handlers are thin adapters over [`ChatOrchestrator`].

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::Json,
    routing::{get, post},
};
use ecochat_agent::{ChatError, ChatOrchestrator, ChatReply, session_or_default};
use ecochat_config::{AppConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

/// Request bodies larger than this are rejected.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub config: AppConfig,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.gateway.allowed_origins);

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/debug", get(debug_handler))
        .route("/send", post(send_handler))
        .route("/clear-session", post(clear_session_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    let router = match cors {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(tower_http::trace::TraceLayer::new_for_http())
}

/// CORS for the configured origins; `None` when no origin is allowed.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600)),
    )
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let orchestrator = Arc::new(ChatOrchestrator::from_config(&config));

    for kind in ProviderKind::ALL {
        if let Some(var) = kind.credential_var() {
            info!(variable = var, present = config.has_credential(kind), "Credential check");
        }
    }

    let state = Arc::new(GatewayState {
        orchestrator,
        config,
    });
    let mode = state.config.provider;
    let app = build_router(state);

    info!(addr = %addr, mode = %mode, "EcoChat gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Wire types ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct SendRequest {
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "sessionId")]
    session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ClearRequest {
    #[serde(default, rename = "sessionId")]
    session_id: Option<String>,
}

#[derive(Serialize)]
struct ClearResponse {
    message: &'static str,
    session_id: String,
}

#[derive(Serialize)]
struct DebugResponse {
    api_choice: ProviderKind,
    active_conversations: usize,
    hf_key_present: bool,
    openai_key_present: bool,
    groq_key_present: bool,
    environment: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<String>,
}

impl ErrorResponse {
    fn bad_request(error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: error.into(),
                details: None,
                fallback: None,
            }),
        )
    }
}

// --- Handlers ---

async fn root_handler(State(state): State<SharedState>) -> String {
    format!(
        "🌱 EcoChat backend running with {} mode",
        state.orchestrator.active_provider()
    )
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn debug_handler(State(state): State<SharedState>) -> Json<DebugResponse> {
    let active_conversations = state.orchestrator.session_count().await.unwrap_or_else(|e| {
        warn!(error = %e, "Session count unavailable");
        0
    });
    let config = &state.config;

    Json(DebugResponse {
        api_choice: state.orchestrator.active_provider(),
        active_conversations,
        hf_key_present: config.has_credential(ProviderKind::HuggingFace),
        openai_key_present: config.has_credential(ProviderKind::OpenAi),
        groq_key_present: config.has_credential(ProviderKind::Groq),
        environment: config.environment.clone(),
    })
}

async fn send_handler(
    State(state): State<SharedState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected /send body");
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ErrorResponse {
                error: rejection.body_text(),
                details: None,
                fallback: None,
            }),
        )
    })?;

    let session_id = session_or_default(request.session_id.as_deref());
    let message = request.message.as_deref().unwrap_or_default();
    info!(session_id, message_len = message.len(), "Chat turn received");

    match state.orchestrator.handle_turn(session_id, message).await {
        Ok(reply) => Ok(Json(reply)),
        Err(ChatError::Validation(msg)) => Err(ErrorResponse::bad_request(msg)),
        Err(e @ ChatError::Configuration(_)) => {
            warn!(error = %e, "Provider misconfigured");
            Err(ErrorResponse::bad_request(e.to_string()))
        }
        Err(e @ ChatError::Session(_)) => {
            error!(session_id, error = %e, "Chat turn failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate reply".into(),
                    details: Some(e.to_string()),
                    fallback: Some(state.orchestrator.fallback_reply(request.message.as_deref())),
                }),
            ))
        }
    }
}

/// Always succeeds; an absent or unparsable body clears the default session.
async fn clear_session_handler(State(state): State<SharedState>, body: Bytes) -> Json<ClearResponse> {
    let request: ClearRequest = serde_json::from_slice(&body).unwrap_or_default();
    let session_id = session_or_default(request.session_id.as_deref()).to_string();

    if let Err(e) = state.orchestrator.clear_session(&session_id).await {
        error!(session_id = %session_id, error = %e, "Failed to clear session");
    }

    Json(ClearResponse {
        message: "Session cleared",
        session_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use ecochat_agent::{Persona, PromptAssembler};
    use ecochat_core::error::SessionError;
    use ecochat_core::message::Message;
    use ecochat_core::session::{Session, SessionStore};
    use ecochat_memory::InMemorySessionStore;
    use ecochat_providers::{FallbackResponder, SequenceRandom, build_from_config, templates};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct FailingStore;

    #[async_trait]
    impl SessionStore for FailingStore {
        fn name(&self) -> &str {
            "failing"
        }
        fn retention_window(&self) -> usize {
            10
        }
        async fn get_or_create(&self, _id: &str) -> Result<Session, SessionError> {
            Err(SessionError::Unavailable("store offline".into()))
        }
        async fn append(&self, _id: &str, _turn: Message) -> Result<usize, SessionError> {
            Err(SessionError::Unavailable("store offline".into()))
        }
        async fn append_exchange(
            &self,
            _id: &str,
            _user: Message,
            _reply: Message,
        ) -> Result<usize, SessionError> {
            Err(SessionError::Unavailable("store offline".into()))
        }
        async fn clear(&self, _id: &str) -> Result<(), SessionError> {
            Err(SessionError::Unavailable("store offline".into()))
        }
        async fn count(&self) -> Result<usize, SessionError> {
            Err(SessionError::Unavailable("store offline".into()))
        }
    }

    fn mock_config() -> AppConfig {
        AppConfig {
            provider: ProviderKind::Mock,
            ..AppConfig::default()
        }
    }

    fn state_with(config: AppConfig, store: Arc<dyn SessionStore>) -> SharedState {
        let fallback = Arc::new(FallbackResponder::new(Arc::new(SequenceRandom::new(vec![0]))));
        let orchestrator = ChatOrchestrator::new(
            store,
            Arc::new(build_from_config(&config, fallback)),
            PromptAssembler::new(Persona::default(), config.session.retention_window),
        );
        Arc::new(GatewayState {
            orchestrator: Arc::new(orchestrator),
            config,
        })
    }

    fn mock_state() -> SharedState {
        state_with(mock_config(), Arc::new(InMemorySessionStore::new(10)))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn root_reports_mode() {
        let app = build_router(mock_state());
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], "🌱 EcoChat backend running with MOCK mode".as_bytes());
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(mock_state());
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn send_returns_reply_and_length() {
        let app = build_router(mock_state());
        let req = post_json(
            "/send",
            json!({"message": "Tell me about solar energy", "sessionId": "s1"}),
        );

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["reply"], templates::SOLAR);
        assert_eq!(json["api_used"], "MOCK");
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["conversation_length"], 2);
        assert_eq!(json["degraded"], false);
    }

    #[tokio::test]
    async fn send_without_session_uses_default() {
        let app = build_router(mock_state());
        let response = app
            .oneshot(post_json("/send", json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["session_id"], "default");
    }

    #[tokio::test]
    async fn send_rejects_missing_or_blank_message() {
        let state = mock_state();
        for body in [json!({}), json!({"message": "   "}), json!({"sessionId": "s1"})] {
            let response = build_router(state.clone())
                .oneshot(post_json("/send", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await["error"], "⚠️ No message provided");
        }
        assert_eq!(state.orchestrator.session_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn send_rejects_unparsable_body() {
        let app = build_router(mock_state());
        let req = Request::builder()
            .method("POST")
            .uri("/send")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = build_router(mock_state());
        let huge = "a".repeat(BODY_LIMIT_BYTES + 1);
        let response = app
            .oneshot(post_json("/send", json!({"message": huge})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn missing_credential_is_400() {
        let state = state_with(AppConfig::default(), Arc::new(InMemorySessionStore::new(10)));
        let response = build_router(state)
            .oneshot(post_json("/send", json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "OPENAI_API_KEY not configured");
    }

    #[tokio::test]
    async fn store_failure_is_500_with_fallback() {
        let state = state_with(mock_config(), Arc::new(FailingStore));
        let response = build_router(state)
            .oneshot(post_json("/send", json!({"message": "How do I recycle?"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Failed to generate reply");
        assert!(json["details"].as_str().unwrap().contains("store offline"));
        assert_eq!(json["fallback"], templates::RECYCLING);
    }

    #[tokio::test]
    async fn clear_session_resets_history() {
        let state = mock_state();
        for _ in 0..2 {
            build_router(state.clone())
                .oneshot(post_json("/send", json!({"message": "hi", "sessionId": "s1"})))
                .await
                .unwrap();
        }

        let response = build_router(state.clone())
            .oneshot(post_json("/clear-session", json!({"sessionId": "s1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["message"], "Session cleared");
        assert_eq!(json["session_id"], "s1");

        let response = build_router(state)
            .oneshot(post_json("/send", json!({"message": "hi again", "sessionId": "s1"})))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["conversation_length"], 2);
    }

    #[tokio::test]
    async fn clear_session_without_body_clears_default() {
        let app = build_router(mock_state());
        let req = Request::builder()
            .method("POST")
            .uri("/clear-session")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["session_id"], "default");
    }

    #[tokio::test]
    async fn clear_session_succeeds_even_if_store_fails() {
        let state = state_with(mock_config(), Arc::new(FailingStore));
        let response = build_router(state)
            .oneshot(post_json("/clear-session", json!({"sessionId": "s1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn debug_reports_selection_and_credentials() {
        let mut config = mock_config();
        config.providers.groq.api_key = Some("gsk".into());
        config.environment = "production".into();
        let state = state_with(config, Arc::new(InMemorySessionStore::new(10)));

        build_router(state.clone())
            .oneshot(post_json("/send", json!({"message": "hi", "sessionId": "a"})))
            .await
            .unwrap();

        let req = Request::builder().uri("/debug").body(Body::empty()).unwrap();
        let json = json_body(build_router(state).oneshot(req).await.unwrap()).await;
        assert_eq!(json["api_choice"], "MOCK");
        assert_eq!(json["active_conversations"], 1);
        assert_eq!(json["groq_key_present"], true);
        assert_eq!(json["openai_key_present"], false);
        assert_eq!(json["hf_key_present"], false);
        assert_eq!(json["environment"], "production");
    }

    #[test]
    fn cors_layer_only_for_valid_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["bad\norigin".into()]).is_none());
        assert!(cors_layer(&["http://localhost:5173".into()]).is_some());
    }
}
