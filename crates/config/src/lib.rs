//! Configuration loading, validation, and management for EcoChat.
//!
//! Loads configuration from `~/.ecochat/config.toml` with environment
//! variable overrides. The provider selection is read once at startup and
//! never changes per request.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which upstream generation provider answers chat turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProviderKind {
    /// Groq's OpenAI-compatible endpoint
    Groq,
    /// OpenAI chat completions
    OpenAi,
    /// HuggingFace; answered offline by the fallback responder
    HuggingFace,
    /// Offline rule-based replies, no network
    Mock,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Groq,
        ProviderKind::OpenAi,
        ProviderKind::HuggingFace,
        ProviderKind::Mock,
    ];

    /// The selection string reported to clients (`api_used`, `/debug`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ",
            ProviderKind::OpenAi => "OPENAI",
            ProviderKind::HuggingFace => "HUGGINGFACE",
            ProviderKind::Mock => "MOCK",
        }
    }

    /// Environment variable holding this provider's credential.
    pub fn credential_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Groq => Some("GROQ_API_KEY"),
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::HuggingFace => Some("HF_API_KEY"),
            ProviderKind::Mock => None,
        }
    }

    /// Whether replies come from a network call.
    pub fn is_network(&self) -> bool {
        matches!(self, ProviderKind::Groq | ProviderKind::OpenAi)
    }

    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Groq => Some("https://api.groq.com/openai/v1"),
            ProviderKind::OpenAi => Some("https://api.openai.com/v1"),
            _ => None,
        }
    }

    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Groq => Some("llama-3.1-8b-instant"),
            ProviderKind::OpenAi => Some("gpt-3.5-turbo"),
            _ => None,
        }
    }

    /// Temperature tuned to each provider's persona behavior.
    pub fn default_temperature(&self) -> f32 {
        match self {
            ProviderKind::Groq => 0.8,
            _ => 0.7,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GROQ" => Ok(ProviderKind::Groq),
            "OPENAI" => Ok(ProviderKind::OpenAi),
            "HUGGINGFACE" | "HF" => Ok(ProviderKind::HuggingFace),
            "MOCK" => Ok(ProviderKind::Mock),
            other => Err(ConfigError::ValidationError(format!(
                "unknown provider '{other}' (expected GROQ, OPENAI, HUGGINGFACE or MOCK)"
            ))),
        }
    }
}

/// The root configuration structure.
///
/// Maps directly to `~/.ecochat/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Active provider selection
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,

    /// Per-provider settings and credentials
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Session retention settings
    #[serde(default)]
    pub session: SessionConfig,

    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Persona overrides
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Deployment label reported by `/debug`
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_provider() -> ProviderKind {
    ProviderKind::OpenAi
}
fn default_environment() -> String {
    "development".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("providers", &self.providers)
            .field("session", &self.session)
            .field("gateway", &self.gateway)
            .field("persona", &self.persona)
            .field("environment", &self.environment)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub groq: ProviderConfig,

    #[serde(default)]
    pub openai: ProviderConfig,

    #[serde(default)]
    pub huggingface: ProviderConfig,

    /// Fixed deadline enforced by the HTTP client on every upstream call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            groq: ProviderConfig::default(),
            openai: ProviderConfig::default(),
            huggingface: ProviderConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ProvidersConfig {
    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderConfig> {
        match kind {
            ProviderKind::Groq => Some(&self.groq),
            ProviderKind::OpenAi => Some(&self.openai),
            ProviderKind::HuggingFace => Some(&self.huggingface),
            ProviderKind::Mock => None,
        }
    }

    fn get_mut(&mut self, kind: ProviderKind) -> Option<&mut ProviderConfig> {
        match kind {
            ProviderKind::Groq => Some(&mut self.groq),
            ProviderKind::OpenAi => Some(&mut self.openai),
            ProviderKind::HuggingFace => Some(&mut self.huggingface),
            ProviderKind::Mock => None,
        }
    }
}

/// Settings for one provider. Unset fields fall back to the provider's
/// built-in defaults (see [`ProviderKind`]).
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ProviderConfig {
    /// The credential, ignoring blank values.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

/// Upper bound on generated tokens per reply.
pub const DEFAULT_MAX_TOKENS: u32 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum turns kept per session; oldest are evicted first
    #[serde(default = "default_retention_window")]
    pub retention_window: usize,
}

fn default_retention_window() -> usize {
    10
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retention_window: default_retention_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed by CORS. Empty disables the CORS layer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    3000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Replace the built-in EcoChat persona entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.ecochat/config.toml),
    /// then apply environment overrides:
    /// - `ECOCHAT_PROVIDER` / `API_CHOICE` — provider selection
    /// - `GROQ_API_KEY`, `OPENAI_API_KEY`, `HF_API_KEY` — credentials
    /// - `PORT` — gateway port
    /// - `ECOCHAT_ENV` / `NODE_ENV` — environment label
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    ///
    /// Credentials from the environment only fill gaps left by the file.
    /// An unknown provider selection falls back to `MOCK`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(choice) = lookup("ECOCHAT_PROVIDER").or_else(|| lookup("API_CHOICE")) {
            match choice.parse::<ProviderKind>() {
                Ok(kind) => self.provider = kind,
                Err(e) => {
                    tracing::warn!(choice = %choice, error = %e, "Unknown provider selection, using MOCK");
                    self.provider = ProviderKind::Mock;
                }
            }
        }

        for kind in ProviderKind::ALL {
            let (Some(var), Some(provider)) = (kind.credential_var(), self.providers.get_mut(kind))
            else {
                continue;
            };
            if provider.credential().is_none() {
                if let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) {
                    provider.api_key = Some(key);
                }
            }
        }

        if let Some(port) = lookup("PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!(port = %port, "Ignoring invalid PORT"),
            }
        }

        if let Some(env) = lookup("ECOCHAT_ENV").or_else(|| lookup("NODE_ENV")) {
            self.environment = env;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".ecochat")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for kind in ProviderKind::ALL {
            let Some(provider) = self.providers.get(kind) else {
                continue;
            };
            if let Some(t) = provider.temperature {
                if !(0.0..=2.0).contains(&t) {
                    return Err(ConfigError::ValidationError(format!(
                        "providers.{}.temperature must be between 0.0 and 2.0",
                        kind.as_str().to_ascii_lowercase()
                    )));
                }
            }
            if provider.max_tokens == Some(0) {
                return Err(ConfigError::ValidationError(format!(
                    "providers.{}.max_tokens must be > 0",
                    kind.as_str().to_ascii_lowercase()
                )));
            }
        }

        if self.session.retention_window < 2 {
            return Err(ConfigError::ValidationError(
                "session.retention_window must be at least 2".into(),
            ));
        }

        Ok(())
    }

    /// The credential configured for `kind`, if any.
    pub fn credential(&self, kind: ProviderKind) -> Option<&str> {
        self.providers.get(kind).and_then(ProviderConfig::credential)
    }

    /// Whether a credential is present for `kind` (never its value).
    pub fn has_credential(&self, kind: ProviderKind) -> bool {
        self.credential(kind).is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            providers: ProvidersConfig::default(),
            session: SessionConfig::default(),
            gateway: GatewayConfig::default(),
            persona: PersonaConfig::default(),
            environment: default_environment(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
