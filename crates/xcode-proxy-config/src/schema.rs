use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model registry: model id -> provider configuration, in insertion order.
pub type Registry = IndexMap<String, ModelConfig>;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// One entry in the model registry.
///
/// `provider_type` is kept as the raw configured string so an unrecognized
/// value still loads; the provider factory decides what it maps to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider type: `zhipu`, `openai` or `anthropic` (case-insensitive)
    #[serde(rename = "type")]
    pub provider_type: String,

    pub api_key: String,

    /// Explicit upstream base URL; falls back to the provider type's default
    #[serde(default)]
    pub api_base: Option<String>,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// Wire protocol override (`openai` or `anthropic`)
    #[serde(default)]
    pub protocol: Option<String>,
}

impl ModelConfig {
    pub fn new(provider_type: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            api_key: api_key.into(),
            api_base: None,
            name: None,
            protocol: None,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Display name, or the given model id when none is configured.
    pub fn display_name<'a>(&'a self, model_id: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(model_id)
    }
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("provider_type", &self.provider_type)
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("name", &self.name)
            .field("protocol", &self.protocol)
            .finish()
    }
}

/// Bind address for the HTTP listener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Local overlay file (settings.toml)
// ============================================================================

/// Project-local overlay layer.
///
/// # Example
///
/// ```toml
/// [server]
/// host = "127.0.0.1"
/// port = 3000
///
/// [server.models]
/// default = "glm-4.6"
///
/// [models."glm-4.6"]
/// type = "zhipu"
/// api_key = "id.secret"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocalSettings {
    #[serde(default)]
    pub models: Registry,

    /// Legacy root-level default model
    #[serde(default)]
    pub default_model: Option<String>,

    #[serde(default)]
    pub server: Option<LocalServerSection>,
}

/// `[server]` block of the overlay; also carries the nested default selector.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub models: Option<DefaultModelSelector>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultModelSelector {
    #[serde(default)]
    pub default: Option<String>,
}

impl LocalServerSection {
    pub fn to_server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

// ============================================================================
// Base credential file (~/.claude/settings.json)
// ============================================================================

/// The `env` object of the Claude CLI settings file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudeCliEnv {
    #[serde(rename = "ANTHROPIC_API_KEY", default)]
    pub api_key: Option<String>,

    #[serde(rename = "ANTHROPIC_DEFAULT_OPUS_MODEL", default)]
    pub default_opus_model: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ClaudeCliSettingsFile {
    #[serde(default)]
    pub env: ClaudeCliEnv,
}
