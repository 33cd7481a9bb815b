//! Model id -> provider resolution.

use reqwest::Client;
use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use xcode_proxy_config::{ModelConfig, Settings, ZHIPU_API_BASE};

use crate::anthropic::ANTHROPIC_API_BASE;
use crate::openai::OPENAI_API_BASE;
use crate::upstream::REQUEST_TIMEOUT;
use crate::{AnthropicMessagesProvider, ChatProvider, OpenAiCompatibleProvider, ProviderResult};

/// Configured provider family (`type` in the model config).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Zhipu,
    OpenAi,
    Anthropic,
}

impl ProviderKind {
    /// Case-insensitive parse; `None` for unrecognized types.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zhipu" => Some(Self::Zhipu),
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }

    /// Every type defaults to the OpenAI-compatible protocol; `anthropic`
    /// opts into the native Messages API only through an explicit
    /// `protocol = "anthropic"`.
    pub fn default_protocol(self) -> WireProtocol {
        WireProtocol::OpenAiChat
    }

    pub fn default_base_url(self, protocol: WireProtocol) -> &'static str {
        match (self, protocol) {
            (Self::Zhipu, _) => ZHIPU_API_BASE,
            (_, WireProtocol::AnthropicMessages) => ANTHROPIC_API_BASE,
            (Self::OpenAi | Self::Anthropic, WireProtocol::OpenAiChat) => OPENAI_API_BASE,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zhipu => write!(f, "zhipu"),
            Self::OpenAi => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Upstream wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireProtocol {
    /// `POST /chat/completions` with bearer auth
    OpenAiChat,
    /// `POST /messages` with `x-api-key`
    AnthropicMessages,
}

impl WireProtocol {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAiChat),
            "anthropic" => Some(Self::AnthropicMessages),
            _ => None,
        }
    }
}

impl fmt::Display for WireProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAiChat => write!(f, "openai"),
            Self::AnthropicMessages => write!(f, "anthropic"),
        }
    }
}

/// Anything that can turn a model id into a provider.
pub trait ProviderResolver: Send + Sync {
    fn resolve(&self, model_id: &str) -> Option<Arc<dyn ChatProvider>>;
}

/// Builds a fresh provider per resolution from the model registry.
pub struct ProviderFactory {
    settings: Arc<Settings>,
    client: Client,
    timeout: Duration,
}

impl ProviderFactory {
    pub fn new(settings: Arc<Settings>, client: Client) -> Self {
        Self {
            settings,
            client,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Bound applied to every provider this factory builds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Shared HTTP client for upstream calls.
    pub fn default_client() -> ProviderResult<Client> {
        Ok(Client::builder().connect_timeout(REQUEST_TIMEOUT).build()?)
    }

    /// Build a provider for one model config.
    ///
    /// `None` for an unrecognized `type` or `protocol`, or when the
    /// credentials cannot be encoded into request headers.
    pub fn create(
        config: &ModelConfig,
        client: Client,
        timeout: Duration,
    ) -> Option<Arc<dyn ChatProvider>> {
        let Some(kind) = ProviderKind::parse(&config.provider_type) else {
            tracing::error!(provider_type = %config.provider_type, "unrecognized provider type");
            return None;
        };

        let protocol = match config.protocol.as_deref() {
            Some(value) => match WireProtocol::parse(value) {
                Some(protocol) => protocol,
                None => {
                    tracing::error!(protocol = value, "unrecognized wire protocol");
                    return None;
                }
            },
            None => kind.default_protocol(),
        };

        let base_url = config
            .api_base
            .clone()
            .unwrap_or_else(|| kind.default_base_url(protocol).to_string());
        let api_key = SecretString::from(config.api_key.clone());

        let provider: ProviderResult<Arc<dyn ChatProvider>> = match protocol {
            WireProtocol::OpenAiChat => OpenAiCompatibleProvider::new(client, api_key, base_url)
                .map(|p| Arc::new(p.with_timeout(timeout)) as Arc<dyn ChatProvider>),
            WireProtocol::AnthropicMessages => {
                AnthropicMessagesProvider::new(client, api_key, base_url)
                    .map(|p| Arc::new(p.with_timeout(timeout)) as Arc<dyn ChatProvider>)
            }
        };

        match provider {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::error!(error = %e, %kind, "failed to construct provider");
                None
            }
        }
    }
}

impl ProviderResolver for ProviderFactory {
    fn resolve(&self, model_id: &str) -> Option<Arc<dyn ChatProvider>> {
        let config = self.settings.model(model_id)?;
        Self::create(config, self.client.clone(), self.timeout)
    }
}
