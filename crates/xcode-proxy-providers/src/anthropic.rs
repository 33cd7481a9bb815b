//! Anthropic Messages API passthrough (`POST {base}/messages`).
//!
//! The request body is forwarded untouched; callers selecting this protocol
//! must already speak the Messages wire format.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;

use crate::traits::{ByteStream, ProviderResult};
use crate::upstream::{join_url, Endpoint};
use crate::{force_stream, ChatProvider, WireProtocol};

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicMessagesProvider {
    endpoint: Endpoint,
    base_url: String,
}

impl AnthropicMessagesProvider {
    pub fn new(
        client: Client,
        api_key: SecretString,
        base_url: impl Into<String>,
    ) -> ProviderResult<Self> {
        let base_url = base_url.into();
        let endpoint = Endpoint::new(client, join_url(&base_url, "messages"))
            .with_header("x-api-key", api_key.expose_secret(), true)?
            .with_header("anthropic-version", ANTHROPIC_VERSION, false)?;

        Ok(Self { endpoint, base_url })
    }

    /// Override the default 60s bound on a call (or on a stream's response head).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint = self.endpoint.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl ChatProvider for AnthropicMessagesProvider {
    async fn chat_completion(&self, body: Value) -> ProviderResult<Value> {
        self.endpoint.exchange(&body).await
    }

    async fn stream_chat_completion(&self, mut body: Value) -> ProviderResult<ByteStream> {
        force_stream(&mut body);
        tracing::debug!(url = %self.endpoint.url(), "opening upstream stream");
        self.endpoint.open_stream(&body).await
    }

    fn protocol(&self) -> WireProtocol {
        WireProtocol::AnthropicMessages
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
