//! OpenAI-compatible chat completions (`POST {base}/chat/completions`).
//!
//! Zhipu's v4 API speaks the same protocol, so the factory registers this one
//! implementation for both provider types.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;

use crate::traits::{ByteStream, ProviderResult};
use crate::upstream::{join_url, Endpoint};
use crate::{force_stream, ChatProvider, WireProtocol};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

pub struct OpenAiCompatibleProvider {
    endpoint: Endpoint,
    base_url: String,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        client: Client,
        api_key: SecretString,
        base_url: impl Into<String>,
    ) -> ProviderResult<Self> {
        let base_url = base_url.into();
        let endpoint = Endpoint::new(client, join_url(&base_url, "chat/completions"))
            .with_header(
                "authorization",
                &format!("Bearer {}", api_key.expose_secret()),
                true,
            )?;

        Ok(Self { endpoint, base_url })
    }

    /// Override the default 60s bound on a call (or on a stream's response head).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.endpoint = self.endpoint.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    async fn chat_completion(&self, body: Value) -> ProviderResult<Value> {
        self.endpoint.exchange(&body).await
    }

    async fn stream_chat_completion(&self, mut body: Value) -> ProviderResult<ByteStream> {
        force_stream(&mut body);
        tracing::debug!(url = %self.endpoint.url(), "opening upstream stream");
        self.endpoint.open_stream(&body).await
    }

    fn protocol(&self) -> WireProtocol {
        WireProtocol::OpenAiChat
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
