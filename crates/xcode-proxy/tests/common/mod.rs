#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use serde_json::Value;

use xcode_proxy_config::{LocalSettings, ModelConfig, Settings};
use xcode_proxy_providers::{
    ByteStream, ChatProvider, ProviderError, ProviderResolver, ProviderResult, WireProtocol,
};

pub enum MockReply {
    Json(Value),
    Upstream { status: u16, body: String },
    Timeout,
    Chunks(Vec<&'static str>),
}

pub struct MockProvider {
    reply: MockReply,
    requests: Mutex<Vec<Value>>,
}

impl MockProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }

    fn reply_error(&self) -> ProviderError {
        match &self.reply {
            MockReply::Upstream { status, body } => ProviderError::Upstream {
                status: *status,
                body: body.clone(),
            },
            MockReply::Timeout => ProviderError::Timeout { secs: 60 },
            _ => ProviderError::InvalidResponse("unexpected call".to_string()),
        }
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn chat_completion(&self, body: Value) -> ProviderResult<Value> {
        self.requests.lock().unwrap().push(body);
        match &self.reply {
            MockReply::Json(value) => Ok(value.clone()),
            _ => Err(self.reply_error()),
        }
    }

    async fn stream_chat_completion(&self, body: Value) -> ProviderResult<ByteStream> {
        self.requests.lock().unwrap().push(body);
        match &self.reply {
            MockReply::Chunks(chunks) => {
                let items: Vec<Result<Bytes, ProviderError>> = chunks
                    .iter()
                    .copied()
                    .map(|c| Ok(Bytes::from_static(c.as_bytes())))
                    .collect();
                Ok(Box::pin(stream::iter(items)))
            }
            _ => Err(self.reply_error()),
        }
    }

    fn protocol(&self) -> WireProtocol {
        WireProtocol::OpenAiChat
    }

    fn base_url(&self) -> &str {
        "http://mock.invalid"
    }
}

/// Resolves every model id to the same mock and records the ids asked for.
pub struct MockResolver {
    pub provider: Arc<MockProvider>,
    resolved: Mutex<Vec<String>>,
}

impl MockResolver {
    pub fn new(reply: MockReply) -> Self {
        Self {
            provider: Arc::new(MockProvider::new(reply)),
            resolved: Mutex::new(Vec::new()),
        }
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }
}

impl ProviderResolver for MockResolver {
    fn resolve(&self, model_id: &str) -> Option<Arc<dyn ChatProvider>> {
        self.resolved.lock().unwrap().push(model_id.to_string());
        Some(self.provider.clone() as Arc<dyn ChatProvider>)
    }
}

/// Settings with the given `(id, type)` entries and an optional default.
pub fn settings_with(models: &[(&str, &str)], default: Option<&str>) -> Arc<Settings> {
    let mut overlay = LocalSettings::default();
    for (id, provider_type) in models {
        overlay
            .models
            .insert(id.to_string(), ModelConfig::new(*provider_type, "test-key"));
    }
    overlay.default_model = default.map(str::to_string);
    Arc::new(Settings::merge(None, overlay))
}
