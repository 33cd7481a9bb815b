//! xcode-proxy providers - upstream chat-completion integrations
//!
//! This crate provides:
//! - [`ChatProvider`]: the contract every upstream integration implements
//! - [`OpenAiCompatibleProvider`]: OpenAI-style `chat/completions` (also used for Zhipu)
//! - [`AnthropicMessagesProvider`]: Anthropic Messages API passthrough
//! - [`ProviderFactory`]: resolves a model id to a provider from the registry

mod anthropic;
mod error;
mod factory;
mod openai;
mod traits;
mod upstream;

pub use anthropic::{AnthropicMessagesProvider, ANTHROPIC_API_BASE, ANTHROPIC_VERSION};
pub use error::ProviderError;
pub use factory::{ProviderFactory, ProviderKind, ProviderResolver, WireProtocol};
pub use openai::{OpenAiCompatibleProvider, OPENAI_API_BASE};
pub use secrecy::SecretString;
pub use traits::{ByteStream, ChatProvider, ProviderResult};
pub use upstream::REQUEST_TIMEOUT;

/// Set `stream: true` on an object request body.
pub(crate) fn force_stream(body: &mut serde_json::Value) {
    if let Some(obj) = body.as_object_mut() {
        obj.insert("stream".to_string(), serde_json::Value::Bool(true));
    }
}
