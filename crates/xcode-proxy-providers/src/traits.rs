//! Chat provider trait

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use serde_json::Value;
use std::pin::Pin;

use crate::{ProviderError, WireProtocol};

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Raw upstream bytes, chunked exactly as the transport delivered them.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send>>;

/// An upstream chat-completion integration.
///
/// Both operations receive the caller's request body as-is; credentials and
/// the base URL are fixed when the provider is constructed.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// One request/response exchange. A non-2xx upstream status is returned
    /// as [`ProviderError::Upstream`].
    async fn chat_completion(&self, body: Value) -> ProviderResult<Value>;

    /// Open a streaming exchange with `stream` forced on.
    ///
    /// A non-2xx upstream status does not fail: the returned stream yields the
    /// raw error payload as its only chunk. Errors are returned only when no
    /// response head could be obtained.
    async fn stream_chat_completion(&self, body: Value) -> ProviderResult<ByteStream>;

    /// Wire protocol spoken upstream. Diagnostics only: routing never
    /// branches on it.
    fn protocol(&self) -> WireProtocol;

    /// Configured base URL. Diagnostics only.
    fn base_url(&self) -> &str;
}
