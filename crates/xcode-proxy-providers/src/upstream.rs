//! Shared HTTP plumbing for upstream calls.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use crate::traits::{ByteStream, ProviderResult};
use crate::ProviderError;

/// Bound on a non-streaming call, and on obtaining the response head of a
/// streaming call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A fixed upstream endpoint with its auth headers.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint {
    client: Client,
    url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl Endpoint {
    pub fn new(client: Client, url: String) -> Self {
        Self {
            client,
            url,
            headers: HeaderMap::new(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Add a header. Secret values are marked sensitive so they stay out of
    /// debug output.
    pub fn with_header(
        mut self,
        name: &'static str,
        value: &str,
        sensitive: bool,
    ) -> ProviderResult<Self> {
        let mut value = HeaderValue::from_str(value).map_err(|_| {
            ProviderError::Configuration(format!("invalid value for header {}", name))
        })?;
        value.set_sensitive(sensitive);
        self.headers.insert(HeaderName::from_static(name), value);
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn exchange(&self, body: &Value) -> ProviderResult<Value> {
        let response = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .json(body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(status = status.as_u16(), error = %e, "failed to read upstream error body");
                    String::new()
                }
            };
            tracing::error!(status = status.as_u16(), body = %text, url = %self.url, "upstream error");
            return Err(ProviderError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    pub async fn open_stream(&self, body: &Value) -> ProviderResult<ByteStream> {
        let request = self
            .client
            .post(&self.url)
            .headers(self.headers.clone())
            .json(body)
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ProviderError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        if !response.status().is_success() {
            return Ok(Box::pin(error_payload(response, self.url.clone())));
        }

        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(ProviderError::from)),
        ))
    }
}

/// Single-chunk stream carrying the upstream's error payload verbatim.
fn error_payload(
    response: Response,
    url: String,
) -> impl Stream<Item = ProviderResult<Bytes>> + Send {
    let status = response.status().as_u16();

    async_stream::try_stream! {
        let payload = response.bytes().await?;
        tracing::error!(
            status,
            body = %String::from_utf8_lossy(&payload),
            url = %url,
            "upstream stream error"
        );
        yield payload;
    }
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
