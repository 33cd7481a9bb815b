//! Streaming relay.
//!
//! Forwards upstream chunks to the caller one-for-one. The relay owns the
//! upstream stream, so when actix drops the response body (caller went away)
//! the upstream connection is released with it.

use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use xcode_proxy_providers::ByteStream;

pub struct RelayStream {
    upstream: ByteStream,
    model_id: String,
    chunks: usize,
    finished: bool,
}

impl RelayStream {
    pub fn new(upstream: ByteStream, model_id: impl Into<String>) -> Self {
        Self {
            upstream,
            model_id: model_id.into(),
            chunks: 0,
            finished: false,
        }
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, actix_web::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match this.upstream.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.chunks += 1;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.finished = true;
                tracing::error!(model = %this.model_id, chunks = this.chunks, error = %e, "upstream stream failed");
                Poll::Ready(Some(Err(actix_web::error::ErrorInternalServerError(
                    e.to_string(),
                ))))
            }
            Poll::Ready(None) => {
                if !this.finished {
                    this.finished = true;
                    tracing::debug!(model = %this.model_id, chunks = this.chunks, "stream relay complete");
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayStream {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(
                model = %self.model_id,
                chunks = self.chunks,
                "client disconnected, releasing upstream stream"
            );
        }
    }
}
