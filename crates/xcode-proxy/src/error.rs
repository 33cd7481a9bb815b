//! HTTP error contract.
//!
//! Every error response is JSON `{"detail": "<message>"}` with the matching
//! status code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use xcode_proxy_providers::ProviderError;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("{0}")]
    BadRequest(String),

    #[error("No models configured")]
    NoModelsConfigured,

    #[error("Failed to initialize provider for {model}")]
    ProviderInitFailed { model: String },

    #[error("Upstream Error: {body}")]
    Upstream { status: u16, body: String },

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl From<ProviderError> for ProxyError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Upstream { status, body } => {
                tracing::error!(status, body = %body, "upstream provider error");
                Self::Upstream { status, body }
            }
            other => {
                tracing::error!(error = %other, "internal proxy error");
                Self::Internal(other.to_string())
            }
        }
    }
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoModelsConfigured | Self::ProviderInitFailed { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}
