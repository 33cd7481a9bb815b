//! Actix Web HTTP server.
//!
//! Exposes an OpenAI-compatible surface:
//! - `POST /v1/chat/completions`
//! - `GET /v1/models`
//! - `GET /health`

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use xcode_proxy_config::{ServerConfig, Settings};
use xcode_proxy_providers::{ProviderFactory, ProviderResolver};

use crate::handlers::{chat, health, models};

/// Largest accepted request body. Chat requests carry whole conversations.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub providers: Arc<dyn ProviderResolver>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, client: reqwest::Client) -> Self {
        let providers = Arc::new(ProviderFactory::new(settings.clone(), client));
        Self {
            settings,
            providers,
        }
    }

    pub fn with_resolver(settings: Arc<Settings>, providers: Arc<dyn ProviderResolver>) -> Self {
        Self {
            settings,
            providers,
        }
    }
}

/// Register routes and extractor limits.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/v1")
                .route("/models", web::get().to(models::list_models))
                .route("/chat/completions", web::post().to(chat::chat_completions)),
        );
}

pub async fn serve(settings: Settings, bind: ServerConfig) -> Result<()> {
    let addr = format!("{}:{}", bind.host, bind.port);
    let settings = Arc::new(settings);

    let client = ProviderFactory::default_client().context("failed to build HTTP client")?;
    let state = web::Data::new(AppState::new(settings.clone(), client));

    info!(
        addr = %addr,
        models = settings.model_count(),
        default_model = ?settings.default_model,
        "xcode-proxy listening"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(configure)
    })
    .bind(&addr)
    .with_context(|| format!("failed to bind {}", addr))?
    .run()
    .await
    .context("server error")?;

    Ok(())
}
