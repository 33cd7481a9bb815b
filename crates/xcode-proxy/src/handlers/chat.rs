//! `POST /v1/chat/completions`: model selection and upstream relay.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde_json::Value;
use xcode_proxy_config::ModelSelection;

use crate::error::ProxyError;
use crate::relay::RelayStream;
use crate::server::AppState;

pub async fn chat_completions(
    state: web::Data<AppState>,
    payload: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    let body: Value = serde_json::from_slice(&payload)
        .map_err(|_| ProxyError::BadRequest("Invalid JSON body".to_string()))?;
    if !body.is_object() {
        return Err(ProxyError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    let model_id = select_model(&state, &body)?;

    let provider = state.providers.resolve(&model_id).ok_or_else(|| {
        tracing::error!(model = %model_id, "failed to initialize provider");
        ProxyError::ProviderInitFailed {
            model: model_id.clone(),
        }
    })?;

    let stream = body.get("stream").is_some_and(is_truthy);
    let provider_type = state
        .settings
        .model(&model_id)
        .map(|c| c.provider_type.as_str())
        .unwrap_or("unknown");
    tracing::info!(
        model = %model_id,
        provider_type,
        protocol = %provider.protocol(),
        stream,
        "routing request"
    );

    if stream {
        let upstream = provider.stream_chat_completion(body).await?;
        return Ok(HttpResponse::Ok()
            .content_type("text/event-stream")
            .insert_header((header::CACHE_CONTROL, "no-cache"))
            .streaming(RelayStream::new(upstream, model_id)));
    }

    let response = provider.chat_completion(body).await?;
    Ok(HttpResponse::Ok().json(response))
}

fn select_model(state: &AppState, body: &Value) -> Result<String, ProxyError> {
    let requested = body.get("model").and_then(Value::as_str);

    let Some(selection) = state.settings.select_model(requested) else {
        tracing::error!("No models configured");
        return Err(ProxyError::NoModelsConfigured);
    };

    match selection {
        ModelSelection::Requested(_) => {}
        ModelSelection::Default(id) => {
            tracing::info!(requested = ?requested, model = id, "model not found, using default");
        }
        ModelSelection::FirstAvailable(id) => {
            tracing::info!(requested = ?requested, model = id, "model not found, using first available");
        }
    }

    Ok(selection.model_id().to_string())
}

/// Loose truthiness for the `stream` flag: `1`, `"true"` and `true` all
/// select streaming; `0`, `""`, `false` and `null` do not.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
