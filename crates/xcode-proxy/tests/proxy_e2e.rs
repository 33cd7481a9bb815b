//! End-to-end tests: real settings, real provider factory, mocked upstream.

use std::fs;
use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use xcode_proxy::{configure, AppState};
use xcode_proxy_config::{Settings, SettingsSources};

/// Load settings from a temp `settings.toml` whose models point at `upstream`.
fn load_settings(dir: &TempDir, upstream: &str) -> Arc<Settings> {
    let local = dir.path().join("settings.toml");
    fs::write(
        &local,
        format!(
            r#"
[server.models]
default = "glm-4.6"

[models."glm-4.6"]
type = "zhipu"
api_key = "abc.def"
api_base = "{upstream}/api/paas/v4"
"#
        ),
    )
    .unwrap();

    let sources = SettingsSources::default()
        .with_claude_settings(dir.path().join("missing.json"))
        .with_local_settings(local);
    Arc::new(Settings::load(&sources))
}

fn app_state(settings: Arc<Settings>) -> web::Data<AppState> {
    web::Data::new(AppState::new(settings, reqwest::Client::new()))
}

#[actix_web::test]
async fn test_non_streaming_passthrough() {
    let upstream = MockServer::start().await;
    let completion = json!({
        "id": "chatcmpl-9",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": "hi"}, "finish_reason": "stop"}]
    });

    Mock::given(method("POST"))
        .and(path("/api/paas/v4/chat/completions"))
        .and(header_is("Authorization", "Bearer abc.def"))
        .and(body_partial_json(json!({"model": "whatever", "temperature": 0.2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion.clone()))
        .expect(1)
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(app_state(load_settings(&dir, &upstream.uri())))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({"model": "whatever", "temperature": 0.2, "messages": []}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, completion);
}

#[actix_web::test]
async fn test_non_streaming_rate_limit_is_surfaced() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/paas/v4/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(app_state(load_settings(&dir, &upstream.uri())))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({"model": "glm-4.6", "stream": false}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Upstream Error: rate limited");
}

#[actix_web::test]
async fn test_streaming_relays_upstream_bytes() {
    let upstream = MockServer::start().await;
    let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n";

    Mock::given(method("POST"))
        .and(path("/api/paas/v4/chat/completions"))
        .and(body_partial_json(json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(app_state(load_settings(&dir, &upstream.uri())))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({"model": "glm-4.6", "stream": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), sse.as_bytes());
}

#[actix_web::test]
async fn test_streaming_upstream_error_is_stream_content() {
    let upstream = MockServer::start().await;
    let payload = r#"{"error":{"code":"1113","message":"insufficient balance"}}"#;

    Mock::given(method("POST"))
        .and(path("/api/paas/v4/chat/completions"))
        .respond_with(ResponseTemplate::new(402).set_body_string(payload))
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(app_state(load_settings(&dir, &upstream.uri())))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({"model": "glm-4.6", "stream": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body.as_ref(), payload.as_bytes());
}

#[actix_web::test]
async fn test_auto_provisioned_default_routes_with_seed_credentials() {
    let upstream = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/paas/v4/chat/completions"))
        .and(header_is("Authorization", "Bearer seed.key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ok"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let claude = dir.path().join("settings.json");
    let local = dir.path().join("settings.toml");
    fs::write(
        &claude,
        r#"{"env": {"ANTHROPIC_API_KEY": "seed.key", "ANTHROPIC_DEFAULT_OPUS_MODEL": "glm-4.6"}}"#,
    )
    .unwrap();
    fs::write(
        &local,
        format!(
            r#"
[server.models]
default = "glm-4.7"

[models."glm-4.6"]
type = "zhipu"
api_key = "seed.key"
api_base = "{}/api/paas/v4"
"#,
            upstream.uri()
        ),
    )
    .unwrap();

    let settings = Arc::new(Settings::load(
        &SettingsSources::default()
            .with_claude_settings(claude)
            .with_local_settings(local),
    ));
    assert_eq!(settings.model("glm-4.7").unwrap().name.as_deref(), Some("glm-4.7"));

    let app = test::init_service(
        App::new()
            .app_data(app_state(settings))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .set_json(json!({"model": "glm-4.7"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], "ok");
}

#[actix_web::test]
async fn test_key_order_survives_both_directions() {
    let upstream = MockServer::start().await;
    let upstream_body = r#"{"id":"x","object":"chat.completion","choices":[],"created":1}"#;
    let caller_body = r#"{"model":"glm-4.6","messages":[],"temperature":0.2}"#;

    Mock::given(method("POST"))
        .and(path("/api/paas/v4/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(upstream_body),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(app_state(load_settings(&dir, &upstream.uri())))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/v1/chat/completions")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload(caller_body)
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body.as_ref(), upstream_body.as_bytes());

    let received = upstream.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body, caller_body.as_bytes());
}
