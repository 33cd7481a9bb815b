use actix_web::web;
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    models_loaded: usize,
}

pub async fn health_check(state: web::Data<AppState>) -> web::Json<HealthResponse> {
    web::Json(HealthResponse {
        status: "ok",
        models_loaded: state.settings.model_count(),
    })
}
