//! `GET /v1/models`: the registry in OpenAI list format.

use actix_web::web;
use chrono::Utc;
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ModelList {
    object: &'static str,
    data: Vec<ModelEntry>,
}

#[derive(Debug, Serialize)]
pub struct ModelEntry {
    id: String,
    object: &'static str,
    created: i64,
    owned_by: String,
    name: String,
}

pub async fn list_models(state: web::Data<AppState>) -> web::Json<ModelList> {
    let created = Utc::now().timestamp();

    let data = state
        .settings
        .models
        .iter()
        .map(|(id, config)| ModelEntry {
            id: id.clone(),
            object: "model",
            created,
            owned_by: config.provider_type.clone(),
            name: config.display_name(id).to_string(),
        })
        .collect();

    web::Json(ModelList {
        object: "list",
        data,
    })
}
