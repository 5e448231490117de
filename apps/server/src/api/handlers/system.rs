//! Health and API description endpoints

use axum::{response::IntoResponse, Json};
use serde_json::json;
use utoipa::OpenApi;

use crate::api::openapi::ApiDoc;

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "clinic-server"
    }))
}

/// OpenAPI 3 document of every endpoint.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
