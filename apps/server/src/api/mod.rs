//! API layer - routes, handlers, and middleware

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;

use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        .route(
            "/doctors",
            get(handlers::list_doctors).post(handlers::create_doctor),
        )
        .route(
            "/doctors/:id",
            get(handlers::get_doctor)
                .patch(handlers::edit_doctor)
                .delete(handlers::delete_doctor),
        )
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/patients/:id",
            get(handlers::get_patient)
                .patch(handlers::edit_patient)
                .delete(handlers::delete_patient),
        )
        .with_state(state)
        // Applied in reverse order
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::compression())
        .layer(middleware::cors(&cors_origins))
        .layer(DefaultBodyLimit::max(max_body_size))
}
