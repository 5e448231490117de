//! Request span and request id middleware

use axum::{
    extract::{MatchedPath, Request},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use opentelemetry::trace::TraceContextExt;
use std::time::Instant;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::request_context::RequestContext;

/// Opens the root span of every request.
///
/// The request id is the client's `x-request-id` when usable, otherwise a fresh
/// UUID. It is stored as a [`RequestContext`] extension, recorded on the span and
/// returned in `x-request-id`. When the span belongs to a sampled OpenTelemetry
/// trace its id is returned in `x-trace-id`.
#[tracing::instrument(
    name = "http_request",
    skip_all,
    fields(
        http.method = %req.method(),
        http.route = tracing::field::Empty,
        otel.kind = "server",
        http.response.status_code = tracing::field::Empty,
        request_id = tracing::field::Empty,
    )
)]
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let span = Span::current();
    let start = Instant::now();

    let context = RequestContext::from_client_id(
        req.headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
    );
    span.record("request_id", context.request_id.as_str());

    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    span.record("http.route", route.as_str());

    let method = req.method().clone();
    let request_id = context.request_id.clone();
    req.extensions_mut().insert(context);

    let mut response = next.run(req).await;

    let status = response.status();
    span.record("http.response.status_code", status.as_u16());

    tracing::info!(
        method = %method,
        route = %route,
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "Request completed"
    );

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert("x-request-id", value);
    }

    let otel_context = span.context();
    let otel_span = otel_context.span();
    let span_context = otel_span.span_context();
    if span_context.is_valid() {
        if let Ok(value) = HeaderValue::from_str(&span_context.trace_id().to_string()) {
            headers.insert("x-trace-id", value);
        }
    }

    response
}
