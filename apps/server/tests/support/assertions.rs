use anyhow::Context as _;
use axum::{
    body::Bytes,
    http::{header, HeaderMap, StatusCode},
};
use serde_json::Value;
use uuid::Uuid;

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "{context}: expected status {expected}, got {actual}"
    );
}

pub fn json_body(body: &Bytes) -> anyhow::Result<Value> {
    serde_json::from_slice(body).context("response body is JSON")
}

/// Id from a `Location: /{collection}/{id}` header.
pub fn location_id(headers: &HeaderMap) -> anyhow::Result<Uuid> {
    let location = headers
        .get(header::LOCATION)
        .context("Location header present")?
        .to_str()
        .context("Location header is ASCII")?;
    let id = location
        .rsplit('/')
        .next()
        .context("Location has an id segment")?;
    Uuid::parse_str(id).context("Location id is a UUID")
}

/// Page metadata of a list response, as `(totalCount, totalPages, hasPrevious, hasNext)`.
pub fn page_meta(page: &Value) -> (u64, u64, bool, bool) {
    (
        page["totalCount"].as_u64().unwrap_or(u64::MAX),
        page["totalPages"].as_u64().unwrap_or(u64::MAX),
        page["hasPreviousPage"].as_bool().unwrap_or(false),
        page["hasNextPage"].as_bool().unwrap_or(false),
    )
}

/// Values of `field` across the items of a list response.
pub fn column<'a>(page: &'a Value, items: &str, field: &str) -> Vec<&'a Value> {
    page[items]
        .as_array()
        .map(|items| items.iter().map(|item| &item[field]).collect())
        .unwrap_or_default()
}

/// Assert an error response carries the standard JSON error body.
pub fn assert_error_body(body: &Bytes, status: StatusCode) -> anyhow::Result<Value> {
    let value = json_body(body)?;
    assert_eq!(value["status"], status.as_u16());
    assert!(value["message"].is_string(), "error message present");
    Ok(value)
}
