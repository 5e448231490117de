//! Per-request context injected by middleware.

use uuid::Uuid;

/// Longest client-supplied request id that is echoed back.
const MAX_CLIENT_ID_LEN: usize = 128;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Use the client's `x-request-id` when it is printable and reasonably short,
    /// otherwise generate one.
    pub fn from_client_id(client_id: Option<&str>) -> Self {
        let request_id = client_id
            .map(str::trim)
            .filter(|id| {
                !id.is_empty()
                    && id.len() <= MAX_CLIENT_ID_LEN
                    && id.chars().all(|c| c.is_ascii_graphic())
            })
            .map(String::from)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self { request_id }
    }
}
