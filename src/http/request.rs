//! Inbound request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Check the POST body is JSON before anything goes upstream
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The body is judged on content, not on the Content-Type header
//! - Accepted bodies are forwarded byte-for-byte, never re-serialized

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, Request};
use serde::de::IgnoredAny;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Body forwarded when the client posted nothing.
const EMPTY_OBJECT: &[u8] = b"{}";

/// Issues UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Read the request ID set by the request-id layer, if any.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Accept `body` if it is a JSON document and return the bytes to forward.
///
/// An empty (or all-whitespace) body becomes `{}`.
pub fn json_body(body: Bytes) -> Result<Bytes, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Bytes::from_static(EMPTY_OBJECT));
    }
    serde_json::from_slice::<IgnoredAny>(&body)?;
    Ok(body)
}
