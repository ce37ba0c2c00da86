//! Response construction.
//!
//! # Responsibilities
//! - Build the pre-flight answer with the CORS headers
//! - Turn an upstream reply into the client response
//! - Map relay failures to HTTP status codes with a JSON error body
//!
//! # Design Decisions
//! - Upstream status is swallowed (always 200) unless `relay_status` is set
//! - Upstream body bytes are passed through untouched
//! - Every response built here carries `Access-Control-Allow-Origin: *`

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::forward::{ForwardError, UpstreamReply};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// JSON shape of every error the relay produces itself.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Why a POST could not be relayed.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            RelayError::Forward(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let error = match &self {
            RelayError::Forward(e) => e.detail(),
            other => other.to_string(),
        };
        let mut response = (self.status(), Json(ErrorBody { error })).into_response();
        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        );
        response
    }
}

/// Answer to an OPTIONS request on the relay route.
pub fn preflight() -> Response {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
        ],
        "ok",
    )
        .into_response()
}

/// Client response for a completed upstream round trip.
pub fn relay(reply: UpstreamReply, relay_status: bool) -> Response {
    let status = if relay_status {
        reply.status
    } else {
        StatusCode::OK
    };

    (
        status,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
            (header::CONTENT_TYPE, "application/json; charset=utf-8"),
        ],
        reply.body,
    )
        .into_response()
}
