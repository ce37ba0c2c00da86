//! Outbound client that performs the single upstream POST.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, StatusCode};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::UpstreamConfig;
use crate::forward::error::ForwardError;

/// Content type a fetch client attaches to a string body.
pub const UPSTREAM_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// What the upstream answered.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Forwards request bodies to the configured upstream.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    upstream: Url,
}

impl Forwarder {
    /// Build a forwarder for the given upstream settings.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ForwardError> {
        let upstream = Url::parse(&config.url).map_err(|source| ForwardError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?;

        // Proxy env vars are ignored; the relay always talks to the upstream directly.
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .no_proxy();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(ForwardError::Client)?;

        Ok(Self { client, upstream })
    }

    /// The URL every body is POSTed to.
    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    /// POST `body` to the upstream and collect its full response.
    ///
    /// The upstream status is reported, never judged: a 5xx is still `Ok`.
    pub async fn forward(&self, body: Bytes) -> Result<UpstreamReply, ForwardError> {
        tracing::debug!(
            upstream = %self.upstream,
            body_len = body.len(),
            "Forwarding body upstream"
        );

        let response = self
            .client
            .post(self.upstream.clone())
            .header(header::CONTENT_TYPE, UPSTREAM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(ForwardError::Request)?;

        let status = response.status();
        if status.is_server_error() {
            tracing::warn!(
                upstream_uri = %response.url(),
                status_code = %status,
                "Upstream returned a server error status code"
            );
        } else if status.is_client_error() {
            tracing::debug!(
                upstream_uri = %response.url(),
                status_code = %status,
                "Upstream returned a client error status code"
            );
        }

        let body = response.bytes().await.map_err(ForwardError::Body)?;
        Ok(UpstreamReply { status, body })
    }
}
