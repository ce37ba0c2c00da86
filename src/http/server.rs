//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay route (POST + OPTIONS)
//! - Wire up middleware (tracing, body limit, request ID, CORS origin)
//! - Bind server to listener and stop on the shutdown signal
//! - Hand POST bodies to the Forwarder and relay the reply

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, Request},
    response::Response,
    routing::post,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::forward::{ForwardError, Forwarder};
use crate::http::request::{self, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::{self, RelayError, ALLOW_ORIGIN};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub forwarder: Forwarder,
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: Arc<RelayConfig>,
}

impl RelayServer {
    /// Create a new relay server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ForwardError> {
        let forwarder = Forwarder::new(&config.upstream)?;
        let config = Arc::new(config);

        let state = AppState {
            config: config.clone(),
            forwarder,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route(
                &config.route.path,
                post(relay_handler).options(preflight_handler),
            )
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            // Covers the framework's own 404/405/413 answers as well.
            .layer(SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static(ALLOW_ORIGIN),
            ))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request::request_id(req.headers()),
                    )
                }),
            )
            .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    }

    /// The fully layered router, for serving on a custom transport or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            route = %self.config.route.path,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// POST handler: check the body, forward it, relay the answer.
async fn relay_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, RelayError> {
    let start_time = Instant::now();
    let request_id = request::request_id(&headers);

    let body = request::json_body(body).map_err(|e| {
        tracing::debug!(request_id = %request_id, error = %e, "Rejecting non-JSON body");
        RelayError::from(e)
    })?;

    let reply = match state.forwarder.forward(body).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                timeout = e.is_timeout(),
                error = %e.detail(),
                "Upstream request failed"
            );
            return Err(e.into());
        }
    };

    tracing::info!(
        request_id = %request_id,
        upstream_status = %reply.status,
        body_len = reply.body.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Relayed upstream response"
    );

    Ok(response::relay(reply, state.config.upstream.relay_status))
}

/// OPTIONS handler: CORS pre-flight, never touches the upstream.
async fn preflight_handler() -> Response {
    response::preflight()
}
