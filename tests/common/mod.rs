//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::routing::any;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use sheet_relay::{RelayConfig, RelayServer, Shutdown};

/// One request as seen by the mock upstream.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: Method,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// A running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    /// URL of the endpoint that answers through the programmed closure.
    pub fn url(&self) -> String {
        format!("http://{}/exec", self.addr)
    }

    /// URL that answers `302 Found` pointing at [`MockUpstream::url`].
    pub fn redirect_url(&self) -> String {
        format!("http://{}/moved", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }
}

/// Start a mock upstream that returns a fixed status and body.
#[allow(dead_code)]
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_upstream(move |_| async move { (status, body.to_string()) }).await
}

/// Start a programmable mock upstream on an ephemeral port.
///
/// Every request to `/exec` is recorded and answered with whatever `f` returns.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(Bytes) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = recorded.clone();
    let f = Arc::new(f);

    let app = Router::new()
        .route(
            "/exec",
            any(move |method: Method, headers: HeaderMap, body: Bytes| {
                let f = f.clone();
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(Recorded {
                        method,
                        content_type: headers
                            .get(header::CONTENT_TYPE)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        body: body.clone(),
                    });
                    let (status, text) = f(body).await;
                    (StatusCode::from_u16(status).unwrap(), text)
                }
            }),
        )
        .route(
            "/moved",
            any(|| async { (StatusCode::FOUND, [(header::LOCATION, "/exec")]) }),
        );

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, recorded }
}

/// A relay running on an ephemeral port.
#[allow(dead_code)]
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl RunningRelay {
    pub fn url(&self) -> String {
        format!("http://{}/sheet-proxy", self.addr)
    }
}

/// Start the relay with `upstream_url` and any tweaks from `configure`.
pub async fn start_relay(
    upstream_url: String,
    configure: impl FnOnce(&mut RelayConfig),
) -> RunningRelay {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.url = upstream_url;
    configure(&mut config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = RelayServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    RunningRelay {
        addr,
        shutdown,
        handle,
    }
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
