use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sheet_relay::config::{resolve_config, Overrides};
use sheet_relay::lifecycle::{signals, Shutdown};
use sheet_relay::observability::init_logging;
use sheet_relay::{Error, RelayServer};

/// Relay JSON POSTs to a fixed upstream with permissive CORS.
#[derive(Parser, Debug)]
#[command(name = "sheet-relay", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "SHEET_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on (e.g. 0.0.0.0:3000).
    #[arg(long, env = "SHEET_RELAY_BIND_ADDRESS")]
    bind_address: Option<String>,

    /// Port to listen on, keeping the host of the bind address.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Upstream URL the request bodies are POSTed to.
    #[arg(long, env = "SHEET_RELAY_UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Give up on the upstream after this many seconds.
    #[arg(long)]
    upstream_timeout_secs: Option<u64>,

    /// Answer with the upstream's status code instead of always 200.
    #[arg(long)]
    relay_upstream_status: bool,
}

impl From<Cli> for Overrides {
    fn from(cli: Cli) -> Self {
        Overrides {
            bind_address: cli.bind_address,
            port: cli.port,
            upstream_url: cli.upstream_url,
            upstream_timeout_secs: cli.upstream_timeout_secs,
            relay_status: cli.relay_upstream_status,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cli = Cli::parse();
    let config_path = cli.config.take();

    let config = resolve_config(config_path.as_deref(), cli.into()).map_err(Error::from)?;

    init_logging(&config.observability.log_level)?;

    tracing::info!("sheet-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        route = %config.route.path,
        upstream_timeout_secs = ?config.upstream.timeout_secs,
        relay_status = config.upstream.relay_status,
        "Configuration loaded"
    );

    let bind_address = config.listener.bind_address.clone();
    let server = RelayServer::new(config).map_err(Error::from)?;

    // Bind TCP listener
    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| Error::Bind {
            address: bind_address.clone(),
            source,
        })?;

    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
