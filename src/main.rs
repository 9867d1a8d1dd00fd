//! Hub edge server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ edge router ──┬─▶ 307 /?returnUrl=...
//!                                                          ├─▶ 307 /coming-soon?app=...
//!                                                          └─▶ forward ─┬─▶ /api/export/* (CSV)
//!                                                                       └─▶ upstream origin
//!     Client Response
//!     ◀────────────── + security / proxy / CORS / CSP headers
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use hub_edge::config::{load_config, HubConfig};
use hub_edge::observability::{logging, metrics};
use hub_edge::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "hub-edge", version, about = "Edge router for the hub sites")]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "HUB_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => HubConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("hub-edge v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        environment = %config.environment,
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
