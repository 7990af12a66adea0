//! Dashboards security service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ tower layers (request id, trace, limits)
//!                          │
//!                          ▼
//!                      session middleware ──── cookie → session store
//!                          │
//!                          ▼
//!        ┌─────────────────┼──────────────────┬──────────────┐
//!        ▼                 ▼                  ▼              ▼
//!   /api/authtype     /auth/login        /auth/logout   /api/v1/auth/authinfo
//!                          │
//!                          ▼
//!                authenticator (search engine authinfo)
//!                          │
//!                          ▼
//!                interceptor: header filter → session.additional_auth_headers
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use dashboards_security::config::{load_config, DashboardsConfig};
use dashboards_security::lifecycle::{build_server, signals, Shutdown};
use dashboards_security::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "dashboards-security")]
#[command(about = "Session authentication service for the search dashboard", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DashboardsConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("dashboards-security v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        // Validation already checked the address.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = build_server(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(&shutdown);

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
