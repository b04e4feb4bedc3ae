//! Migration proxy binary.
//!
//! Sits in front of a legacy backend while its replacement single-page
//! application is built out.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               MIGRATION PROXY                │
//!                    │                                              │
//!   Client Request   │  ┌────────┐     ┌────────────────────────┐   │
//!   ─────────────────┼─▶│  http  │────▶│    proxy dispatcher    │   │
//!                    │  │ server │     │ bypass / spa / forward │   │
//!                    │  └────────┘     └────┬──────┬───────┬────┘   │
//!                    │                      │      │       │        │
//!                    │          404 ◀──────┘       ▼       ▼        │
//!                    │                        ┌────────┐ ┌────────┐ │      Legacy
//!   Client Response  │                        │  spa   │ │ client │◀┼────▶ Backend
//!   ◀────────────────┼────────────────────────│ shell  │ │redirect│ │
//!                    │                        └────────┘ │rewrite │ │
//!                    │                                   └────────┘ │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chrysalis::config;
use chrysalis::http::HttpServer;
use chrysalis::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "chrysalis")]
#[command(about = "Migration proxy fronting a legacy backend", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "chrysalis.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The process must not begin serving traffic on a bad configuration.
    let config = match config::load_config(&args.config) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("chrysalis: {error}");
            std::process::exit(1);
        }
    };

    // Initialize tracing subscriber; RUST_LOG wins over the config level.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "chrysalis={},tower_http=warn",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(config = %args.config.display(), "chrysalis v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        destination = %config.upstream.destination,
        backend = %config.upstream.backend,
        excluded_paths = config.upstream.local_apis.len(),
        spa_enabled = config.spa.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            chrysalis::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
