//! palm-proxy
//!
//! A reverse proxy for the Google generative-language API, built with
//! Tokio and Axum.
//!
//! # Request Flow
//!
//! ```text
//! client ──▶ listener ──▶ forwarder ──▶ upstream origin
//!                             │
//!        OPTIONS ── preflight ┤
//!        GET /   ── info page ┘
//!
//! client ◀── CORS overlay ◀── upstream response (streamed)
//! ```
//!
//! Preflight requests and the root info page are answered locally;
//! everything else is rewritten against the upstream origin and relayed
//! with a filtered header set.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palm_proxy::config::{load_config, ProxyConfig};
use palm_proxy::http::HttpServer;
use palm_proxy::lifecycle::{signals, Shutdown};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palm_proxy=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(port) = args.port {
        let addr: SocketAddr = config.listener.bind_address.parse()?;
        config.listener.bind_address = SocketAddr::new(addr.ip(), port).to_string();
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.origin,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::listen(&shutdown).await;
    });

    let server = HttpServer::new(&config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
