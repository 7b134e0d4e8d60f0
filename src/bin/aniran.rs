//! aniran — anime gateway server.
//!
//! Serves the enrichment endpoint and the upstream proxies over HTTP.

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aniran::server::config::{Config, Secrets};
use aniran::server::{AppState, build_router};

/// Aniran server: anime metadata gateway with Persian translations.
#[derive(Parser)]
#[command(name = "aniran")]
#[command(version = aniran::PKG_VERSION)]
#[command(about = "Aniran anime gateway server")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Address to bind to, overriding the configuration file.
    #[arg(short, long, env = "ANIRAN_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let address = args.address.unwrap_or_else(|| config.server.address.clone());
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| aniran::AniranError::Configuration(format!("Invalid address: {e}")))?;

    let state = AppState::from_config(&config, &secrets);
    let app = build_router(state);

    info!(version = aniran::PKG_VERSION, %addr, "aniran starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
