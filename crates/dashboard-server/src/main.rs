//! Trading bot status dashboard server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dashboard_core::StatusAggregator;
use dashboard_server::alpaca::AlpacaConnector;
use dashboard_server::config::Config;
use dashboard_server::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "dashboard-server")]
#[clap(about = "Read-only status dashboard for the trading bot")]
struct Cli {
    /// Optional TOML config file (environment variables still override it)
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides PORT)
    #[clap(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins over --debug.
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => Config::load(Some(path.as_path()), |key| std::env::var(key).ok())?,
        None => Config::from_env()?,
    };
    if let Some(port) = cli.port {
        config.port = port;
    }

    info!(
        "Starting dashboard-server on {} (max_concurrent_requests = {}, ledger = {})",
        config.socket_addr_string(),
        config.max_concurrent_requests,
        config.paths.ledger_file.display()
    );

    let connector = Arc::new(AlpacaConnector::from_config(&config));
    let aggregator = Arc::new(StatusAggregator::new(config.paths.clone(), connector));

    server::run(config, aggregator).await
}
