//! LP hedger: values the configured positions every interval and keeps
//! their exposure hedged on Binance perpetual futures.
//!
//! Usage: lph-hedger [--config config.toml] [--debug]
//!
//! Without Binance credentials the hedger runs in monitor-only mode.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use clients_binance::BinancePerpsClient;
use clients_subgraph::SubgraphClient;
use lph::{JsonFileSnapshotStore, LPHStrategy};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "lph-hedger")]
#[command(about = "Delta-hedges concentrated liquidity positions with perpetual futures")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_file(&cli.config)?;
    init_logging(cli.debug || config.debug);

    let client = Arc::new(reqwest::Client::builder().build()?);
    let source = SubgraphClient::new(Arc::clone(&client), config.subgraph_url.clone());
    let venue = config
        .binance_client_config()
        .map(|perps_config| BinancePerpsClient::new(Arc::clone(&client), perps_config));
    if venue.is_none() {
        warn!("binance credentials missing, running in monitor-only mode");
    }
    let store = JsonFileSnapshotStore::new(config.snapshot_path.clone());

    info!(
        config = %cli.config.display(),
        positions = ?config.positions,
        snapshot_path = %config.snapshot_path.display(),
        "starting lph-hedger"
    );
    let mut strategy = LPHStrategy::new(config.strategy_config(), source, venue, store);
    strategy.run(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
