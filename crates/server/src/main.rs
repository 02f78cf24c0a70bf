mod args;
mod error;
mod page;
mod routes;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use args::Cli;
use page::IndexPage;
use pingsweep_orchestrator::ScanCoordinator;
use pingsweep_prober::{PingProber, Platform};
use pingsweep_target_resolver::TargetResolver;
use routes::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.into_config();

    let prober = PingProber::new();
    let coordinator = ScanCoordinator::new(Arc::new(prober)).with_concurrency(config.concurrency);
    let resolver = match config.max_hosts {
        Some(limit) => TargetResolver::new().with_max_hosts(limit),
        None => TargetResolver::new(),
    };
    let page = IndexPage::new().context("Failed to load index template")?;

    info!(
        "Probing with {} on {} (concurrency={}, max hosts={})",
        coordinator.prober_name(),
        Platform::current(),
        coordinator.concurrency(),
        config
            .max_hosts
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string())
    );

    let state = AppState::new(
        coordinator,
        resolver,
        page,
        config.default_subnet.clone(),
        config.icon.clone(),
    );

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;

    info!(
        "Starting server on {} with default subnet: {}",
        config.listen, config.default_subnet
    );
    if let Some(icon) = &config.icon {
        info!("Using custom icon: {}", icon.display());
        if !icon.exists() {
            warn!("Icon {} does not exist; /favicon.ico will return 404", icon.display());
        }
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}
