//! Crop-health API server
//!
//! Serves farm selection, NDVI imagery cycles and map scenes for the
//! AgriMitra web front end.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crop_health_api::config::ServiceConfig;
use crop_health_api::routes::build_router;
use crop_health_api::state::AppState;

/// Crop-health API server
#[derive(Parser, Debug)]
#[command(name = "crop-health-api")]
#[command(about = "NDVI crop-health service for AgriMitra farms")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "CROP_HEALTH_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "CROP_HEALTH_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// Farm catalog (YAML); the built-in demo farms are used if it is missing
    #[arg(long, default_value = "config/farms.yaml", env = "CROP_HEALTH_FARMS")]
    farms: String,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting crop-health API server");

    let config = ServiceConfig::load(&args.farms)?;
    let state = Arc::new(AppState::new(config, prometheus)?);
    state.start().await?;

    let app = build_router(Arc::clone(&state));

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Crop-health API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

    state.orchestrator.shutdown().await;
    info!("Crop-health API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
