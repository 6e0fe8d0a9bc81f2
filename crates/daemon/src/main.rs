//! Brewline Daemon - Main Entry Point
//!
//! Wires the equipment pools, the brew orchestrator and the JSON-RPC
//! server together, then runs until Ctrl-C or SIGTERM.

mod config;
mod logging;
mod telemetry;

use anyhow::Result;
use brewline_api_rpc::RpcServer;
use brewline_core::application::{BrewOrchestrator, EquipmentRegistry, OrderMetrics};
use config::DaemonConfig;
use logging::LogSettings;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const POOL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Logging
    let _log_guard = logging::init(&LogSettings::from_env())?;
    info!("Brewline daemon v{} starting...", VERSION);

    // 2. Configuration
    let config = DaemonConfig::from_env();
    info!(
        host = %config.rpc.host,
        port = config.rpc.port,
        request_timeout = ?config.rpc.request_timeout,
        metrics_window = config.shop.metrics_window,
        "Configuration loaded"
    );

    // 3. Equipment pools
    let registry = Arc::new(EquipmentRegistry::from_config(&config.shop));
    for (equipment, workers) in registry.capacity() {
        info!(%equipment, workers, "Equipment registered");
    }
    registry.start_all().await;

    // 4. Orchestrator (DI wiring)
    let metrics = Arc::new(OrderMetrics::new(config.shop.metrics_window));
    let orchestrator = Arc::new(BrewOrchestrator::new(
        registry.clone(),
        Arc::new(config.shop.catalog.clone()),
        metrics,
    ));

    // 5. JSON-RPC server
    let server = match RpcServer::new(config.rpc.clone(), orchestrator).start().await {
        Ok(server) => server,
        Err(e) => {
            registry.stop_all().await;
            return Err(anyhow::anyhow!("RPC server start failed: {}", e));
        }
    };
    info!(addr = %server.local_addr, "System ready. Waiting for orders...");

    // 6. Wait for shutdown signal
    shutdown_signal().await;
    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown: stop taking requests, then drain the pools
    if let Err(e) = server.handle.stop() {
        warn!(error = %e, "RPC server already stopped");
    }
    server.handle.stopped().await;

    if tokio::time::timeout(POOL_SHUTDOWN_TIMEOUT, registry.stop_all())
        .await
        .is_err()
    {
        warn!(
            timeout_secs = POOL_SHUTDOWN_TIMEOUT.as_secs(),
            "Equipment pools did not stop in time"
        );
    }

    telemetry::shutdown();
    info!("Shutdown complete.");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
