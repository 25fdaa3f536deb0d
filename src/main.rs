// src/main.rs
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::{error, info, warn};
use warp::Filter;

use vedic_chart_api::config::AppConfig;
use vedic_chart_api::routes;
use vedic_chart_api::services::chart::ChartService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;
    let provider = config.build_provider()?;
    info!("Position provider ready ({} mode)", provider.mode());
    let service = ChartService::new(provider, config.computation_timeout);

    // Bind to all interfaces for container deployments
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);

    let api = routes::routes(service, Instant::now()).with(cors);
    info!("Routes configured successfully with CORS.");

    let (bound, server) = warp::serve(api).try_bind_with_graceful_shutdown(addr, shutdown_signal())?;
    info!("Vedic chart API listening on {}", bound);
    server.await;
    warn!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = wait_for_signal("Ctrl-C", tokio::signal::ctrl_c()) => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                warn!("Cannot listen for SIGTERM ({}), waiting for Ctrl-C only", e);
                wait_for_signal("Ctrl-C", tokio::signal::ctrl_c()).await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        wait_for_signal("Ctrl-C", tokio::signal::ctrl_c()).await;
    }

    info!("Shutdown signal received, draining connections...");
}

/// Resolve when `listener` reports the signal. If the handler cannot be
/// installed, never resolve: the server keeps running instead of stopping.
async fn wait_for_signal<F>(name: &str, listener: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = listener.await {
        error!("Cannot listen for {} ({}), shutdown must come from elsewhere", name, e);
        std::future::pending::<()>().await;
    }
}
