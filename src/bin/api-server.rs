//! ChatZiPT API Server
//!
//! HTTP API for signals, scans, price health and chat, plus health and
//! metrics endpoints. Stateless; every request assembles fresh data.

use chatzipt::config::{get_environment, Config};
use chatzipt::core::http::start_server;
use chatzipt::logging;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Arc::new(Config::from_env());
    let port = config.port;

    let env = get_environment();
    info!("Starting ChatZiPT API Server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
