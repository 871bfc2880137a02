mod config;
mod http;

use anyhow::Result;
use common::RedisClient;
use event_worker::{EventWorker, EventWorkerConfig};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    let config = match config::ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting worker-server");

    if let Err(e) = run(config).await {
        error!(error = %e, "worker-server exited with error");
        std::process::exit(1);
    }
}

async fn run(config: config::ServiceConfig) -> Result<()> {
    let redis_client = RedisClient::connect(&config.redis_url).await?;
    redis_client.ping().await?;

    let worker = EventWorker::new(
        redis_client,
        EventWorkerConfig {
            sf_api_version: config.sf_api_version.clone(),
        },
    )?;

    let app = http::router(http::AppState {
        service: worker.service(),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening for event notifications");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "error setting up ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => error!(error = %e, "error setting up SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received shutdown signal"),
        _ = terminate => info!("Received SIGTERM signal"),
    }
}
