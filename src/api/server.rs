use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{config::ApiServerConfig, errors::Error};

use super::routes::{build_router, ApiState};

pub async fn start_api_server(config: ApiServerConfig, state: ApiState) -> crate::Result<()> {
    let addr: SocketAddr = config
        .socket_address()
        .parse()
        .map_err(|e| Error::config(format!("Invalid API address: {}", e)))?;

    let router = build_router(state, &config);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::transport(format!("Failed to bind API server: {}", e)))?;

    info!(address = %addr, "Starting HTTP API server");
    serve(listener, router, shutdown_signal()).await?;

    info!("API server shutdown completed");
    Ok(())
}

/// Serve `router` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> crate::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::transport(format!("API server error: {}", e)))
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "API server shutdown listener failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
