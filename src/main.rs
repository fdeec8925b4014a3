use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;

use comment_notify_service::attempt_log::create_attempt_log;
use comment_notify_service::config::Settings;
use comment_notify_service::postgres::PostgresPool;
use comment_notify_service::server::{create_app, AppState};
use comment_notify_service::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    let _telemetry = init_telemetry(&settings.log, &settings.otel)?;
    tracing::info!("Configuration loaded");

    // PostgreSQL is only needed for the postgres attempt log
    let postgres_pool = if settings.attempt_log.backend == "postgres" {
        match PostgresPool::new(&settings.database).await {
            Ok(pool) => Some(Arc::new(pool)),
            Err(e) => {
                tracing::error!(error = %e, "PostgreSQL unavailable, attempt log falls back to memory");
                None
            }
        }
    } else {
        None
    };

    let attempt_log = create_attempt_log(&settings.attempt_log, postgres_pool.clone());
    attempt_log.prepare().await?;

    // Create application state
    let state = AppState::new(settings.clone(), attempt_log, postgres_pool.clone());
    tracing::info!(
        options_path = %settings.plugin.options_path,
        "Application state initialized"
    );

    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = postgres_pool {
        pool.close().await;
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
