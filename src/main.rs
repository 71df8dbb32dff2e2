//! PDF Converter Server
//!
//! Accepts a document over HTTP and returns it rendered to PDF by headless
//! LibreOffice.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_converter_server::{build_router, convert, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pdf_converter_server=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Invalid configuration")?;

    tracing::info!("Starting PDF Converter Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Converter program: {}", config.converter.program);
    tracing::info!("Scratch directory: {}", config.converter.scratch_dir.display());

    tokio::fs::create_dir_all(&config.converter.scratch_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create scratch directory {}",
                config.converter.scratch_dir.display()
            )
        })?;

    if let Some(interval) = config.sweep.interval {
        tracing::info!(
            interval_secs = interval.as_secs(),
            max_age_secs = config.sweep.max_age.as_secs(),
            "Scratch sweep enabled"
        );
        convert::start_sweep_task(
            config.converter.scratch_dir.clone(),
            interval,
            config.sweep.max_age,
        );
    }

    let addr = config.server.bind_addr()?;
    let app = build_router(AppState::new(config));

    // Start server with graceful shutdown
    tracing::info!("PDF Converter Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
