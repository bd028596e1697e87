//! fusion-engine - Melody + style audio fusion microservice
//!
//! Receives two audio uploads, derives tempo and brightness from the
//! style reference, and asks a pretrained melody-conditioned model
//! (MusicGen, reached over an HTTP bridge) for a new clip that follows
//! the melody in the style's character.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fusion_engine::model::{MelodyModel, MusicGenBridge};
use fusion_engine::{build_router, AppState, FusionEngine};

/// Command-line arguments for fusion-engine
#[derive(Parser, Debug)]
#[command(name = "fusion-engine")]
#[command(about = "Melody + style audio fusion microservice")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "10000", env = "PORT")]
    port: u16,

    /// Base URL of the MusicGen bridge
    #[arg(
        long,
        default_value = "http://localhost:8001",
        env = "MUSICGEN_BRIDGE_URL"
    )]
    bridge_url: String,

    /// Bridge request timeout in seconds (generation is slow)
    #[arg(long, default_value = "300", env = "MUSICGEN_TIMEOUT_SECS")]
    bridge_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fusion_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification, logged before anything slow
    info!(
        "Starting fusion-engine v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    // Construct the model handle before accepting requests, so a dead
    // bridge fails startup instead of the first upload.
    let bridge = MusicGenBridge::connect(
        &args.bridge_url,
        Duration::from_secs(args.bridge_timeout_secs),
    )
    .await
    .context("Failed to connect to MusicGen bridge")?;

    let model: Arc<dyn MelodyModel> = Arc::new(bridge);
    let engine = Arc::new(FusionEngine::new(model));
    info!("Fusion engine initialized with model: {}", engine.model_name());

    let state = AppState::new(engine);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
