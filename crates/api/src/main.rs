use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidgate_api::config::ServerConfig;
use vidgate_api::router::build_app_router;
use vidgate_api::scheduler::PollScheduler;
use vidgate_api::state::AppState;
use vidgate_api::store::JobStore;
use vidgate_provider::{ProviderConfig, VideoApi};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidgate_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let provider_config = ProviderConfig::from_env();
    if provider_config.api_key.is_none() {
        tracing::warn!(
            "No provider API key configured; submissions will fail until VIDGATE_API_KEY is set"
        );
    }
    tracing::info!(base_url = %provider_config.base_url, "Loaded provider configuration");

    // --- Services ---
    let provider = Arc::new(VideoApi::new(provider_config));
    let store = Arc::new(JobStore::new());
    let scheduler = PollScheduler::new(
        Arc::clone(&store),
        Arc::clone(&provider),
        Duration::from_millis(config.poll_interval_ms),
    );
    tracing::info!(
        poll_interval_ms = config.poll_interval_ms,
        "Poll scheduler created"
    );

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        provider,
        store,
        scheduler: Arc::clone(&scheduler),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    scheduler.shutdown().await;
    tracing::info!("Poll scheduler stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
