use rust_aggregator_api::config::Config;
use rust_aggregator_api::handlers::{self, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading (all three API credentials are required).
/// - The pooled upstream HTTP client.
/// - HTTP routes and middleware.
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_aggregator_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let port = config.port;
    let app_state = Arc::new(AppState::new(config)?);
    tracing::info!(
        "Upstream client initialized ({}ms timeout)",
        app_state.config.upstream_timeout_ms
    );

    let app = handlers::router(app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server launched on http://localhost:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
