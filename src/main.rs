use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app_state;
mod config;
mod error;
mod handlers;
mod models;
mod openapi;
mod render;
mod reports_memory;
mod services;
mod utils;

use app_state::AppState;
use config::Config;
use reports_memory::InMemoryReports;
use services::assessor::GeminiAssessor;
use services::image_store::ImageStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assessment_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🔧 Loading configuration from environment variables...");
    let config = Arc::new(Config::from_env()?);
    tracing::info!("✅ Configuration loaded successfully");
    tracing::debug!("Gemini model: {}", config.gemini_model);
    tracing::debug!("Gemini API key: {}", config.masked_api_key());
    tracing::debug!("Max upload size: {}MB", config.max_upload_mb());
    if config.gemini_api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set; /api/analyze will fail until configured");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    let image_store = Arc::new(ImageStore::from_config(&config, http.clone()));
    tracing::info!("✅ Image store initialized in {} mode", image_store.mode());

    let state = AppState {
        config: config.clone(),
        reports: Arc::new(InMemoryReports::new()),
        assessor: Arc::new(GeminiAssessor::from_config(&config, http.clone())),
        image_store,
        http,
    };

    // Data URLs inflate image payloads by 4/3 before they reach /api/analyze,
    // so the body limit leaves headroom above the raw upload cap.
    let app = Router::new()
        .route("/", get(handlers::pages::landing))
        .route("/analyze", get(handlers::pages::analyze))
        .route("/report/{id}", get(handlers::pages::report_view))
        .route("/health", get(handlers::health::health_check))
        .route("/api/upload", post(handlers::upload::upload_image))
        .route("/api/analyze", post(handlers::analyze::analyze_image))
        .route("/api/report/{id}", get(handlers::reports::get_report))
        .route("/api/test-models", get(handlers::diagnostics::test_models))
        .merge(openapi::routes())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes * 2))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state);

    let listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port)).await?;
    tracing::info!(
        "🚀 Assessment service starting on http://0.0.0.0:{}",
        config.http_port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

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
            tracing::info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
