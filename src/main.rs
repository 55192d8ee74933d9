//! Math Anxiety Helper - supportive chat for fraction problems
//!
//! A small web chat that asks how the student feels, walks through two
//! scripted questions, then hands the conversation to a hosted model.

mod api;
mod config;
mod llm;
mod relay;
mod runtime;
mod sentiment;
mod session;
mod state_machine;

use api::{create_router, AppState};
use config::AppConfig;
use llm::{LoggingGenerator, ReplicateService, TextGenerator};
use relay::ResponseRelay;
use runtime::SessionManager;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "math_anxiety_helper=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration, read once
    let config = AppConfig::from_env();

    if !config.llm.has_token() {
        tracing::warn!("REPLICATE_API_TOKEN is not set; model replies will fall back to an apology.");
    }

    // Initialize the model relay
    let service: Arc<dyn TextGenerator> = Arc::new(ReplicateService::new(&config.llm)?);
    let generator = Arc::new(LoggingGenerator::new(service));
    let relay = Arc::new(ResponseRelay::new(generator, config.llm.timeout));
    tracing::info!(
        model = %relay.model_id(),
        timeout_secs = config.llm.timeout.as_secs(),
        "Relay initialized"
    );

    // Sessions live in memory only
    let sessions = Arc::new(SessionManager::new(relay, config.session_idle_ttl));
    let _sweeper = sessions.spawn_sweeper(config.sweep_interval);

    let state = AppState::new(sessions);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Math Anxiety Helper listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
