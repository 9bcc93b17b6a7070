// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::climate_service::ClimateService;
use crate::infrastructure::config::load_climate_config;
use crate::infrastructure::sqlite_repository::SqliteClimateRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_climate_config()?;

    // Open the dataset once (infrastructure layer)
    let db_path = &config.database.path;
    tracing::info!("Opening climate dataset at {}", db_path.display());
    let repository = SqliteClimateRepository::open_read_only(db_path).await?;

    // Create services (application layer)
    let climate_service = ClimateService::new(Arc::new(repository));

    // Create application state
    let state = Arc::new(AppState { climate_service });

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!("Starting climate-api service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
