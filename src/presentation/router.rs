// Router construction
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, home, precipitation, stations, temperature_between, temperature_from, tobs,
};
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// Static segments win over the `:start` capture, so `/api/v1.0/tobs` is never
/// read as a start date.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(health_check))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/:start", get(temperature_from))
        .route("/api/v1.0/:start/:end", get(temperature_between))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
