// HTTP request handlers
use crate::domain::measurement::{TemperatureObservation, TemperatureSummary};
use crate::domain::station::Station;
use crate::infrastructure::http_response::ApiResult;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Routes listed on the index page, in display order
pub const API_ROUTES: [&str; 5] = [
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
    "/api/v1.0/&lt;start&gt;",
    "/api/v1.0/&lt;start&gt;/&lt;end&gt;",
];

/// Route index
pub async fn home() -> Html<String> {
    let mut page = String::from("Welcome to Thew's Climate App API!<br/><br/>");
    page.push_str("Available Routes:<br/><br/>");
    for route in API_ROUTES {
        page.push_str(route);
        page.push_str("<br/>");
    }
    Html(page)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Date to precipitation for the last year of data
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BTreeMap<String, Option<f64>>>> {
    let by_date = state.climate_service.precipitation_last_year().await?;
    Ok(Json(by_date))
}

pub async fn stations(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Station>>> {
    let stations = state.climate_service.list_stations().await?;
    Ok(Json(stations))
}

/// Last year of temperature observations for the most active station
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TemperatureObservation>>> {
    let observations = state.climate_service.busiest_station_temperatures().await?;
    Ok(Json(observations))
}

pub async fn temperature_from(
    Path(start): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TemperatureSummary>>> {
    let summary = state
        .climate_service
        .temperature_summary(&start, None)
        .await?;
    Ok(Json(summary))
}

pub async fn temperature_between(
    Path((start, end)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<TemperatureSummary>>> {
    let summary = state
        .climate_service
        .temperature_summary(&start, Some(end.as_str()))
        .await?;
    Ok(Json(summary))
}
