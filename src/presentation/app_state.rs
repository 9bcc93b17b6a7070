// Application state for HTTP handlers
use crate::application::climate_service::ClimateService;

#[derive(Clone)]
pub struct AppState {
    pub climate_service: ClimateService,
}
