// Application layer - Use cases and the data-access seam
pub mod climate_repository;
pub mod climate_service;
