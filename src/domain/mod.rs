// Domain layer - Climate dataset records
pub mod measurement;
pub mod station;
