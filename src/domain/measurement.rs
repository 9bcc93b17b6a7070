// Measurement domain models
use chrono::{Days, NaiveDate};
use serde::Serialize;
use thiserror::Error;

/// Format of every `date` column in the dataset.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the trailing window, counted back from the latest measurement.
pub const TRAILING_WINDOW_DAYS: u64 = 365;

#[derive(Debug, Error)]
pub enum DateError {
    #[error("Invalid measurement date '{value}': {source}")]
    Invalid {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Date '{0}' is too early to subtract the trailing window")]
    OutOfRange(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationReading {
    pub date: String,
    pub precipitation: Option<f64>,
}

impl PrecipitationReading {
    pub fn new(date: String, precipitation: Option<f64>) -> Self {
        Self {
            date,
            precipitation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

impl TemperatureObservation {
    pub fn new(date: String, tobs: f64) -> Self {
        Self { date, tobs }
    }
}

/// Aggregate over a date range. All fields are `None` when no rows matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemperatureSummary {
    pub min_temp: Option<f64>,
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

impl TemperatureSummary {
    pub fn new(min_temp: Option<f64>, avg_temp: Option<f64>, max_temp: Option<f64>) -> Self {
        Self {
            min_temp,
            avg_temp,
            max_temp,
        }
    }
}

/// Start of the trailing year that ends at `latest`, as a `YYYY-MM-DD` string.
///
/// The result is meant for an inclusive `date >= cutoff` comparison against
/// the stored ISO strings.
pub fn one_year_before(latest: &str) -> Result<String, DateError> {
    let latest_date =
        NaiveDate::parse_from_str(latest, DATE_FORMAT).map_err(|source| DateError::Invalid {
            value: latest.to_string(),
            source,
        })?;

    latest_date
        .checked_sub_days(Days::new(TRAILING_WINDOW_DAYS))
        .map(|cutoff| cutoff.format(DATE_FORMAT).to_string())
        .ok_or_else(|| DateError::OutOfRange(latest.to_string()))
}
