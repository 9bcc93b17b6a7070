// SQLite repository implementation (libSQL, opened read-only)
use crate::application::climate_repository::ClimateRepository;
use crate::domain::measurement::{
    PrecipitationReading, TemperatureObservation, TemperatureSummary,
};
use crate::domain::station::Station;
use anyhow::Result;
use async_trait::async_trait;
use libsql::{Builder, Connection, OpenFlags, Value};
use std::path::Path;
use thiserror::Error;

pub const STATION_TABLE: &str = "station";
pub const MEASUREMENT_TABLE: &str = "measurement";

const LATEST_DATE_SQL: &str = "SELECT MAX(date) FROM measurement";

const PRECIPITATION_SINCE_SQL: &str = "SELECT date, prcp FROM measurement WHERE date >= ?1";

const STATIONS_SQL: &str = "SELECT station, name FROM station";

const MOST_ACTIVE_STATION_SQL: &str = "SELECT station, COUNT(station) AS observations \
     FROM measurement GROUP BY station ORDER BY observations DESC LIMIT 1";

const TEMPERATURES_SINCE_SQL: &str =
    "SELECT date, tobs FROM measurement WHERE station = ?1 AND date >= ?2";

const SUMMARY_FROM_SQL: &str =
    "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= ?1";

const SUMMARY_BETWEEN_SQL: &str =
    "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement WHERE date >= ?1 AND date <= ?2";

/// Errors raised while reading the climate store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    #[error("Required table '{0}' is missing from the dataset")]
    MissingTable(&'static str),

    #[error("Unexpected value in column '{column}': {found}")]
    UnexpectedValue { column: &'static str, found: String },
}

/// Read-only handle on the climate dataset.
///
/// The database is opened once; every query opens its own connection and
/// drops it when done, so no session outlives a request.
pub struct SqliteClimateRepository {
    db: libsql::Database,
}

impl SqliteClimateRepository {
    /// Open an existing dataset file read-only and check that both tables exist.
    pub async fn open_read_only(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Builder::new_local(path.as_ref())
            .flags(OpenFlags::SQLITE_OPEN_READ_ONLY)
            .build()
            .await?;

        let repository = Self { db };
        repository.verify_schema().await?;
        Ok(repository)
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Ok(self.db.connect()?)
    }

    async fn verify_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        for table in [STATION_TABLE, MEASUREMENT_TABLE] {
            let mut rows = conn
                .query(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                )
                .await?;
            if rows.next().await?.is_none() {
                return Err(StoreError::MissingTable(table));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ClimateRepository for SqliteClimateRepository {
    async fn latest_measurement_date(&self) -> Result<Option<String>> {
        let conn = self.connect()?;
        let mut rows = conn.query(LATEST_DATE_SQL, ()).await?;

        match rows.next().await? {
            Some(row) => Ok(row.get::<Option<String>>(0)?),
            None => Ok(None),
        }
    }

    async fn precipitation_since(&self, since: &str) -> Result<Vec<PrecipitationReading>> {
        tracing::debug!("Executing precipitation query since {}", since);
        let conn = self.connect()?;
        let mut rows = conn.query(PRECIPITATION_SINCE_SQL, [since]).await?;

        let mut readings = Vec::new();
        while let Some(row) = rows.next().await? {
            readings.push(PrecipitationReading::new(
                row.get::<String>(0)?,
                optional_f64(row.get_value(1)?, "prcp")?,
            ));
        }

        tracing::debug!("Read {} precipitation rows", readings.len());
        Ok(readings)
    }

    async fn list_stations(&self) -> Result<Vec<Station>> {
        let conn = self.connect()?;
        let mut rows = conn.query(STATIONS_SQL, ()).await?;

        let mut stations = Vec::new();
        while let Some(row) = rows.next().await? {
            stations.push(Station::new(row.get::<String>(0)?, row.get::<String>(1)?));
        }

        tracing::debug!("Read {} stations", stations.len());
        Ok(stations)
    }

    async fn most_active_station_id(&self) -> Result<Option<String>> {
        let conn = self.connect()?;
        let mut rows = conn.query(MOST_ACTIVE_STATION_SQL, ()).await?;

        match rows.next().await? {
            Some(row) => Ok(row.get::<Option<String>>(0)?),
            None => Ok(None),
        }
    }

    async fn temperatures_since(
        &self,
        station_id: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>> {
        tracing::debug!(
            "Executing temperature query for station {} since {}",
            station_id,
            since
        );
        let conn = self.connect()?;
        let mut rows = conn
            .query(TEMPERATURES_SINCE_SQL, libsql::params![station_id, since])
            .await?;

        let mut observations = Vec::new();
        while let Some(row) = rows.next().await? {
            observations.push(TemperatureObservation::new(
                row.get::<String>(0)?,
                required_f64(row.get_value(1)?, "tobs")?,
            ));
        }

        tracing::debug!("Read {} temperature observations", observations.len());
        Ok(observations)
    }

    async fn temperature_summary(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureSummary> {
        let conn = self.connect()?;
        let mut rows = match end {
            Some(end) => {
                conn.query(SUMMARY_BETWEEN_SQL, libsql::params![start, end])
                    .await?
            }
            None => conn.query(SUMMARY_FROM_SQL, [start]).await?,
        };

        // Aggregates without GROUP BY always yield one row
        let Some(row) = rows.next().await? else {
            return Ok(TemperatureSummary::default());
        };

        Ok(TemperatureSummary::new(
            optional_f64(row.get_value(0)?, "min_temp")?,
            optional_f64(row.get_value(1)?, "avg_temp")?,
            optional_f64(row.get_value(2)?, "max_temp")?,
        ))
    }
}

/// Read a nullable numeric column. Integers are widened since SQLite
/// may store whole readings with INTEGER storage class.
fn optional_f64(value: Value, column: &'static str) -> Result<Option<f64>, StoreError> {
    match value {
        Value::Null => Ok(None),
        Value::Real(v) => Ok(Some(v)),
        Value::Integer(v) => Ok(Some(v as f64)),
        other => Err(StoreError::UnexpectedValue {
            column,
            found: format!("{other:?}"),
        }),
    }
}

fn required_f64(value: Value, column: &'static str) -> Result<f64, StoreError> {
    optional_f64(value, column)?.ok_or(StoreError::UnexpectedValue {
        column,
        found: "NULL".to_string(),
    })
}
