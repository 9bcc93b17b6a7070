// Repository trait for climate data access
use crate::domain::measurement::{
    PrecipitationReading, TemperatureObservation, TemperatureSummary,
};
use crate::domain::station::Station;
use async_trait::async_trait;

#[async_trait]
pub trait ClimateRepository: Send + Sync {
    /// Latest `date` across all measurements, or `None` when there are none
    async fn latest_measurement_date(&self) -> anyhow::Result<Option<String>>;

    /// Precipitation rows with `date >= since`, in storage order
    async fn precipitation_since(&self, since: &str) -> anyhow::Result<Vec<PrecipitationReading>>;

    /// All stations, in storage order
    async fn list_stations(&self) -> anyhow::Result<Vec<Station>>;

    /// Station with the most measurement rows.
    /// Ties are broken by whatever order the store yields groups in.
    async fn most_active_station_id(&self) -> anyhow::Result<Option<String>>;

    /// Temperature observations of one station with `date >= since`
    async fn temperatures_since(
        &self,
        station_id: &str,
        since: &str,
    ) -> anyhow::Result<Vec<TemperatureObservation>>;

    /// Min/avg/max temperature for `start <= date` (and `date <= end` when given)
    async fn temperature_summary(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> anyhow::Result<TemperatureSummary>;
}
