// Climate service - Use cases behind each API route
use crate::application::climate_repository::ClimateRepository;
use crate::domain::measurement::{TemperatureObservation, TemperatureSummary, one_year_before};
use crate::domain::station::Station;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Clone)]
pub struct ClimateService {
    repository: Arc<dyn ClimateRepository>,
}

impl ClimateService {
    pub fn new(repository: Arc<dyn ClimateRepository>) -> Self {
        Self { repository }
    }

    /// Date to precipitation over the trailing year.
    ///
    /// Rows sharing a date collapse onto one key; the last row read wins.
    pub async fn precipitation_last_year(&self) -> anyhow::Result<BTreeMap<String, Option<f64>>> {
        let Some(since) = self.trailing_year_start().await? else {
            return Ok(BTreeMap::new());
        };

        let readings = self.repository.precipitation_since(&since).await?;
        let mut by_date = BTreeMap::new();
        for reading in readings {
            by_date.insert(reading.date, reading.precipitation);
        }

        Ok(by_date)
    }

    pub async fn list_stations(&self) -> anyhow::Result<Vec<Station>> {
        self.repository.list_stations().await
    }

    /// Trailing-year temperature observations of the station with the most rows
    pub async fn busiest_station_temperatures(
        &self,
    ) -> anyhow::Result<Vec<TemperatureObservation>> {
        let Some(since) = self.trailing_year_start().await? else {
            return Ok(Vec::new());
        };
        let Some(station_id) = self.repository.most_active_station_id().await? else {
            return Ok(Vec::new());
        };

        tracing::debug!("Busiest station is {}, cutoff {}", station_id, since);
        self.repository.temperatures_since(&station_id, &since).await
    }

    /// Always a single summary, with nulls when nothing matched
    pub async fn temperature_summary(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> anyhow::Result<Vec<TemperatureSummary>> {
        let summary = self.repository.temperature_summary(start, end).await?;
        Ok(vec![summary])
    }

    async fn trailing_year_start(&self) -> anyhow::Result<Option<String>> {
        match self.repository.latest_measurement_date().await? {
            Some(latest) => Ok(Some(one_year_before(&latest)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::measurement::PrecipitationReading;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    /// (station, date, prcp, tobs)
    pub(crate) type Row = (&'static str, &'static str, Option<f64>, f64);

    /// In-memory stand-in for the SQLite store
    #[derive(Default)]
    pub(crate) struct FakeRepository {
        pub(crate) stations: Vec<Station>,
        pub(crate) measurements: Vec<Row>,
    }

    impl FakeRepository {
        pub(crate) fn new(stations: &[(&str, &str)], measurements: Vec<Row>) -> Self {
            Self {
                stations: stations
                    .iter()
                    .map(|(id, name)| Station::new(id.to_string(), name.to_string()))
                    .collect(),
                measurements,
            }
        }
    }

    #[async_trait]
    impl ClimateRepository for FakeRepository {
        async fn latest_measurement_date(&self) -> anyhow::Result<Option<String>> {
            Ok(self
                .measurements
                .iter()
                .map(|(_, date, _, _)| date.to_string())
                .max())
        }

        async fn precipitation_since(
            &self,
            since: &str,
        ) -> anyhow::Result<Vec<PrecipitationReading>> {
            Ok(self
                .measurements
                .iter()
                .filter(|(_, date, _, _)| *date >= since)
                .map(|(_, date, prcp, _)| PrecipitationReading::new(date.to_string(), *prcp))
                .collect())
        }

        async fn list_stations(&self) -> anyhow::Result<Vec<Station>> {
            Ok(self.stations.clone())
        }

        async fn most_active_station_id(&self) -> anyhow::Result<Option<String>> {
            let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
            for (station, _, _, _) in &self.measurements {
                *counts.entry(*station).or_default() += 1;
            }
            Ok(counts
                .into_iter()
                .max_by_key(|(_, count)| *count)
                .map(|(station, _)| station.to_string()))
        }

        async fn temperatures_since(
            &self,
            station_id: &str,
            since: &str,
        ) -> anyhow::Result<Vec<TemperatureObservation>> {
            Ok(self
                .measurements
                .iter()
                .filter(|(station, date, _, _)| *station == station_id && *date >= since)
                .map(|(_, date, _, tobs)| TemperatureObservation::new(date.to_string(), *tobs))
                .collect())
        }

        async fn temperature_summary(
            &self,
            start: &str,
            end: Option<&str>,
        ) -> anyhow::Result<TemperatureSummary> {
            let temps: Vec<f64> = self
                .measurements
                .iter()
                .filter(|(_, date, _, _)| *date >= start && end.is_none_or(|end| *date <= end))
                .map(|(_, _, _, tobs)| *tobs)
                .collect();

            if temps.is_empty() {
                return Ok(TemperatureSummary::default());
            }

            let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
            let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = temps.iter().sum::<f64>() / temps.len() as f64;
            Ok(TemperatureSummary::new(Some(min), Some(avg), Some(max)))
        }
    }

    fn service(repository: FakeRepository) -> ClimateService {
        ClimateService::new(Arc::new(repository))
    }

    fn sample_repository() -> FakeRepository {
        FakeRepository::new(
            &[
                ("USC00519397", "WAIKIKI 717.2, HI US"),
                ("USC00519281", "WAIHEE 837.5, HI US"),
            ],
            vec![
                ("USC00519281", "2016-01-01", Some(0.10), 70.0),
                ("USC00519397", "2016-08-22", Some(0.40), 76.0),
                ("USC00519397", "2016-08-23", Some(0.00), 81.0),
                ("USC00519281", "2016-08-23", Some(1.79), 77.0),
                ("USC00519281", "2017-01-10", None, 68.0),
                ("USC00519281", "2017-08-23", Some(0.45), 79.0),
            ],
        )
    }

    #[tokio::test]
    async fn test_precipitation_covers_trailing_year_only() {
        let by_date = service(sample_repository())
            .precipitation_last_year()
            .await
            .unwrap();

        assert!(by_date.keys().all(|date| date.as_str() >= "2016-08-23"));
        assert!(!by_date.contains_key("2016-08-22"));
        assert_eq!(by_date.get("2017-01-10"), Some(&None));
    }

    #[tokio::test]
    async fn test_precipitation_later_duplicate_date_wins() {
        let by_date = service(sample_repository())
            .precipitation_last_year()
            .await
            .unwrap();

        assert_eq!(by_date.len(), 3);
        assert_eq!(by_date.get("2016-08-23"), Some(&Some(1.79)));
    }

    #[tokio::test]
    async fn test_precipitation_empty_dataset() {
        let by_date = service(FakeRepository::default())
            .precipitation_last_year()
            .await
            .unwrap();
        assert!(by_date.is_empty());
    }

    #[tokio::test]
    async fn test_precipitation_fails_on_malformed_latest_date() {
        let repository = FakeRepository::new(&[], vec![("S1", "not-a-date", None, 70.0)]);
        let result = service(repository).precipitation_last_year().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_stations_keeps_storage_order() {
        let stations = service(sample_repository()).list_stations().await.unwrap();
        let ids: Vec<&str> = stations.iter().map(|s| s.station_id.as_str()).collect();
        assert_eq!(ids, vec!["USC00519397", "USC00519281"]);
    }

    #[tokio::test]
    async fn test_busiest_station_temperatures() {
        let observations = service(sample_repository())
            .busiest_station_temperatures()
            .await
            .unwrap();

        assert_eq!(
            observations,
            vec![
                TemperatureObservation::new("2016-08-23".to_string(), 77.0),
                TemperatureObservation::new("2017-01-10".to_string(), 68.0),
                TemperatureObservation::new("2017-08-23".to_string(), 79.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_busiest_station_temperatures_skips_rows_before_cutoff() {
        let observations = service(sample_repository())
            .busiest_station_temperatures()
            .await
            .unwrap();

        let cutoff = "2016-08-23";
        assert!(observations.iter().all(|obs| obs.date != "2016-01-01"));
        assert!(observations.iter().all(|obs| obs.date.as_str() >= cutoff));
    }

    #[tokio::test]
    async fn test_busiest_station_temperatures_empty_dataset() {
        let observations = service(FakeRepository::default())
            .busiest_station_temperatures()
            .await
            .unwrap();
        assert!(observations.is_empty());
    }

    #[tokio::test]
    async fn test_temperature_summary_is_single_element() {
        let summaries = service(sample_repository())
            .temperature_summary("2017-01-01", None)
            .await
            .unwrap();

        assert_eq!(
            summaries,
            vec![TemperatureSummary::new(Some(68.0), Some(73.5), Some(79.0))]
        );
    }

    #[tokio::test]
    async fn test_temperature_summary_inverted_range_is_null() {
        let summaries = service(sample_repository())
            .temperature_summary("2017-08-23", Some("2016-08-23"))
            .await
            .unwrap();

        assert_eq!(summaries, vec![TemperatureSummary::default()]);
    }
}
