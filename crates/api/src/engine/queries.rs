use itertools::Itertools;
use log::debug;
use std::{collections::BTreeMap, sync::Arc};
use time::Date;

use super::{most_active_station, trailing_window, Error, TemperatureStats, TRAILING_YEAR_DAYS};
use crate::db::{parse_iso_date, ClimateData, Observation, ObservationFilter};

/// One temperature reading of the most active station.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReading {
    pub date: Date,
    pub tobs: Option<f64>,
}

/// Read-only views over the observation dataset.
///
/// Every operation takes its own session from the store and drops it before
/// returning, whichever way it returns.
pub struct QueryEngine {
    store: Arc<dyn ClimateData>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn ClimateData>) -> Self {
        Self { store }
    }

    /// Precipitation per date over the trailing year, all stations.
    ///
    /// The map holds a single value per date: when several stations report on
    /// the same day the one read last wins.
    pub async fn precipitation_last_year(&self) -> Result<BTreeMap<Date, Option<f64>>, Error> {
        let mut session = self.store.session().await?;
        let window = trailing_window(session.as_mut(), TRAILING_YEAR_DAYS).await?;
        debug!("precipitation window: {} to {}", window.start, window.end);

        let observations = session
            .list_observations(&ObservationFilter::since(window.start))
            .await?;
        Ok(collapse_precipitation(observations))
    }

    /// Distinct station codes in catalog order.
    pub async fn station_list(&self) -> Result<Vec<String>, Error> {
        let mut session = self.store.session().await?;
        let stations = session.list_stations().await?;

        Ok(stations
            .into_iter()
            .map(|station| station.station)
            .unique()
            .collect())
    }

    /// Trailing-year temperature readings of the most active station, by date.
    pub async fn temperature_observations_last_year(
        &self,
    ) -> Result<Vec<TemperatureReading>, Error> {
        let mut session = self.store.session().await?;
        let window = trailing_window(session.as_mut(), TRAILING_YEAR_DAYS).await?;
        let station = most_active_station(session.as_mut()).await?;

        let observations = session
            .list_observations(&ObservationFilter::since(window.start).for_station(station))
            .await?;

        let mut readings: Vec<TemperatureReading> = observations
            .into_iter()
            .map(|obs| TemperatureReading {
                date: obs.date,
                tobs: obs.tobs,
            })
            .collect();
        readings.sort_by_key(|reading| reading.date);
        Ok(readings)
    }

    /// Temperature min/avg/max from `start` onwards, up to `end` when given.
    ///
    /// Both bounds are inclusive. A range with `start` after `end` selects
    /// nothing and yields empty stats.
    pub async fn temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, Error> {
        let start = parse_request_date(start)?;
        let end = end.map(parse_request_date).transpose()?;

        let mut session = self.store.session().await?;
        let observations = session
            .list_observations(&ObservationFilter::between(start, end))
            .await?;
        debug!(
            "temperature stats over {} observations from {}",
            observations.len(),
            start
        );

        Ok(TemperatureStats::from_readings(
            observations.into_iter().map(|obs| obs.tobs),
        ))
    }
}

/// Parse a client supplied `YYYY-MM-DD` date.
pub fn parse_request_date(raw: &str) -> Result<Date, Error> {
    parse_iso_date(raw).ok_or_else(|| Error::InvalidDateFormat(raw.to_owned()))
}

/// Fold observations into one precipitation value per date, later rows
/// overwriting earlier ones.
pub fn collapse_precipitation(
    observations: impl IntoIterator<Item = Observation>,
) -> BTreeMap<Date, Option<f64>> {
    let mut precipitation = BTreeMap::new();
    for obs in observations {
        precipitation.insert(obs.date, obs.prcp);
    }
    precipitation
}
