mod sqlite;

pub use sqlite::*;

use async_trait::async_trait;
use itertools::Itertools;
use time::{macros::format_description, Date};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Stored date '{0}' is not a valid YYYY-MM-DD date")]
    StoredDate(String),
    #[error("Dataset not found: {0}")]
    NotFound(String),
}

/// Hands out scoped sessions over the read-only observation dataset.
///
/// A session holds one underlying connection for as long as it lives and
/// gives it back when dropped, so callers take one per operation and never
/// keep it past the request that needed it.
#[async_trait]
pub trait ClimateData: Send + Sync {
    async fn session(&self) -> Result<Box<dyn ClimateSession>, Error>;
}

#[async_trait]
pub trait ClimateSession: Send {
    /// Observations matching `filter`, ordered by date then storage order.
    async fn list_observations(
        &mut self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, Error>;

    /// Station catalog in storage order.
    async fn list_stations(&mut self) -> Result<Vec<Station>, Error>;

    /// Latest observation date, `None` when there are no observations.
    async fn latest_date(&mut self) -> Result<Option<Date>, Error> {
        let observations = self.list_observations(&ObservationFilter::default()).await?;
        Ok(observations.into_iter().map(|obs| obs.date).max())
    }

    /// Number of observations per station, in no particular order.
    async fn observation_counts(&mut self) -> Result<Vec<StationActivity>, Error> {
        let observations = self.list_observations(&ObservationFilter::default()).await?;
        Ok(observations
            .into_iter()
            .map(|obs| obs.station)
            .counts()
            .into_iter()
            .map(|(station, count)| StationActivity {
                station,
                observations: count as i64,
            })
            .collect())
    }
}

/// Optional bounds on an observation listing, all inclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObservationFilter {
    pub date_from: Option<Date>,
    pub date_to: Option<Date>,
    pub station: Option<String>,
}

impl ObservationFilter {
    pub fn since(date_from: Date) -> Self {
        Self {
            date_from: Some(date_from),
            ..Default::default()
        }
    }

    pub fn between(date_from: Date, date_to: Option<Date>) -> Self {
        Self {
            date_from: Some(date_from),
            date_to,
            station: None,
        }
    }

    pub fn for_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    pub fn matches(&self, observation: &Observation) -> bool {
        let after_start = self
            .date_from
            .map(|start| observation.date >= start)
            .unwrap_or(true);
        let before_end = self
            .date_to
            .map(|end| observation.date <= end)
            .unwrap_or(true);
        let same_station = self
            .station
            .as_ref()
            .map(|station| observation.station == *station)
            .unwrap_or(true);
        after_start && before_end && same_station
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub station: String,
    pub date: Date,
    /// Precipitation amount, `None` when not recorded
    pub prcp: Option<f64>,
    /// Observed temperature, `None` when not recorded
    pub tobs: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub station: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationActivity {
    pub station: String,
    pub observations: i64,
}

/// Strict `YYYY-MM-DD`: a four digit year with no sign, two digit month and day.
pub fn parse_iso_date(raw: &str) -> Option<Date> {
    let format = format_description!("[year]-[month]-[day]");
    if raw.len() != 10 || !raw.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Date::parse(raw, &format).ok()
}

/// Parse a stored `YYYY-MM-DD` date column.
pub fn parse_stored_date(raw: &str) -> Result<Date, Error> {
    parse_iso_date(raw).ok_or_else(|| Error::StoredDate(raw.to_owned()))
}
