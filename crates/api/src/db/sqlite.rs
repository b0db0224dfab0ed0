use anyhow::{bail, Context};
use async_trait::async_trait;
use climate_api_core::is_readable_file;
use log::{debug, info};
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
    QueryBuilder, Row, Sqlite,
};
use std::{str::FromStr, time::Duration};
use time::Date;

use super::{
    parse_stored_date, ClimateData, ClimateSession, Error, Observation, ObservationFilter,
    Station, StationActivity,
};

/// Read-only handle on the SQLite observation dataset.
pub struct ClimateStore {
    pool: SqlitePool,
}

/// Row counts reported at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    pub stations: i64,
    pub observations: i64,
}

impl ClimateStore {
    pub async fn new(path: &str, max_connections: u32) -> anyhow::Result<Self> {
        if !is_readable_file(path) {
            bail!(Error::NotFound(path.to_owned()));
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .read_only(true)
            .create_if_missing(false)
            .pragma("busy_timeout", "5000")
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "MEMORY");

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open climate dataset at {}", path))?;

        let store = Self { pool };
        let summary = store.summary().await?;
        info!(
            "Climate dataset opened at {} ({} stations, {} observations)",
            path, summary.stations, summary.observations
        );

        Ok(store)
    }

    /// Confirms both tables are present and counts their rows.
    pub async fn summary(&self) -> anyhow::Result<DatasetSummary> {
        let stations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM station")
            .fetch_one(&self.pool)
            .await
            .context("Dataset is missing the station table")?;
        let observations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM measurement")
            .fetch_one(&self.pool)
            .await
            .context("Dataset is missing the measurement table")?;

        Ok(DatasetSummary {
            stations,
            observations,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Climate dataset closed");
    }
}

#[async_trait]
impl ClimateData for ClimateStore {
    async fn session(&self) -> Result<Box<dyn ClimateSession>, Error> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(SqliteSession { conn }))
    }
}

/// One pooled connection, returned to the pool on drop.
pub struct SqliteSession {
    conn: PoolConnection<Sqlite>,
}

#[async_trait]
impl ClimateSession for SqliteSession {
    async fn list_observations(
        &mut self,
        filter: &ObservationFilter,
    ) -> Result<Vec<Observation>, Error> {
        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT station, date, prcp, tobs FROM measurement WHERE 1 = 1",
        );

        // ISO dates compare correctly as text
        if let Some(date_from) = filter.date_from {
            query.push(" AND date >= ").push_bind(date_from.to_string());
        }
        if let Some(date_to) = filter.date_to {
            query.push(" AND date <= ").push_bind(date_to.to_string());
        }
        if let Some(station) = &filter.station {
            query.push(" AND station = ").push_bind(station.clone());
        }
        query.push(" ORDER BY date, id");

        debug!("listing observations: {:?}", filter);
        let rows = query.build().fetch_all(&mut *self.conn).await?;
        rows.iter().map(row_to_observation).collect()
    }

    async fn list_stations(&mut self) -> Result<Vec<Station>, Error> {
        let rows = sqlx::query(
            "SELECT station, name, latitude, longitude, elevation FROM station ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Station {
                    station: row.try_get("station")?,
                    name: row.try_get("name")?,
                    latitude: row.try_get("latitude")?,
                    longitude: row.try_get("longitude")?,
                    elevation: row.try_get("elevation")?,
                })
            })
            .collect()
    }

    async fn latest_date(&mut self) -> Result<Option<Date>, Error> {
        let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM measurement")
            .fetch_one(&mut *self.conn)
            .await?;
        latest.as_deref().map(parse_stored_date).transpose()
    }

    async fn observation_counts(&mut self) -> Result<Vec<StationActivity>, Error> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT station, COUNT(*) AS observations FROM measurement GROUP BY station",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(station, observations)| StationActivity {
                station,
                observations,
            })
            .collect())
    }
}

fn row_to_observation(row: &SqliteRow) -> Result<Observation, Error> {
    let date: String = row.try_get("date")?;
    Ok(Observation {
        station: row.try_get("station")?,
        date: parse_stored_date(&date)?,
        prcp: row.try_get("prcp")?,
        tobs: row.try_get("tobs")?,
    })
}
