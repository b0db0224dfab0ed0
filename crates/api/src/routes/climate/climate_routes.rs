use axum::{
    extract::{Path, State},
    Json,
};
use log::error;
use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc};
use utoipa::ToSchema;

use crate::{engine::Error, AppState, TemperatureReading, TemperatureStats};

/// Temperature observation of the most active station
#[derive(Serialize, Debug, PartialEq, ToSchema)]
pub struct TobsEntry {
    /// Observation date (YYYY-MM-DD)
    pub date: String,
    /// Observed temperature
    pub tobs: Option<f64>,
}

impl From<TemperatureReading> for TobsEntry {
    fn from(reading: TemperatureReading) -> Self {
        Self {
            date: reading.date.to_string(),
            tobs: reading.tobs,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation per date over the last year of data, one value per date", body = BTreeMap<String, Option<f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset is empty or unavailable")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, Error> {
    let precipitation = state
        .engine
        .precipitation_last_year()
        .await
        .map_err(|e| {
            error!("error getting precipitation: {}", e);
            e
        })?;

    Ok(Json(
        precipitation
            .into_iter()
            .map(|(date, prcp)| (date.to_string(), prcp))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Codes of every station in the catalog", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset is unavailable")
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, Error> {
    let stations = state.engine.station_list().await.map_err(|e| {
        error!("error getting stations: {}", e);
        e
    })?;
    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Last year of temperature observations at the most active station", body = Vec<TobsEntry>),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset is empty or unavailable")
    ))]
pub async fn tobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TobsEntry>>, Error> {
    let readings = state
        .engine
        .temperature_observations_last_year()
        .await
        .map_err(|e| {
            error!("error getting temperature observations: {}", e);
            e
        })?;
    Ok(Json(readings.into_iter().map(TobsEntry::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First date to include (YYYY-MM-DD)"),
    ),
    responses(
        (status = OK, description = "Temperature stats from the start date onwards", body = TemperatureStats),
        (status = BAD_REQUEST, description = "Start date is not YYYY-MM-DD"),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset is unavailable")
    ))]
pub async fn temperature_stats_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<TemperatureStats>, Error> {
    temperature_stats(&state, &start, None).await
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First date to include (YYYY-MM-DD)"),
         ("end" = String, Path, description = "Last date to include (YYYY-MM-DD)"),
    ),
    responses(
        (status = OK, description = "Temperature stats between the two dates, inclusive", body = TemperatureStats),
        (status = BAD_REQUEST, description = "A date is not YYYY-MM-DD"),
        (status = INTERNAL_SERVER_ERROR, description = "Dataset is unavailable")
    ))]
pub async fn temperature_stats_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<TemperatureStats>, Error> {
    temperature_stats(&state, &start, Some(&end)).await
}

async fn temperature_stats(
    state: &AppState,
    start: &str,
    end: Option<&str>,
) -> Result<Json<TemperatureStats>, Error> {
    let stats = state
        .engine
        .temperature_stats(start, end)
        .await
        .map_err(|e| {
            error!("error getting temperature stats: {}", e);
            e
        })?;
    Ok(Json(stats))
}
