use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use climate_api::{app, build_app_state, db, ClimateData, ClimateSession, ClimateStore};
use hyper::{header, Method};
use mockall::mock;
use sqlx::{sqlite::SqliteConnectOptions, Connection, SqliteConnection};
use std::{path::Path, str::FromStr, sync::Arc};
use tempfile::TempDir;
use tower::ServiceExt;

/// (station, date, prcp, tobs) in storage order
pub type MeasurementRow = (&'static str, &'static str, Option<f64>, Option<f64>);

pub const STATIONS: &[&str] = &["USC001", "USC002", "USC003"];

/// USC001 reports 11 times (one before the trailing year), USC002 3 times,
/// USC003 never. January 2017 holds 60, 62, 58, 64, 61.
pub const MEASUREMENTS: &[MeasurementRow] = &[
    ("USC001", "2016-08-20", Some(0.9), Some(70.0)),
    ("USC001", "2016-08-23", Some(0.0), Some(75.0)),
    ("USC001", "2016-10-01", Some(0.1), Some(72.0)),
    ("USC001", "2016-12-15", Some(0.3), Some(66.0)),
    ("USC001", "2017-01-05", Some(0.0), Some(60.0)),
    ("USC001", "2017-01-12", Some(0.2), Some(62.0)),
    ("USC001", "2017-01-20", None, Some(58.0)),
    ("USC002", "2017-01-25", Some(1.2), Some(64.0)),
    ("USC002", "2017-01-31", Some(0.0), Some(61.0)),
    ("USC001", "2017-03-10", Some(0.05), Some(67.0)),
    ("USC001", "2017-05-30", Some(0.0), Some(71.0)),
    ("USC001", "2017-07-04", Some(0.4), Some(76.0)),
    ("USC001", "2017-08-23", Some(0.0), Some(78.0)),
    ("USC002", "2017-08-23", Some(0.08), Some(77.0)),
];

pub struct TestApp {
    pub app: Router,
    pub store: Arc<ClimateStore>,
    _dir: TempDir,
}

mock! {
    pub ClimateAccess {}

    #[async_trait]
    impl ClimateData for ClimateAccess {
        async fn session(&self) -> Result<Box<dyn ClimateSession>, db::Error>;
    }
}

/// Write a dataset with the hawaii.sqlite layout to `path`
pub async fn seed_dataset(path: &Path, stations: &[&str], measurements: &[MeasurementRow]) {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
        .unwrap()
        .create_if_missing(true);
    let mut conn = SqliteConnection::connect_with(&options)
        .await
        .expect("Failed to create test dataset");

    sqlx::query(
        "CREATE TABLE station (
            id INTEGER NOT NULL PRIMARY KEY,
            station TEXT,
            name TEXT,
            latitude FLOAT,
            longitude FLOAT,
            elevation FLOAT
        )",
    )
    .execute(&mut conn)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TABLE measurement (
            id INTEGER NOT NULL PRIMARY KEY,
            station TEXT,
            date TEXT,
            prcp FLOAT,
            tobs FLOAT
        )",
    )
    .execute(&mut conn)
    .await
    .unwrap();

    for (id, station) in stations.iter().enumerate() {
        sqlx::query(
            "INSERT INTO station (id, station, name, latitude, longitude, elevation)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id as i64 + 1)
        .bind(*station)
        .bind(format!("{} STATION, HI US", station))
        .bind(21.2716)
        .bind(-157.8168)
        .bind(3.0)
        .execute(&mut conn)
        .await
        .unwrap();
    }

    for (id, (station, date, prcp, tobs)) in measurements.iter().enumerate() {
        sqlx::query(
            "INSERT INTO measurement (id, station, date, prcp, tobs) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id as i64 + 1)
        .bind(*station)
        .bind(*date)
        .bind(*prcp)
        .bind(*tobs)
        .execute(&mut conn)
        .await
        .unwrap();
    }

    conn.close().await.unwrap();
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(STATIONS, MEASUREMENTS, 2).await
}

pub async fn spawn_app_with(
    stations: &[&str],
    measurements: &[MeasurementRow],
    max_connections: u32,
) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hawaii.sqlite");
    seed_dataset(&path, stations, measurements).await;

    let store = Arc::new(
        ClimateStore::new(path.to_str().unwrap(), max_connections)
            .await
            .expect("Failed to open test dataset"),
    );
    let app = app(build_app_state(
        String::from("http://127.0.0.1:5000"),
        store.clone(),
    ));

    TestApp {
        app,
        store,
        _dir: dir,
    }
}

pub fn spawn_mock_app(climate_data: MockClimateAccess) -> Router {
    app(build_app_state(
        String::from("http://127.0.0.1:5000"),
        Arc::new(climate_data),
    ))
}

/// GET `uri` and return the status with the raw body
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request.");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "{} did not return json ({}): {}",
            uri,
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}
