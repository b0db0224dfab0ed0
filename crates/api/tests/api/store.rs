use crate::helpers::{seed_dataset, spawn_app, MEASUREMENTS, STATIONS};
use climate_api::{ClimateData, ClimateStore, DatasetSummary, ObservationFilter};
use time::macros::date;

#[tokio::test]
async fn missing_dataset_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.sqlite");

    let result = ClimateStore::new(path.to_str().unwrap(), 1).await;

    assert!(result.is_err());
    assert!(!path.exists());
}

#[tokio::test]
async fn dataset_without_tables_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hawaii.sqlite");
    std::fs::write(&path, b"").unwrap();

    assert!(ClimateStore::new(path.to_str().unwrap(), 1).await.is_err());
}

#[tokio::test]
async fn summary_counts_rows() {
    let test_app = spawn_app().await;

    let summary = test_app.store.summary().await.unwrap();

    assert_eq!(
        summary,
        DatasetSummary {
            stations: STATIONS.len() as i64,
            observations: MEASUREMENTS.len() as i64,
        }
    );
}

#[tokio::test]
async fn session_aggregates_match_listing() {
    let test_app = spawn_app().await;
    let mut session = test_app.store.session().await.unwrap();

    assert_eq!(
        session.latest_date().await.unwrap(),
        Some(date!(2017 - 08 - 23))
    );

    let mut counts = session.observation_counts().await.unwrap();
    counts.sort_by(|a, b| a.station.cmp(&b.station));
    let counts: Vec<(&str, i64)> = counts
        .iter()
        .map(|c| (c.station.as_str(), c.observations))
        .collect();
    assert_eq!(counts, vec![("USC001", 11), ("USC002", 3)]);
}

#[tokio::test]
async fn observations_are_filtered_and_ordered() {
    let test_app = spawn_app().await;
    let mut session = test_app.store.session().await.unwrap();

    let january = session
        .list_observations(&ObservationFilter::between(
            date!(2017 - 01 - 01),
            Some(date!(2017 - 01 - 31)),
        ))
        .await
        .unwrap();
    let temps: Vec<Option<f64>> = january.iter().map(|o| o.tobs).collect();
    assert_eq!(
        temps,
        vec![Some(60.0), Some(62.0), Some(58.0), Some(64.0), Some(61.0)]
    );

    let last_day = session
        .list_observations(&ObservationFilter::since(date!(2017 - 08 - 23)))
        .await
        .unwrap();
    let stations: Vec<&str> = last_day.iter().map(|o| o.station.as_str()).collect();
    assert_eq!(stations, vec!["USC001", "USC002"]);

    let usc002 = session
        .list_observations(&ObservationFilter::default().for_station("USC002"))
        .await
        .unwrap();
    assert_eq!(usc002.len(), 3);
    assert!(usc002.iter().all(|o| o.station == "USC002"));
}

#[tokio::test]
async fn stations_come_back_in_catalog_order() {
    let test_app = spawn_app().await;
    let mut session = test_app.store.session().await.unwrap();

    let stations = session.list_stations().await.unwrap();

    let codes: Vec<&str> = stations.iter().map(|s| s.station.as_str()).collect();
    assert_eq!(codes, STATIONS);
    assert_eq!(stations[0].name.as_deref(), Some("USC001 STATION, HI US"));
    assert_eq!(stations[0].elevation, Some(3.0));
}

#[tokio::test]
async fn stored_dates_must_be_iso() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hawaii.sqlite");
    seed_dataset(&path, &["USC001"], &[("USC001", "08/23/2017", None, Some(70.0))]).await;

    let store = ClimateStore::new(path.to_str().unwrap(), 1).await.unwrap();
    let mut session = store.session().await.unwrap();

    assert!(matches!(
        session.latest_date().await,
        Err(climate_api::db::Error::StoredDate(_))
    ));
}
