pub mod db;
pub mod engine;
pub mod routes;
mod startup;
pub mod templates;
mod utils;

pub use db::{
    ClimateData, ClimateSession, ClimateStore, DatasetSummary, Observation, ObservationFilter,
    Station, StationActivity,
};
pub use engine::{
    DateWindow, Error, QueryEngine, TemperatureReading, TemperatureStats, TRAILING_YEAR_DAYS,
};
pub use routes::*;
pub use startup::*;
pub use utils::*;
