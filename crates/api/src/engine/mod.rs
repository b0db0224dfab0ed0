//! Aggregations over the observation dataset: the trailing-year window, the
//! most active station and the four read-only views served by the API.

pub mod queries;
pub mod ranking;
pub mod stats;
pub mod window;

pub use queries::*;
pub use ranking::*;
pub use stats::*;
pub use window::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::db;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No observations found in the dataset")]
    NoData,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDateFormat(String),
    #[error("Climate store unavailable: {0}")]
    StoreUnavailable(#[from] db::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::InvalidDateFormat(_) => StatusCode::BAD_REQUEST,
            Error::NoData | Error::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
