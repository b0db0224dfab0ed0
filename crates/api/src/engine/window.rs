use time::{Date, Duration};

use super::Error;
use crate::db::ClimateSession;

/// Length of the "last year" window used by the precipitation and tobs views.
pub const TRAILING_YEAR_DAYS: u32 = 365;

/// Inclusive date range `[start, end]` anchored on the latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Date,
    pub end: Date,
}

impl DateWindow {
    /// Window of `days` calendar days ending at `end`.
    pub fn ending_at(end: Date, days: u32) -> Self {
        Self {
            start: end.saturating_sub(Duration::days(i64::from(days))),
            end,
        }
    }
}

/// Most recent observation date across every station.
pub async fn latest_date(session: &mut dyn ClimateSession) -> Result<Date, Error> {
    session.latest_date().await?.ok_or(Error::NoData)
}

pub async fn trailing_window(
    session: &mut dyn ClimateSession,
    days: u32,
) -> Result<DateWindow, Error> {
    let end = latest_date(session).await?;
    Ok(DateWindow::ending_at(end, days))
}
