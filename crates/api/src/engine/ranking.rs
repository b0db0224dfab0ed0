use log::debug;

use super::Error;
use crate::db::{ClimateSession, StationActivity};

/// Station with the most observations.
///
/// Ties go to the lexicographically smallest station code so the answer does
/// not depend on the order the store groups rows in.
pub fn select_most_active(activity: &[StationActivity]) -> Option<&StationActivity> {
    activity.iter().max_by(|a, b| {
        a.observations
            .cmp(&b.observations)
            .then_with(|| b.station.cmp(&a.station))
    })
}

pub async fn most_active_station(session: &mut dyn ClimateSession) -> Result<String, Error> {
    let activity = session.observation_counts().await?;
    let leader = select_most_active(&activity)
        .filter(|leader| leader.observations > 0)
        .ok_or(Error::NoData)?;

    debug!(
        "most active station: {} ({} observations)",
        leader.station, leader.observations
    );
    Ok(leader.station.clone())
}
