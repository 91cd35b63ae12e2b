use courier_providers::{Coordinate, ServiceError, TravelTimeService};

use crate::travel_time_matrix::{TravelTimeEstimate, TravelTimeMatrixClient};

/// Orders destinations by travel time from the origin. This is not a tour
/// optimisation, each destination is ranked on its own.
pub struct DestinationSorter<S> {
    client: TravelTimeMatrixClient<S>,
}

impl<S: TravelTimeService> DestinationSorter<S> {
    pub fn new(client: TravelTimeMatrixClient<S>) -> Self {
        Self { client }
    }

    pub async fn sort(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<Coordinate>, ServiceError> {
        Ok(self
            .sorted_estimates(origin, destinations)
            .await?
            .into_iter()
            .map(|estimate| estimate.destination)
            .collect())
    }

    /// Estimates in ascending travel time. Equal times keep their insertion
    /// order. No request is made for an empty destination list.
    pub async fn sorted_estimates(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<TravelTimeEstimate>, ServiceError> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }

        let mut estimates = self
            .client
            .estimate_travel_times(origin, destinations)
            .await?;

        // sort_by is stable
        estimates.sort_by(|a, b| a.seconds.total_cmp(&b.seconds));

        Ok(estimates)
    }
}
