use courier_providers::{Coordinate, ServiceError, TravelTimeService};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelTimeEstimate {
    pub destination: Coordinate,
    pub seconds: f64,
}

/// One-origin travel time matrix on top of a [`TravelTimeService`].
///
/// The estimates come back in the order of the requested destinations. A
/// response with a different number of values than requested is an error,
/// it is never truncated or padded. There is no retry at this level.
pub struct TravelTimeMatrixClient<S> {
    service: S,
}

impl<S: TravelTimeService> TravelTimeMatrixClient<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn estimate_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<TravelTimeEstimate>, ServiceError> {
        let times = self
            .service
            .fetch_travel_times(origin, destinations)
            .await?;

        if times.len() != destinations.len() {
            return Err(ServiceError::MismatchedLength {
                expected: destinations.len(),
                actual: times.len(),
            });
        }

        if times.iter().any(|seconds| seconds.is_nan()) {
            return Err(ServiceError::IncompleteResponse);
        }

        debug!("Estimated travel times for {} destinations", times.len());

        Ok(destinations
            .iter()
            .zip(times)
            .map(|(destination, seconds)| TravelTimeEstimate {
                destination: *destination,
                seconds,
            })
            .collect())
    }
}
