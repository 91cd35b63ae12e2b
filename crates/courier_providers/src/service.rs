use std::{future::Future, sync::Arc};

use crate::{coordinate::Coordinate, error::ServiceError};

/// One-to-many travel time lookup. Implementations return one value in
/// seconds per destination, in the order the destinations were given.
pub trait TravelTimeService: Send + Sync {
    fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<f64>, ServiceError>> + Send;
}

/// Path lookup through an ordered list of waypoints.
pub trait RoutingService: Send + Sync {
    fn fetch_route(
        &self,
        waypoints: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<Coordinate>, ServiceError>> + Send;
}

impl<T: TravelTimeService> TravelTimeService for Arc<T> {
    fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<f64>, ServiceError>> + Send {
        T::fetch_travel_times(self, origin, destinations)
    }
}

impl<T: RoutingService> RoutingService for Arc<T> {
    fn fetch_route(
        &self,
        waypoints: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<Coordinate>, ServiceError>> + Send {
        T::fetch_route(self, waypoints)
    }
}
