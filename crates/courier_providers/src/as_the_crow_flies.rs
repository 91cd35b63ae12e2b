use crate::{
    coordinate::Coordinate,
    error::ServiceError,
    service::{RoutingService, TravelTimeService},
};

/// Offline provider: straight-line distances travelled at a constant speed.
pub struct AsTheCrowFlies {
    speed_kmh: f64,
}

impl AsTheCrowFlies {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    pub fn travel_time(&self, from: &Coordinate, to: &Coordinate) -> f64 {
        let meters_per_second = self.speed_kmh / 3.6;
        from.haversine_distance(to) / meters_per_second
    }
}

impl TravelTimeService for AsTheCrowFlies {
    async fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        if self.speed_kmh <= 0.0 {
            return Err(ServiceError::NoRoute);
        }

        Ok(destinations
            .iter()
            .map(|destination| self.travel_time(&origin, destination))
            .collect())
    }
}

impl RoutingService for AsTheCrowFlies {
    async fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ServiceError> {
        Ok(waypoints.to_vec())
    }
}
