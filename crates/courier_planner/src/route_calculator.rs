use courier_providers::{Coordinate, RoutingService, ServiceError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("A route needs at least 2 waypoints, got {0}")]
    InsufficientWaypoints(usize),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Path from the origin through the sorted destinations. Never empty, the
/// first point is the first waypoint the route was requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    points: Vec<Coordinate>,
}

impl RouteGeometry {
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn start(&self) -> Coordinate {
        self.points[0]
    }
}

pub struct RouteCalculator<S> {
    service: S,
}

impl<S: RoutingService> RouteCalculator<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub async fn calculate_route(&self, waypoints: &[Coordinate]) -> Result<RouteGeometry, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::InsufficientWaypoints(waypoints.len()));
        }

        let mut points = self.service.fetch_route(waypoints).await?;

        let start = waypoints[0];
        match points.first() {
            None => return Err(ServiceError::IncompleteResponse.into()),
            // services snap to the road network, pin the path to the origin
            Some(first) if *first != start => points.insert(0, start),
            Some(_) => {}
        }

        debug!(
            "Calculated route through {} waypoints with {} points",
            waypoints.len(),
            points.len()
        );

        Ok(RouteGeometry { points })
    }
}
