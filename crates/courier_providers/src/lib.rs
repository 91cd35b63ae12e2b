pub mod as_the_crow_flies;
pub mod cache;
pub mod config;
pub mod coordinate;
pub mod error;
pub mod osrm;
pub mod provider_client;
pub mod routing_provider;
pub mod service;
pub mod tomtom;

pub use coordinate::{Coordinate, ValidationError};
pub use error::ServiceError;
pub use service::{RoutingService, TravelTimeService};
