use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutingProvider {
    /// https://developer.tomtom.com/routing-api/documentation/tomtom-maps/routing-service
    TomTom,
    /// https://project-osrm.org/docs/v5.24.0/api/
    Osrm { url: String },
    AsTheCrowFlies { speed_kmh: f64 },
}

impl std::hash::Hash for RoutingProvider {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            RoutingProvider::TomTom => {
                state.write_u8(0);
            }
            RoutingProvider::Osrm { url } => {
                state.write_u8(1);
                url.hash(state);
            }
            RoutingProvider::AsTheCrowFlies { speed_kmh } => {
                state.write_u8(2);
                state.write_u64(speed_kmh.to_bits());
            }
        }
    }
}

impl Display for RoutingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingProvider::TomTom => write!(f, "tomtom"),
            RoutingProvider::Osrm { url } => write!(f, "osrm ({url})"),
            RoutingProvider::AsTheCrowFlies { speed_kmh } => {
                write!(f, "as the crow flies ({speed_kmh} km/h)")
            }
        }
    }
}
