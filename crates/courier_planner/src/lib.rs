pub mod coordinate_store;
pub mod destination_sorter;
pub mod recomputation_controller;
pub mod route_calculator;
pub mod travel_time_matrix;

#[cfg(test)]
pub(crate) mod test_utils;

pub use coordinate_store::{CoordinateStore, StoreEvent, StoreEventKind, StoreSnapshot};
pub use destination_sorter::DestinationSorter;
pub use recomputation_controller::{
    ComputationOutcome, ComputationState, RecomputationController, RouteEvent,
};
pub use route_calculator::{RouteCalculator, RouteError, RouteGeometry};
pub use travel_time_matrix::{TravelTimeEstimate, TravelTimeMatrixClient};
