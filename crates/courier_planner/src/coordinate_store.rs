use courier_providers::{Coordinate, ValidationError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

pub const DEFAULT_ORIGIN_LATITUDE: f64 = 51.504;
pub const DEFAULT_ORIGIN_LONGITUDE: f64 = -0.112869;

/// Origin and destinations as they were when a change happened.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub origin: Coordinate,
    pub destinations: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEventKind {
    OriginChanged,
    DestinationAdded,
    Refresh,
}

#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub kind: StoreEventKind,
    pub snapshot: StoreSnapshot,
}

/// Owns the origin and the destinations in insertion order. Every mutation
/// is sent to the subscribers together with a snapshot of the new state.
pub struct CoordinateStore {
    origin: Coordinate,
    destinations: Vec<Coordinate>,
    listeners: Vec<UnboundedSender<StoreEvent>>,
}

impl Default for CoordinateStore {
    fn default() -> Self {
        let origin = Coordinate::new(DEFAULT_ORIGIN_LATITUDE, DEFAULT_ORIGIN_LONGITUDE)
            .expect("default origin is a valid coordinate");
        Self::new(origin)
    }
}

impl CoordinateStore {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            destinations: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn destinations(&self) -> &[Coordinate] {
        &self.destinations
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            origin: self.origin,
            destinations: self.destinations.clone(),
        }
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<StoreEvent> {
        let (sender, receiver) = unbounded_channel();
        self.listeners.push(sender);
        receiver
    }

    /// Replaces the origin. A latitude outside [-90, 90] leaves the store
    /// untouched and notifies nobody.
    pub fn set_origin(&mut self, origin: Coordinate) -> Result<(), ValidationError> {
        if !(-90.0..=90.0).contains(&origin.latitude()) {
            debug!("Rejected origin {}", origin);
            return Err(ValidationError::LatitudeOutOfRange(origin.latitude()));
        }

        self.origin = origin;
        self.notify(StoreEventKind::OriginChanged);
        Ok(())
    }

    /// Input-form entry point for the origin, same policy as [`Self::set_origin`].
    pub fn set_origin_raw(&mut self, latitude: f64, longitude: f64) -> Result<(), ValidationError> {
        let origin = Coordinate::new(latitude, longitude).inspect_err(|err| {
            debug!("Rejected origin input {},{}: {}", latitude, longitude, err);
        })?;
        self.set_origin(origin)
    }

    pub fn add_destination(&mut self, destination: Coordinate) {
        self.destinations.push(destination);
        self.notify(StoreEventKind::DestinationAdded);
    }

    /// Manual trigger: notifies subscribers without changing anything.
    pub fn request_refresh(&mut self) {
        self.notify(StoreEventKind::Refresh);
    }

    fn notify(&mut self, kind: StoreEventKind) {
        let event = StoreEvent {
            kind,
            snapshot: self.snapshot(),
        };

        self.listeners
            .retain(|listener| listener.send(event.clone()).is_ok());
    }
}
