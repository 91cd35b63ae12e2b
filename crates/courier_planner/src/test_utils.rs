use std::{
    collections::VecDeque,
    sync::atomic::{AtomicBool, Ordering},
};

use courier_providers::{Coordinate, RoutingService, ServiceError, TravelTimeService};
use parking_lot::Mutex;
use tokio::sync::oneshot;

pub fn coordinate(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

fn unavailable() -> ServiceError {
    ServiceError::Api {
        status: 503,
        message: String::from("Service unavailable"),
    }
}

/// Returns the same raw times whatever the request.
pub struct FixedTimes(pub Vec<f64>);

impl TravelTimeService for FixedTimes {
    async fn fetch_travel_times(
        &self,
        _origin: Coordinate,
        _destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        Ok(self.0.clone())
    }
}

/// Gates are handed out per call, in call order. A call that receives a
/// gate does not answer until the matching sender fires (or is dropped).
#[derive(Default)]
struct Gates {
    calls: usize,
    pending: VecDeque<Option<oneshot::Receiver<()>>>,
}

impl Gates {
    fn next(&mut self) -> Option<oneshot::Receiver<()>> {
        self.calls += 1;
        self.pending.pop_front().flatten()
    }
}

/// Travel times looked up per destination, unknown destinations take 0s.
pub struct StubTravelTimes {
    lookup: Vec<(Coordinate, f64)>,
    gates: Mutex<Gates>,
    fail: AtomicBool,
}

impl StubTravelTimes {
    pub fn new(lookup: Vec<(Coordinate, f64)>) -> Self {
        Self {
            lookup,
            gates: Mutex::new(Gates::default()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn with_gates(self, gates: Vec<Option<oneshot::Receiver<()>>>) -> Self {
        self.gates.lock().pending = gates.into();
        self
    }

    pub fn calls(&self) -> usize {
        self.gates.lock().calls
    }
}

impl TravelTimeService for StubTravelTimes {
    async fn fetch_travel_times(
        &self,
        _origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        let gate = self.gates.lock().next();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        Ok(destinations
            .iter()
            .map(|destination| {
                self.lookup
                    .iter()
                    .find(|(coordinate, _)| coordinate == destination)
                    .map(|(_, seconds)| *seconds)
                    .unwrap_or(0.0)
            })
            .collect())
    }
}

/// Echoes the waypoints back as the path unless a fixed path is set, and
/// records every request.
#[derive(Default)]
pub struct StubRouting {
    path: Option<Vec<Coordinate>>,
    requests: Mutex<Vec<Vec<Coordinate>>>,
    gates: Mutex<Gates>,
    fail: AtomicBool,
}

impl StubRouting {
    pub fn returning(path: Vec<Coordinate>) -> Self {
        Self {
            path: Some(path),
            ..Self::default()
        }
    }

    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_gates(self, gates: Vec<Option<oneshot::Receiver<()>>>) -> Self {
        self.gates.lock().pending = gates.into();
        self
    }

    pub fn calls(&self) -> usize {
        self.gates.lock().calls
    }

    pub fn requests(&self) -> Vec<Vec<Coordinate>> {
        self.requests.lock().clone()
    }
}

impl RoutingService for StubRouting {
    async fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ServiceError> {
        self.requests.lock().push(waypoints.to_vec());

        let gate = self.gates.lock().next();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        Ok(self.path.clone().unwrap_or_else(|| waypoints.to_vec()))
    }
}
