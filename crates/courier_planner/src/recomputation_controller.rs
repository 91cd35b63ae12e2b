use std::sync::Arc;

use courier_providers::{RoutingService, ServiceError, TravelTimeService};
use parking_lot::Mutex;
use tokio::{
    sync::{broadcast, mpsc::UnboundedReceiver},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    coordinate_store::{StoreEvent, StoreSnapshot},
    destination_sorter::DestinationSorter,
    route_calculator::{RouteCalculator, RouteError, RouteGeometry},
};

const EVENTS_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputationState {
    Idle,
    Sorting,
    Routing,
    Published,
}

#[derive(Debug, Clone)]
pub enum RouteEvent {
    /// `None` clears the rendered route.
    RoutePublished {
        generation: u64,
        geometry: Option<RouteGeometry>,
    },
    ComputationFailed {
        generation: u64,
        error: Arc<ServiceError>,
    },
}

#[derive(Debug)]
pub enum ComputationOutcome {
    Published(RouteGeometry),
    Cleared,
    Failed(Arc<ServiceError>),
    /// A newer trigger started before this computation finished.
    StaleResultDiscarded,
}

impl ComputationOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, ComputationOutcome::StaleResultDiscarded)
    }
}

struct ControllerState {
    generation: u64,
    status: ComputationState,
    /// Latest generation superseded while it was sorting or routing.
    cancelled: Option<u64>,
    published: Option<RouteGeometry>,
}

struct ControllerInner<T, R> {
    sorter: DestinationSorter<T>,
    calculator: RouteCalculator<R>,
    state: Mutex<ControllerState>,
    events: broadcast::Sender<RouteEvent>,
}

/// Recomputes the route whenever the coordinates change.
///
/// Every trigger bumps the generation. A computation re-checks its
/// generation after sorting and before publishing, under the same lock
/// that guards the published geometry, so a superseded computation can
/// finish its network calls but never overwrite a newer result. The
/// superseded generation is remembered in `last_cancelled`, the status
/// itself moves straight on to the new computation.
pub struct RecomputationController<T, R> {
    inner: Arc<ControllerInner<T, R>>,
}

impl<T, R> Clone for RecomputationController<T, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, R> RecomputationController<T, R>
where
    T: TravelTimeService + 'static,
    R: RoutingService + 'static,
{
    pub fn new(sorter: DestinationSorter<T>, calculator: RouteCalculator<R>) -> Self {
        let (events, _) = broadcast::channel(EVENTS_CAPACITY);

        Self {
            inner: Arc::new(ControllerInner {
                sorter,
                calculator,
                state: Mutex::new(ControllerState {
                    generation: 0,
                    status: ComputationState::Idle,
                    cancelled: None,
                    published: None,
                }),
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RouteEvent> {
        self.inner.events.subscribe()
    }

    pub fn status(&self) -> ComputationState {
        self.inner.state.lock().status
    }

    pub fn generation(&self) -> u64 {
        self.inner.state.lock().generation
    }

    pub fn last_cancelled(&self) -> Option<u64> {
        self.inner.state.lock().cancelled
    }

    pub fn current_geometry(&self) -> Option<RouteGeometry> {
        self.inner.state.lock().published.clone()
    }

    /// Starts a computation for `snapshot`, cancelling the one in flight.
    /// Must be called from within a tokio runtime.
    pub fn trigger(&self, snapshot: StoreSnapshot) -> JoinHandle<ComputationOutcome> {
        let generation = {
            let mut state = self.inner.state.lock();

            if matches!(
                state.status,
                ComputationState::Sorting | ComputationState::Routing
            ) {
                debug!("Cancelling computation {}", state.generation);
                state.cancelled = Some(state.generation);
            }

            state.generation += 1;
            let generation = state.generation;

            if snapshot.destinations.is_empty() {
                self.inner.publish_locked(&mut state, generation, None);
                return tokio::spawn(std::future::ready(ComputationOutcome::Cleared));
            }

            state.status = ComputationState::Sorting;
            generation
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.compute(generation, snapshot).await })
    }

    /// Triggers a computation for every store event until the store goes
    /// away.
    pub async fn listen(&self, mut store_events: UnboundedReceiver<StoreEvent>) {
        while let Some(event) = store_events.recv().await {
            debug!("Store event {:?}", event.kind);
            self.trigger(event.snapshot);
        }
    }
}

impl<T, R> ControllerInner<T, R>
where
    T: TravelTimeService,
    R: RoutingService,
{
    async fn compute(&self, generation: u64, snapshot: StoreSnapshot) -> ComputationOutcome {
        let sorted = match self
            .sorter
            .sort(snapshot.origin, &snapshot.destinations)
            .await
        {
            Ok(sorted) => sorted,
            Err(error) => return self.fail(generation, error),
        };

        {
            let mut state = self.state.lock();
            if state.generation != generation {
                debug!("Discarding sorted destinations of computation {}", generation);
                return ComputationOutcome::StaleResultDiscarded;
            }
            state.status = ComputationState::Routing;
        }

        let mut waypoints = Vec::with_capacity(sorted.len() + 1);
        waypoints.push(snapshot.origin);
        waypoints.extend(sorted);

        match self.calculator.calculate_route(&waypoints).await {
            Ok(geometry) => self.publish(generation, Some(geometry)),
            Err(RouteError::InsufficientWaypoints(_)) => self.publish(generation, None),
            Err(RouteError::Service(error)) => self.fail(generation, error),
        }
    }

    fn publish(&self, generation: u64, geometry: Option<RouteGeometry>) -> ComputationOutcome {
        let mut state = self.state.lock();
        if state.generation != generation {
            debug!("Discarding route of computation {}", generation);
            return ComputationOutcome::StaleResultDiscarded;
        }

        self.publish_locked(&mut state, generation, geometry)
    }

    fn publish_locked(
        &self,
        state: &mut ControllerState,
        generation: u64,
        geometry: Option<RouteGeometry>,
    ) -> ComputationOutcome {
        state.status = ComputationState::Published;
        state.published = geometry.clone();

        match &geometry {
            Some(geometry) => info!(
                "Publishing route of computation {} with {} points",
                generation,
                geometry.points().len()
            ),
            None => info!("Clearing route for computation {}", generation),
        }

        // no receivers is fine
        let _ = self.events.send(RouteEvent::RoutePublished {
            generation,
            geometry: geometry.clone(),
        });

        match geometry {
            Some(geometry) => ComputationOutcome::Published(geometry),
            None => ComputationOutcome::Cleared,
        }
    }

    fn fail(&self, generation: u64, error: ServiceError) -> ComputationOutcome {
        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(
                "Discarding failure of computation {}: {}",
                generation, error
            );
            return ComputationOutcome::StaleResultDiscarded;
        }

        warn!("Computation {} failed: {}", generation, error);
        state.status = ComputationState::Idle;

        let error = Arc::new(error);
        let _ = self.events.send(RouteEvent::ComputationFailed {
            generation,
            error: Arc::clone(&error),
        });

        ComputationOutcome::Failed(error)
    }
}
