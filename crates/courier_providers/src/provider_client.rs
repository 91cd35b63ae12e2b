use tracing::{info, warn};

use crate::{
    as_the_crow_flies::AsTheCrowFlies,
    cache::{CachedTravelTimes, FileCache},
    config::ProviderConfig,
    coordinate::Coordinate,
    error::ServiceError,
    osrm::{OsrmClient, OsrmClientParams},
    routing_provider::RoutingProvider,
    service::{RoutingService, TravelTimeService},
    tomtom::{TomTomClient, TomTomClientParams},
};

pub enum ProviderBackend {
    TomTom(TomTomClient),
    Osrm(OsrmClient),
    AsTheCrowFlies(AsTheCrowFlies),
}

impl ProviderBackend {
    pub fn new(provider: &RoutingProvider, config: &ProviderConfig) -> anyhow::Result<Self> {
        let backend = match provider {
            RoutingProvider::TomTom => {
                let api_key = config.tomtom_api_key.clone().ok_or_else(|| {
                    anyhow::anyhow!(
                        "{} must be set to use the TomTom provider",
                        crate::config::TOMTOM_API_KEY_ENV_VAR
                    )
                })?;

                ProviderBackend::TomTom(TomTomClient::new(TomTomClientParams {
                    api_key,
                    timeout: config.request_timeout,
                })?)
            }
            RoutingProvider::Osrm { url } => ProviderBackend::Osrm(OsrmClient::new(OsrmClientParams {
                osrm_url: url.clone(),
                timeout: config.request_timeout,
            })?),
            RoutingProvider::AsTheCrowFlies { speed_kmh } => {
                ProviderBackend::AsTheCrowFlies(AsTheCrowFlies::new(*speed_kmh))
            }
        };

        Ok(backend)
    }
}

impl TravelTimeService for ProviderBackend {
    async fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        match self {
            ProviderBackend::TomTom(client) => client.fetch_travel_times(origin, destinations).await,
            ProviderBackend::Osrm(client) => client.fetch_travel_times(origin, destinations).await,
            ProviderBackend::AsTheCrowFlies(client) => {
                client.fetch_travel_times(origin, destinations).await
            }
        }
    }
}

impl RoutingService for ProviderBackend {
    async fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ServiceError> {
        match self {
            ProviderBackend::TomTom(client) => client.fetch_route(waypoints).await,
            ProviderBackend::Osrm(client) => client.fetch_route(waypoints).await,
            ProviderBackend::AsTheCrowFlies(client) => client.fetch_route(waypoints).await,
        }
    }
}

/// The travel time and routing services for one configured provider.
pub struct ProviderClient {
    travel_times: CachedTravelTimes<ProviderBackend>,
    routing: ProviderBackend,
}

impl ProviderClient {
    pub fn new(provider: RoutingProvider, config: &ProviderConfig) -> anyhow::Result<Self> {
        let cache = match &config.cache_folder {
            Some(folder) => match FileCache::new(folder) {
                Ok(cache) => Some(cache),
                Err(err) => {
                    warn!("Travel times cache disabled: {}", err);
                    None
                }
            },
            None => None,
        };

        info!("Using routing provider {}", provider);

        Ok(Self {
            travel_times: CachedTravelTimes::new(
                ProviderBackend::new(&provider, config)?,
                cache,
                provider.clone(),
            ),
            routing: ProviderBackend::new(&provider, config)?,
        })
    }
}

impl TravelTimeService for ProviderClient {
    async fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        self.travel_times
            .fetch_travel_times(origin, destinations)
            .await
    }
}

impl RoutingService for ProviderClient {
    async fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ServiceError> {
        self.routing.fetch_route(waypoints).await
    }
}
