use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::{
    coordinate::Coordinate,
    error::{ServiceError, read_body},
    service::{RoutingService, TravelTimeService},
};

pub const OSRM_TABLE_API_PATH: &str = "/table/v1/driving/";
pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/driving/";
pub const OSRM_DEFAULT_URL: &str = "https://router.project-osrm.org";

pub struct OsrmClientParams {
    pub osrm_url: String,
    pub timeout: Option<Duration>,
}

#[derive(Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    /// Travel times in seconds, one row per source
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

pub struct OsrmClient {
    params: OsrmClientParams,
    client: reqwest::Client,
}

impl OsrmClient {
    pub fn new(params: OsrmClientParams) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            params,
            client: builder.build()?,
        })
    }

    fn url(&self, path: &str, points: &[Coordinate]) -> String {
        let mut url = self.params.osrm_url.trim_end_matches('/').to_string();
        url.push_str(path);

        for (i, point) in points.iter().enumerate() {
            url.push_str(&format!("{},{}", point.longitude(), point.latitude()));

            if i < points.len() - 1 {
                url.push(';');
            }
        }

        url
    }
}

impl TravelTimeService for OsrmClient {
    async fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        let mut points = Vec::with_capacity(destinations.len() + 1);
        points.push(origin);
        points.extend_from_slice(destinations);

        let destination_indices = (1..points.len())
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(";");

        debug!(
            "OsrmApi: Requesting travel times for {} destinations",
            destinations.len()
        );

        let response = self
            .client
            .get(self.url(OSRM_TABLE_API_PATH, &points))
            .query(&[
                ("sources", "0"),
                ("destinations", destination_indices.as_str()),
                ("annotations", "duration"),
            ])
            .send()
            .await?;

        let body = read_body(response).await?;
        parse_table_response(&body)
    }
}

impl RoutingService for OsrmClient {
    async fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ServiceError> {
        debug!("OsrmApi: Requesting route through {} waypoints", waypoints.len());

        let response = self
            .client
            .get(self.url(OSRM_ROUTE_API_PATH, waypoints))
            .query(&[("overview", "full"), ("geometries", "geojson")])
            .send()
            .await?;

        let body = read_body(response).await?;
        parse_route_response(&body)
    }
}

fn check_code(code: &str, message: Option<String>) -> Result<(), ServiceError> {
    match code {
        "Ok" => Ok(()),
        "NoRoute" | "NoTable" | "NoSegment" => Err(ServiceError::NoRoute),
        other => Err(ServiceError::Api {
            status: 200,
            message: message.unwrap_or_else(|| other.to_string()),
        }),
    }
}

fn parse_table_response(body: &str) -> Result<Vec<f64>, ServiceError> {
    let response: OsrmTableResponse = serde_json::from_str(body)?;
    check_code(&response.code, response.message)?;

    let row = response
        .durations
        .and_then(|rows| rows.into_iter().next())
        .ok_or(ServiceError::IncompleteResponse)?;

    row.into_iter()
        .map(|duration| duration.ok_or(ServiceError::NoRoute))
        .collect()
}

fn parse_route_response(body: &str) -> Result<Vec<Coordinate>, ServiceError> {
    let response: OsrmRouteResponse = serde_json::from_str(body)?;
    check_code(&response.code, response.message)?;

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(ServiceError::NoRoute)?;

    Ok(route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lon, lat]| Coordinate::from_lat_lon_unchecked(lat, lon))
        .collect())
}
