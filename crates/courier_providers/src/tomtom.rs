use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    coordinate::Coordinate,
    error::{ServiceError, read_body},
    service::{RoutingService, TravelTimeService},
};

pub const TOMTOM_MATRIX_API_URL: &str = "https://api.tomtom.com/routing/matrix/2";
pub const TOMTOM_CALCULATE_ROUTE_API_URL: &str = "https://api.tomtom.com/routing/1/calculateRoute";

pub struct TomTomClientParams {
    pub api_key: String,
    pub timeout: Option<Duration>,
}

#[derive(Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct TomTomPoint {
    latitude: f64,
    longitude: f64,
}

impl From<&Coordinate> for TomTomPoint {
    fn from(coordinate: &Coordinate) -> Self {
        TomTomPoint {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }
}

#[derive(Serialize)]
struct MatrixLocation {
    point: TomTomPoint,
}

#[derive(Serialize)]
struct MatrixRequestBody {
    origins: Vec<MatrixLocation>,
    destinations: Vec<MatrixLocation>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixResponse {
    data: Vec<MatrixCell>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatrixCell {
    destination_index: usize,
    route_summary: Option<RouteSummary>,
    detailed_error: Option<DetailedError>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteSummary {
    travel_time_in_seconds: f64,
}

#[derive(Deserialize)]
struct DetailedError {
    code: String,
    message: String,
}

#[derive(Deserialize)]
struct CalculateRouteResponse {
    #[serde(default)]
    routes: Vec<CalculatedRoute>,
}

#[derive(Deserialize)]
struct CalculatedRoute {
    legs: Vec<RouteLeg>,
}

#[derive(Deserialize)]
struct RouteLeg {
    points: Vec<TomTomPoint>,
}

pub struct TomTomClient {
    params: TomTomClientParams,
    client: reqwest::Client,
}

impl TomTomClient {
    pub fn new(params: TomTomClientParams) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            params,
            client: builder.build()?,
        })
    }
}

impl TravelTimeService for TomTomClient {
    async fn fetch_travel_times(
        &self,
        origin: Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>, ServiceError> {
        let body = MatrixRequestBody {
            origins: vec![MatrixLocation {
                point: (&origin).into(),
            }],
            destinations: destinations
                .iter()
                .map(|destination| MatrixLocation {
                    point: destination.into(),
                })
                .collect(),
        };

        debug!(
            "TomTomApi: Posting matrix request for {} destinations",
            destinations.len()
        );

        let response = self
            .client
            .post(TOMTOM_MATRIX_API_URL)
            .query(&[("key", &self.params.api_key)])
            .json(&body)
            .send()
            .await?;

        let body = read_body(response).await?;
        parse_matrix_response(&body, destinations.len())
    }
}

impl RoutingService for TomTomClient {
    async fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<Vec<Coordinate>, ServiceError> {
        let locations = waypoints
            .iter()
            .map(|waypoint| format!("{},{}", waypoint.latitude(), waypoint.longitude()))
            .collect::<Vec<_>>()
            .join(":");

        debug!(
            "TomTomApi: Calculating route through {} waypoints",
            waypoints.len()
        );

        let response = self
            .client
            .get(format!("{}/{}/json", TOMTOM_CALCULATE_ROUTE_API_URL, locations))
            .query(&[("key", &self.params.api_key)])
            .send()
            .await?;

        let body = read_body(response).await?;
        parse_route_response(&body)
    }
}

fn parse_matrix_response(body: &str, expected: usize) -> Result<Vec<f64>, ServiceError> {
    let response: MatrixResponse = serde_json::from_str(body)?;

    if response.data.len() != expected {
        return Err(ServiceError::MismatchedLength {
            expected,
            actual: response.data.len(),
        });
    }

    let mut times: Vec<Option<f64>> = vec![None; expected];

    for cell in response.data {
        if let Some(error) = cell.detailed_error {
            warn!(
                "TomTomApi: destination {} failed: {} - {}",
                cell.destination_index, error.code, error.message
            );
            return Err(ServiceError::NoRoute);
        }

        let slot = times
            .get_mut(cell.destination_index)
            .ok_or(ServiceError::IncompleteResponse)?;
        let summary = cell.route_summary.ok_or(ServiceError::IncompleteResponse)?;
        *slot = Some(summary.travel_time_in_seconds);
    }

    times
        .into_iter()
        .map(|time| time.ok_or(ServiceError::IncompleteResponse))
        .collect()
}

fn parse_route_response(body: &str) -> Result<Vec<Coordinate>, ServiceError> {
    let response: CalculateRouteResponse = serde_json::from_str(body)?;
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(ServiceError::NoRoute)?;

    let mut path: Vec<Coordinate> = Vec::new();
    for point in route.legs.iter().flat_map(|leg| leg.points.iter()) {
        let coordinate = Coordinate::from_lat_lon_unchecked(point.latitude, point.longitude);
        // legs share their boundary point
        if path.last() != Some(&coordinate) {
            path.push(coordinate);
        }
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matrix_response_orders_by_destination_index() {
        let body = r#"{
            "data": [
                {"originIndex": 0, "destinationIndex": 1, "routeSummary": {"lengthInMeters": 900, "travelTimeInSeconds": 120}},
                {"originIndex": 0, "destinationIndex": 0, "routeSummary": {"lengthInMeters": 1500, "travelTimeInSeconds": 300}}
            ],
            "statistics": {"totalCount": 2, "successes": 2, "failures": 0}
        }"#;

        assert_eq!(parse_matrix_response(body, 2).unwrap(), vec![300.0, 120.0]);
    }

    #[test]
    fn test_parse_matrix_response_mismatched_length() {
        let body = r#"{
            "data": [
                {"originIndex": 0, "destinationIndex": 0, "routeSummary": {"travelTimeInSeconds": 300}}
            ]
        }"#;

        assert!(matches!(
            parse_matrix_response(body, 2),
            Err(ServiceError::MismatchedLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_parse_matrix_response_cell_error() {
        let body = r#"{
            "data": [
                {"originIndex": 0, "destinationIndex": 0, "detailedError": {"code": "MAP_MATCHING_FAILURE", "message": "Point not on road"}}
            ]
        }"#;

        assert!(matches!(
            parse_matrix_response(body, 1),
            Err(ServiceError::NoRoute)
        ));
    }

    #[test]
    fn test_parse_matrix_response_duplicate_index() {
        let body = r#"{
            "data": [
                {"originIndex": 0, "destinationIndex": 0, "routeSummary": {"travelTimeInSeconds": 300}},
                {"originIndex": 0, "destinationIndex": 0, "routeSummary": {"travelTimeInSeconds": 120}}
            ]
        }"#;

        assert!(matches!(
            parse_matrix_response(body, 2),
            Err(ServiceError::IncompleteResponse)
        ));
    }

    #[test]
    fn test_parse_route_response_joins_legs() {
        let body = r#"{
            "routes": [{
                "summary": {"travelTimeInSeconds": 420},
                "legs": [
                    {"points": [{"latitude": 51.504, "longitude": -0.1129}, {"latitude": 51.5, "longitude": -0.1}]},
                    {"points": [{"latitude": 51.5, "longitude": -0.1}, {"latitude": 51.51, "longitude": -0.12}]}
                ]
            }]
        }"#;

        let path = parse_route_response(body).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Coordinate::new(51.504, -0.1129).unwrap());
        assert_eq!(path[2], Coordinate::new(51.51, -0.12).unwrap());
    }
}
