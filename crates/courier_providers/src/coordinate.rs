use std::{fmt::Display, str::FromStr};

use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("latitude {0} is outside of [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("coordinate component is not a finite number")]
    NotFinite,

    #[error("cannot parse coordinate from \"{0}\", expected \"lat,lon\"")]
    Malformed(String),
}

/// A WGS84 position. Latitude is bounded to [-90, 90], longitude is only
/// required to be finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ValidationError::NotFinite);
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds a coordinate without any bounds check. Used for positions
    /// decoded from routing services, which are trusted.
    pub(crate) fn from_lat_lon_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, to: &Coordinate) -> f64 {
        Haversine.distance(geo_types::Point::from(self), geo_types::Point::from(to))
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = input
            .split_once(',')
            .ok_or_else(|| ValidationError::Malformed(input.to_string()))?;

        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::Malformed(input.to_string()))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::Malformed(input.to_string()))?;

        Coordinate::new(lat, lon)
    }
}

impl From<&Coordinate> for geo_types::Point<f64> {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl From<Coordinate> for geo_types::Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        (&coordinate).into()
    }
}

impl From<&Coordinate> for geo_types::Coord<f64> {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Coord {
            x: coordinate.longitude,
            y: coordinate.latitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_latitude_out_of_range() {
        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(ValidationError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            Coordinate::new(-90.5, 0.0),
            Err(ValidationError::LatitudeOutOfRange(-90.5))
        );
    }

    #[test]
    fn test_longitude_is_unconstrained() {
        let coordinate = Coordinate::new(45.0, 200.0).unwrap();
        assert_eq!(coordinate.longitude(), 200.0);
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(
            Coordinate::new(f64::NAN, 0.0),
            Err(ValidationError::NotFinite)
        );
        assert_eq!(
            Coordinate::new(0.0, f64::INFINITY),
            Err(ValidationError::NotFinite)
        );
    }

    #[test]
    fn test_deserialize_validates_latitude() {
        let coordinate: Coordinate =
            serde_json::from_str(r#"{"latitude":51.504,"longitude":-0.1129}"#).unwrap();
        assert_eq!(coordinate, Coordinate::new(51.504, -0.1129).unwrap());

        let error = serde_json::from_str::<Coordinate>(r#"{"latitude":91.0,"longitude":0.0}"#)
            .unwrap_err();
        assert!(error.to_string().contains("outside of [-90, 90]"), "{error}");

        assert!(
            serde_json::from_str::<Coordinate>(r#"{"latitude":45.0,"longitude":200.0}"#).is_ok()
        );
    }

    #[test]
    fn test_parse() {
        let coordinate: Coordinate = "51.504, -0.1129".parse().unwrap();
        assert_eq!(coordinate.latitude(), 51.504);
        assert_eq!(coordinate.longitude(), -0.1129);

        assert!("51.504".parse::<Coordinate>().is_err());
        assert!("abc,1".parse::<Coordinate>().is_err());
        assert!("95,1".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_point_axis_order() {
        let coordinate = Coordinate::new(51.5, -0.12).unwrap();
        let point: geo_types::Point = (&coordinate).into();
        assert_eq!(point.x(), -0.12);
        assert_eq!(point.y(), 51.5);
    }

    #[test]
    fn test_haversine_distance() {
        let a = Coordinate::new(51.504, -0.1129).unwrap();
        let b = Coordinate::new(51.51, -0.12).unwrap();

        let distance = a.haversine_distance(&b);
        assert!(distance > 800.0 && distance < 950.0, "{distance}");
        assert_eq!(a.haversine_distance(&a), 0.0);
    }
}
