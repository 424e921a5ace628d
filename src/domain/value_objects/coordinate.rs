//! # Coordinates
//!
//! Geographic coordinates and the haversine great-circle distance.
//!
//! # Examples
//!
//! ```
//! use petspot_core::domain::value_objects::coordinate::{Coordinate, distance};
//!
//! let madrid = Coordinate::new(40.4168, -3.7038).unwrap();
//! let same = Coordinate::new(40.4168, -3.7038).unwrap();
//! assert_eq!(distance(madrid, same), 0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mean Earth radius used by [`distance`], in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Error returned when a coordinate is outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude out of range: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude out of range: {0}")]
    InvalidLongitude(f64),
}

/// A latitude/longitude pair in degrees.
///
/// Always within `-90 <= latitude <= 90` and `-180 <= longitude <= 180`.
/// Deserialization goes through [`Coordinate::new`], so payloads with
/// out-of-range values are rejected at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Creates a validated coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] if either component is not finite or is
    /// outside its range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Returns the latitude in degrees.
    #[inline]
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in degrees.
    #[inline]
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the great-circle distance to `other` in meters.
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Coordinate) -> u64 {
        distance(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates, rounded to whole meters.
///
/// Haversine on a sphere of radius [`EARTH_RADIUS_METERS`]. `sqrt(h)` is
/// clamped to 1.0 before `asin` so near-antipodal pairs cannot produce NaN.
///
/// # Examples
///
/// ```
/// use petspot_core::domain::value_objects::coordinate::{Coordinate, distance};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 180.0).unwrap();
/// assert!((distance(a, b) as i64 - 20_015_087).abs() <= 1);
/// ```
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> u64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let delta_lat = lat_b - lat_a;
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lon = (delta_lon / 2.0).sin();
    let h = sin_lat * sin_lat + lat_a.cos() * lat_b.cos() * sin_lon * sin_lon;

    let central_angle = 2.0 * h.sqrt().min(1.0).asin();
    let meters = (EARTH_RADIUS_METERS * central_angle).round();

    // central_angle is within [0, pi], so the cast cannot truncate
    meters as u64
}
