//! Great-circle distance for proximity triggers.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Distance: nautical miles (spherical Earth, radius 3440.065 NM)

use std::f64::consts::PI;

use crate::error::MalformedInput;

/// Earth's radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.065;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// A validated geographic position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MalformedInput> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(MalformedInput::Coordinate {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Distance to another coordinate in nautical miles.
    pub fn distance_nm(&self, other: &Coordinate) -> f64 {
        distance_nm(
            (self.latitude, self.longitude),
            (other.latitude, other.longitude),
        )
    }
}

/// Calculate the great-circle distance between two positions.
///
/// Uses the haversine formula. Inputs are `(latitude, longitude)` in degrees
/// and must already be validated by the caller.
///
/// # Example
///
/// ```
/// use gocwatch::geo::distance_nm;
///
/// // 1 degree of latitude is ~60 NM
/// let dist = distance_nm((0.0, 0.0), (1.0, 0.0));
/// assert!((dist - 60.0).abs() < 0.1);
/// ```
pub fn distance_nm(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1 * DEG_TO_RAD;
    let lat2_rad = lat2 * DEG_TO_RAD;
    let delta_lat = (lat2 - lat1) * DEG_TO_RAD;
    let delta_lon = (lon2 - lon1) * DEG_TO_RAD;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push antipodal points just past 1
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_NM * c
}
