//! Geographic point and bounding box types.

use std::fmt;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.01;

/// Errors that can occur when constructing coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordError {
    /// Latitude is outside -90..=90 (or not a number).
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude is outside -180..=180 (or not a number).
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A validated position on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Creates a point from latitude/longitude in degrees.
    pub fn from_degrees(lat: f64, lon: f64) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Creates a point from a platform location that may be unset.
    ///
    /// Location providers report "no fix yet" as a position whose latitude
    /// and longitude both have an all-zero bit pattern. That sentinel maps
    /// to `Ok(None)`; `-0.0` has a different bit pattern and is a real
    /// coordinate.
    pub fn from_raw_degrees(lat: f64, lon: f64) -> Result<Option<Self>, CoordError> {
        if lat.to_bits() == 0 && lon.to_bits() == 0 {
            return Ok(None);
        }
        Self::from_degrees(lat, lon).map(Some)
    }

    /// Builds a point from values already clamped into range.
    pub(crate) fn clamped(lat: f64, lon: f64) -> Self {
        debug_assert!((MIN_LAT..=MAX_LAT).contains(&lat));
        debug_assert!((MIN_LON..=MAX_LON).contains(&lon));
        Self { lat, lon }
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` on a sphere of `sphere_radius_km`.
    pub fn distance_to(&self, other: &GeoPoint, sphere_radius_km: f64) -> f64 {
        let (lat1, lon1) = (self.lat.to_radians(), self.lon.to_radians());
        let (lat2, lon2) = (other.lat.to_radians(), other.lon.to_radians());

        // Rounding can push the cosine just outside [-1, 1] for identical points.
        let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
        cos_angle.clamp(-1.0, 1.0).acos() * sphere_radius_km
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.lat, self.lon)
    }
}

/// Axis-aligned lat/lon rectangle enclosing a circle on the sphere.
///
/// `min.lat <= max.lat` always holds. When the rectangle spans the
/// antimeridian, `min.lon > max.lon` and [`BoundingBox::crosses_antimeridian`]
/// returns true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: GeoPoint,
    max: GeoPoint,
}

impl BoundingBox {
    pub(crate) fn new(min: GeoPoint, max: GeoPoint) -> Self {
        debug_assert!(min.lat <= max.lat);
        Self { min, max }
    }

    /// South-west corner.
    pub fn min(&self) -> GeoPoint {
        self.min
    }

    /// North-east corner.
    pub fn max(&self) -> GeoPoint {
        self.max
    }

    /// Whether the box wraps around the ±180° meridian.
    pub fn crosses_antimeridian(&self) -> bool {
        self.min.lon > self.max.lon
    }

    /// Whether `point` lies inside the box (borders included).
    pub fn contains(&self, point: &GeoPoint) -> bool {
        if !(self.min.lat..=self.max.lat).contains(&point.lat) {
            return false;
        }
        if self.crosses_antimeridian() {
            point.lon >= self.min.lon || point.lon <= self.max.lon
        } else {
            (self.min.lon..=self.max.lon).contains(&point.lon)
        }
    }

    /// Formats the box as `latmin,lonmin,latmax,lonmax`.
    pub fn to_bbox_param(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min.lat, self.min.lon, self.max.lat, self.max.lon
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.min, self.max)
    }
}
