//! Geodesic coordinate helpers.
//!
//! Provides validated geographic points and the bounding box that encloses
//! a circle of a given radius around a point on a sphere. The box is what
//! the OpenCellID area query is scoped to.
//!
//! # Algorithm
//!
//! With the angular radius `r = radius / sphere_radius`, the latitude range
//! is simply `lat ± r`. The longitude half-width is
//! `asin(sin r / cos lat)`, which grows towards the poles. When a pole lies
//! inside the circle every meridian intersects it, so the box spans the full
//! longitude range and the latitude is clamped at the pole.

mod types;

pub use types::{
    BoundingBox, CoordError, GeoPoint, EARTH_RADIUS_KM, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

use std::f64::consts::PI;

/// Computes the bounding box of the circle of `radius_km` around `center`.
///
/// # Arguments
///
/// * `center` - Center of the circle
/// * `radius_km` - Circle radius in kilometers, must be positive
/// * `sphere_radius_km` - Radius of the sphere, usually [`EARTH_RADIUS_KM`]
///
/// Longitudes are normalised into -180..=180. A circle that crosses the
/// antimeridian yields a box with `min.lon > max.lon`.
pub fn bounding_box(center: &GeoPoint, radius_km: f64, sphere_radius_km: f64) -> BoundingBox {
    debug_assert!(radius_km > 0.0, "radius must be positive");
    debug_assert!(sphere_radius_km > 0.0, "sphere radius must be positive");

    let angular = radius_km / sphere_radius_km;
    let lat = center.lat().to_radians();
    let lon = center.lon().to_radians();

    let mut min_lat = lat - angular;
    let mut max_lat = lat + angular;
    let (min_lon, max_lon);

    if min_lat > -PI / 2.0 && max_lat < PI / 2.0 {
        let delta_lon = (angular.sin() / lat.cos()).asin();
        min_lon = normalize_lon(lon - delta_lon);
        max_lon = normalize_lon(lon + delta_lon);
    } else {
        // A pole lies within the circle
        min_lat = min_lat.max(-PI / 2.0);
        max_lat = max_lat.min(PI / 2.0);
        min_lon = -PI;
        max_lon = PI;
    }

    BoundingBox::new(
        point_from_radians(min_lat, min_lon),
        point_from_radians(max_lat, max_lon),
    )
}

impl BoundingBox {
    /// Bounding box of the circle of `radius_km` around `center` on Earth.
    pub fn around(center: &GeoPoint, radius_km: f64) -> Self {
        bounding_box(center, radius_km, EARTH_RADIUS_KM)
    }
}

/// Wraps a longitude in radians into -PI..=PI.
fn normalize_lon(lon: f64) -> f64 {
    if lon < -PI {
        lon + 2.0 * PI
    } else if lon > PI {
        lon - 2.0 * PI
    } else {
        lon
    }
}

/// Builds a point from radians, clamping rounding noise at the edges.
fn point_from_radians(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::clamped(
        lat.to_degrees().clamp(MIN_LAT, MAX_LAT),
        lon.to_degrees().clamp(MIN_LON, MAX_LON),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Distance between two points with the same latitude/longitude axis.
    fn km(a: (f64, f64), b: (f64, f64)) -> f64 {
        let a = GeoPoint::from_degrees(a.0, a.1).unwrap();
        let b = GeoPoint::from_degrees(b.0, b.1).unwrap();
        a.distance_to(&b, EARTH_RADIUS_KM)
    }

    #[test]
    fn test_two_km_around_berlin() {
        let berlin = GeoPoint::from_degrees(52.52, 13.405).unwrap();
        let bbox = BoundingBox::around(&berlin, 2.0);

        assert!(bbox.min().lat() < 52.52 && bbox.max().lat() > 52.52);
        assert!(bbox.min().lon() < 13.405 && bbox.max().lon() > 13.405);

        // 2 km is ~0.018° of latitude
        assert!((bbox.max().lat() - 52.52 - 0.01799).abs() < 1e-4);
        // Longitude span widens with latitude
        assert!(bbox.max().lon() - 13.405 > bbox.max().lat() - 52.52);
    }

    #[test]
    fn test_edges_touch_circle() {
        let center = GeoPoint::from_degrees(40.7128, -74.006).unwrap();
        let bbox = BoundingBox::around(&center, 5.0);

        let north = km((center.lat(), center.lon()), (bbox.max().lat(), center.lon()));
        let south = km((center.lat(), center.lon()), (bbox.min().lat(), center.lon()));
        assert!((north - 5.0).abs() < 1e-4, "north edge at {} km", north);
        assert!((south - 5.0).abs() < 1e-4, "south edge at {} km", south);
    }

    #[test]
    fn test_north_pole_inside_circle() {
        let center = GeoPoint::from_degrees(89.99, 45.0).unwrap();
        let bbox = BoundingBox::around(&center, 10.0);

        assert_eq!(bbox.max().lat(), MAX_LAT);
        assert_eq!(bbox.min().lon(), MIN_LON);
        assert_eq!(bbox.max().lon(), MAX_LON);
        assert!(!bbox.crosses_antimeridian());
    }

    #[test]
    fn test_south_pole_inside_circle() {
        let center = GeoPoint::from_degrees(-89.95, 0.0).unwrap();
        let bbox = BoundingBox::around(&center, 20.0);

        assert_eq!(bbox.min().lat(), MIN_LAT);
        assert_eq!(bbox.min().lon(), MIN_LON);
        assert_eq!(bbox.max().lon(), MAX_LON);
    }

    #[test]
    fn test_antimeridian_wraps() {
        let center = GeoPoint::from_degrees(-17.0, 179.99).unwrap();
        let bbox = BoundingBox::around(&center, 5.0);

        assert!(bbox.crosses_antimeridian());
        assert!(bbox.min().lon() > 179.0);
        assert!(bbox.max().lon() < -179.0);
        assert!(bbox.contains(&center));
    }

    #[test]
    fn test_custom_sphere_radius() {
        let center = GeoPoint::from_degrees(0.0, 0.0).unwrap();
        // Unit sphere, radius 0.1 rad
        let bbox = bounding_box(&center, 0.1, 1.0);
        assert!((bbox.max().lat() - 0.1_f64.to_degrees()).abs() < 1e-9);
        assert!((bbox.max().lon() - 0.1_f64.to_degrees()).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_center_strictly_inside(
            lat in -80.0f64..80.0,
            lon in -170.0f64..170.0,
            radius in 0.1f64..50.0,
        ) {
            let center = GeoPoint::from_degrees(lat, lon).unwrap();
            let bbox = BoundingBox::around(&center, radius);

            prop_assert!(bbox.min().lat() < lat && lat < bbox.max().lat());
            prop_assert!(bbox.min().lon() <= bbox.max().lon());
            prop_assert!(bbox.min().lon() < lon && lon < bbox.max().lon());
        }

        #[test]
        fn prop_latitude_edges_match_radius(
            lat in -80.0f64..80.0,
            lon in -170.0f64..170.0,
            radius in 0.1f64..100.0,
        ) {
            let center = GeoPoint::from_degrees(lat, lon).unwrap();
            let bbox = BoundingBox::around(&center, radius);

            let north = km((lat, lon), (bbox.max().lat(), lon));
            let south = km((lat, lon), (bbox.min().lat(), lon));
            prop_assert!((north - radius).abs() < 1e-4);
            prop_assert!((south - radius).abs() < 1e-4);
        }

        #[test]
        fn prop_longitude_edges_enclose_circle(
            lat in -80.0f64..80.0,
            lon in -170.0f64..170.0,
            radius in 0.1f64..100.0,
        ) {
            let center = GeoPoint::from_degrees(lat, lon).unwrap();
            let bbox = BoundingBox::around(&center, radius);

            // The meridian at the box edge is tangent to the circle, so
            // walking along the center latitude reaches it no sooner than
            // the radius.
            let east = km((lat, lon), (lat, bbox.max().lon()));
            let west = km((lat, lon), (lat, bbox.min().lon()));
            prop_assert!(east >= radius - 1e-4);
            prop_assert!(west >= radius - 1e-4);
            prop_assert!(east < radius * 1.01 + 1e-4);
        }
    }
}
