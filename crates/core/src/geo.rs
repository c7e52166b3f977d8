//! Great-circle distance and bounding-box prefiltering.

use std::f64::consts::PI;

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// One degree of latitude spans roughly 69 miles everywhere on Earth.
const MILES_PER_DEGREE_LAT: f64 = 69.0;

/// Haversine distance between two lat/lon points, in miles.
///
/// Pure and total: callers are expected to pass coordinates already validated
/// to be in decimal-degree range.
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let to_rad = |deg: f64| deg * PI / 180.0;

    let dlat = to_rad(lat2 - lat1);
    let dlon = to_rad(lon2 - lon1);

    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (dlon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_MILES * c
}

/// Rectangular lat/lon range approximating a circular search radius.
///
/// The rectangle is a superset of the circle: every point within
/// `radius_miles` of the center lies inside it, but the corners reach
/// farther. Exact filtering still happens downstream via [`haversine_miles`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Box around `(lat, lon)` containing the circle of `radius_miles`.
    ///
    /// The longitude delta widens with latitude to account for meridian
    /// convergence away from the equator.
    pub fn around(lat: f64, lon: f64, radius_miles: f64) -> Self {
        let lat_delta = radius_miles / MILES_PER_DEGREE_LAT;
        let lon_delta = radius_miles / (MILES_PER_DEGREE_LAT * (lat * PI / 180.0).cos());
        Self {
            min_lat: lat - lat_delta,
            max_lat: lat + lat_delta,
            min_lon: lon - lon_delta,
            max_lon: lon + lon_delta,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_have_zero_distance() {
        assert_eq!(haversine_miles(42.3631, -71.0686, 42.3631, -71.0686), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_miles(42.3631, -71.0686, 40.7128, -74.0060);
        let ba = haversine_miles(40.7128, -74.0060, 42.3631, -71.0686);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn boston_to_nyc_is_about_190_miles() {
        let d = haversine_miles(42.3631, -71.0686, 40.7128, -74.0060);
        assert!((185.0..195.0).contains(&d), "got {d}");
    }

    #[test]
    fn bounding_box_contains_every_point_within_radius() {
        let (lat, lon, radius) = (42.3631, -71.0686, 25.0);
        let bbox = BoundingBox::around(lat, lon, radius);

        // Sample points on the circle's perimeter in all directions.
        for i in 0..36 {
            let theta = f64::from(i) * 10.0 * PI / 180.0;
            let p_lat = lat + (radius / MILES_PER_DEGREE_LAT) * theta.cos();
            let p_lon = lon
                + (radius / (MILES_PER_DEGREE_LAT * (lat * PI / 180.0).cos())) * theta.sin();
            if haversine_miles(lat, lon, p_lat, p_lon) <= radius {
                assert!(bbox.contains(p_lat, p_lon), "angle {i}0 degrees escaped");
            }
        }
    }

    #[test]
    fn bounding_box_is_a_superset_not_exact() {
        let (lat, lon, radius) = (42.3631, -71.0686, 25.0);
        let bbox = BoundingBox::around(lat, lon, radius);

        // A corner of the box is inside the rectangle but beyond the radius.
        let corner = (bbox.max_lat, bbox.max_lon);
        assert!(bbox.contains(corner.0, corner.1));
        assert!(haversine_miles(lat, lon, corner.0, corner.1) > radius);
    }

    #[test]
    fn longitude_delta_widens_away_from_equator() {
        let equator = BoundingBox::around(0.0, -71.0, 25.0);
        let boston = BoundingBox::around(42.3631, -71.0, 25.0);
        assert!(
            boston.max_lon - boston.min_lon > equator.max_lon - equator.min_lon,
            "meridian convergence not accounted for"
        );
    }
}
