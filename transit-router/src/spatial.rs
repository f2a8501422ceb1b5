//! Great-circle distance helpers.

use geo::{HaversineMeasure, Length, Point, line_string};

/// Haversine on a sphere with the WGS84 equatorial radius (6378137 m).
const EARTH: HaversineMeasure = HaversineMeasure::new(6_378_137.0);

/// Great-circle distance in meters between two points (x = longitude,
/// y = latitude).
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    EARTH.length(&line_string![a.0, b.0])
}

/// Great-circle distance in meters between two latitude/longitude pairs.
pub fn distance_between(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    haversine_distance(Point::new(lng1, lat1), Point::new(lng2, lat2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        assert_eq!(distance_between(39.9, 116.4, 39.9, 116.4), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // 6378137 * pi / 180
        let d = distance_between(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_319.491).abs() < 0.01, "got {d}");
    }

    #[test]
    fn symmetric() {
        let ab = distance_between(39.90, 116.39, 39.99, 116.31);
        let ba = distance_between(39.99, 116.31, 39.90, 116.39);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn known_city_distance() {
        // Tiananmen to the Summer Palace.
        let d = distance_between(39.9087, 116.3975, 39.9999, 116.2755);
        assert!((d - 14_541.331).abs() < 0.01, "got {d}");
    }

    #[test]
    fn point_order_is_lng_lat() {
        let d = haversine_distance(Point::new(116.4074, 39.9042), Point::new(116.4100, 39.9060));
        assert!((d - 299.074).abs() < 0.01, "got {d}");
    }
}
