//! Spherical-earth helpers: bearings, great-circle destination, haversine.
//!
//! Bearings are compass degrees, clockwise from true north.

use crate::interface::GeoPoint;
use crate::prelude::{LocaliserError, LocaliserResult};

/// Mean earth radius used by every projection in the crate.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Wraps any finite bearing into `[0, 360)`.
pub fn normalize_bearing(bearing_deg: f64) -> f64 {
    let wrapped = bearing_deg.rem_euclid(360.0);
    // rem_euclid can round tiny negatives up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Direction back toward the source for a wind blowing *from* `wind_from_deg`.
pub fn upwind_bearing(wind_from_deg: f64) -> f64 {
    normalize_bearing(wind_from_deg + 180.0)
}

/// Bearing perpendicular to the wind, clockwise from the wind's origin.
pub fn crosswind_bearing(wind_from_deg: f64) -> f64 {
    normalize_bearing(wind_from_deg + 90.0)
}

fn clamped_asin(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).asin()
}

fn project(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let lat = origin.lat.to_radians();
    let lon = origin.lon.to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_m / EARTH_RADIUS_M;

    let new_lat =
        clamped_asin(lat.sin() * angular.cos() + lat.cos() * angular.sin() * bearing.cos());
    let new_lon = lon
        + (bearing.sin() * angular.sin() * lat.cos())
            .atan2(angular.cos() - lat.sin() * new_lat.sin());

    GeoPoint::new(new_lat.to_degrees(), new_lon.to_degrees())
}

/// Great-circle destination from `origin` along `bearing_deg` for `distance_m`.
///
/// The `asin` argument is clamped to `[-1, 1]`, so floating-point drift near
/// the poles or very long legs clip to the pole instead of producing NaN.
/// Non-finite inputs still propagate; use [`try_destination`] when the
/// inputs are not known to be finite.
pub fn destination(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    project(origin, bearing_deg, distance_m)
}

/// Checked variant of [`destination`].
pub fn try_destination(
    origin: GeoPoint,
    bearing_deg: f64,
    distance_m: f64,
) -> LocaliserResult<GeoPoint> {
    if !origin.is_finite() || !bearing_deg.is_finite() || !distance_m.is_finite() {
        return Err(LocaliserError::ProjectionUndefined(format!(
            "non-finite input: origin ({}, {}), bearing {}, distance {}",
            origin.lat, origin.lon, bearing_deg, distance_m
        )));
    }

    let point = project(origin, bearing_deg, distance_m);
    if !point.is_finite() {
        return Err(LocaliserError::ProjectionUndefined(format!(
            "projection from ({}, {}) produced ({}, {})",
            origin.lat, origin.lon, point.lat, point.lon
        )));
    }
    Ok(point)
}

/// Initial great-circle bearing from `from` toward `to`, in `[0, 360)`.
pub fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlon = (to.lon - from.lon).to_radians();

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    normalize_bearing(x.atan2(y).to_degrees())
}

/// Haversine surface distance in metres.
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn one_degree_east_along_equator() {
        let point = destination(GeoPoint::new(0.0, 0.0), 90.0, 111_195.0);
        assert_abs_diff_eq!(point.lon, 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(point.lat, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn due_north_increases_latitude_only() {
        let origin = GeoPoint::new(-31.95, 115.85);
        let point = destination(origin, 0.0, 1_000.0);
        assert!(point.lat > origin.lat);
        assert_abs_diff_eq!(point.lon, origin.lon, epsilon = 1e-9);
        assert_abs_diff_eq!(distance_m(origin, point), 1_000.0, epsilon = 1e-6);
    }

    #[test]
    fn upwind_is_bearing_inversion_for_whole_circle() {
        for step in 0..3600 {
            let wind = step as f64 * 0.1;
            assert_abs_diff_eq!(upwind_bearing(wind), (wind + 180.0) % 360.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn bearings_wrap_negative_and_large_values() {
        assert_eq!(normalize_bearing(-90.0), 270.0);
        assert_eq!(normalize_bearing(720.0), 0.0);
        assert_eq!(normalize_bearing(-1e-20), 0.0);
        assert_eq!(crosswind_bearing(270.0), 0.0);
    }

    #[test]
    fn asin_argument_is_clamped_against_drift() {
        let drifted = 1.0 + f64::EPSILON;
        assert!(drifted.asin().is_nan());
        assert_abs_diff_eq!(clamped_asin(drifted), std::f64::consts::FRAC_PI_2);
        assert_abs_diff_eq!(clamped_asin(-drifted), -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn extreme_distances_from_pole_stay_finite() {
        for distance in [0.0, 1.0, 1.0e7, 2.0e7, 4.0e7] {
            let point = destination(GeoPoint::new(90.0, 0.0), 0.0, distance);
            assert!(point.is_finite(), "distance {} gave {:?}", distance, point);
            assert!(point.lat.abs() <= 90.0 + 1e-9);
        }
    }

    #[test]
    fn checked_projection_rejects_non_finite_input() {
        let err = try_destination(GeoPoint::new(f64::NAN, 0.0), 90.0, 10.0).unwrap_err();
        assert!(matches!(err, LocaliserError::ProjectionUndefined(_)));
        assert!(try_destination(GeoPoint::new(0.0, 0.0), f64::INFINITY, 10.0).is_err());
        assert!(try_destination(GeoPoint::new(0.0, 0.0), 45.0, 10.0).is_ok());
    }

    #[test]
    fn initial_bearing_points_back_along_projection() {
        let origin = GeoPoint::new(-31.95, 115.85);
        for bearing in [0.0, 45.0, 90.0, 200.0, 315.0] {
            let target = destination(origin, bearing, 250.0);
            assert_abs_diff_eq!(initial_bearing(origin, target), bearing, epsilon = 1e-6);
        }
    }

    #[test]
    fn haversine_matches_one_degree_at_equator() {
        let d = distance_m(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        assert_abs_diff_eq!(d, 111_194.93, epsilon = 0.1);
    }
}
