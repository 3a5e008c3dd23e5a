//! Great-circle distance on a fixed-radius sphere.

/// Mean Earth radius in nautical miles used for every leg distance.
pub const EARTH_RADIUS_NM: f64 = 3441.036714;

/// Haversine distance in nautical miles between two points given in degrees.
///
/// Inputs must be finite; the function has no other failure cases.
pub fn leg_distance(lat0: f64, lon0: f64, lat1: f64, lon1: f64) -> f64 {
    let dlat = (lat1 - lat0).to_radians();
    let dlon = (lon1 - lon0).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat0.to_radians().cos() * lat1.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_NM * c
}

/// Round half away from zero to `places` decimals, for display and labels.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
