//! Great-circle distance on a spherical Earth.
//!
//! Inputs are plain degrees and are not validated: latitudes outside
//! [-90, 90] or longitudes outside [-180, 180] still produce a number,
//! just not a physically meaningful one.

/// Earth mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between `(lat1, lon1)` and
/// `(lat2, lon2)`, all in degrees.
///
/// # Example
/// ```
/// use quakemon_service::analysis::distance::distance_km;
///
/// // San Francisco -> Los Angeles
/// let d = distance_km(37.7749, -122.4194, 34.0522, -118.2437);
/// assert!((d - 559.0).abs() < 5.0);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let sin_half_lat = (d_lat / 2.0).sin();
    let sin_half_lon = (d_lon / 2.0).sin();

    let a = sin_half_lat * sin_half_lat
        + lat1.to_radians().cos() * lat2.to_radians().cos() * sin_half_lon * sin_half_lon;

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
