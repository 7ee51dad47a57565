use crate::models::Coordinate;

/// Earth's radius in miles (spherical model)
pub const EARTH_RADIUS_MILES: f64 = 3956.0;

/// Conversion factor from miles to kilometers
pub const MILES_TO_KM: f64 = 1.60934;

/// A scalar that disqualifies a coordinate pair from distance computation.
///
/// Zero doubles as "missing" here, mirroring how the catalog serializes
/// unset coordinates; the cost is that points exactly on the equator or
/// prime meridian are treated as absent.
#[inline]
fn degenerate(v: f64) -> bool {
    v == 0.0 || !v.is_finite()
}

/// Great-circle distance between two points in miles, via the haversine
/// formula on a spherical Earth.
///
/// Any degenerate input (zero, NaN, infinite) yields `f64::INFINITY`, so the
/// pair is excluded by every finite-radius filter instead of raising.
///
/// The spherical model under- or over-shoots an ellipsoid by a fraction of a
/// percent; that error is accepted, not corrected.
#[inline]
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if degenerate(lat1) || degenerate(lon1) || degenerate(lat2) || degenerate(lon2) {
        return f64::INFINITY;
    }

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Kilometers variant: the miles result scaled by [`MILES_TO_KM`].
#[inline]
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    haversine_miles(lat1, lon1, lat2, lon2) * MILES_TO_KM
}

impl Coordinate {
    /// Great-circle distance to `other` in miles.
    pub fn distance_miles(&self, other: &Coordinate) -> f64 {
        haversine_miles(self.latitude, self.longitude, other.latitude, other.longitude)
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let d = haversine_miles(40.7128, -74.0060, 40.7128, -74.0060);
        assert!(d.abs() < 1e-9, "self-distance should be 0, got {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let ab = haversine_miles(51.5074, -0.1278, 48.8566, 2.3522);
        let ba = haversine_miles(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance_london_to_paris() {
        // London to Paris is roughly 214 miles
        let d = haversine_miles(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((d - 214.0).abs() < 5.0, "expected ~214 miles, got {}", d);
    }

    #[test]
    fn test_km_is_scaled_miles() {
        let miles = haversine_miles(40.7128, -74.0060, 40.7306, -73.9352);
        let km = haversine_km(40.7128, -74.0060, 40.7306, -73.9352);
        assert!((km - miles * MILES_TO_KM).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_input_is_infinite() {
        assert_eq!(haversine_miles(0.0, -74.0, 40.7, -73.9), f64::INFINITY);
        assert_eq!(haversine_miles(40.7, 0.0, 40.7, -73.9), f64::INFINITY);
        assert_eq!(haversine_miles(40.7, -74.0, f64::NAN, -73.9), f64::INFINITY);
        assert_eq!(
            haversine_miles(40.7, -74.0, 40.8, f64::INFINITY),
            f64::INFINITY
        );
    }

    #[test]
    fn test_monotonic_in_separation() {
        let origin = (40.7128, -74.0060);
        let near = haversine_miles(origin.0, origin.1, 40.73, -73.99);
        let far = haversine_miles(origin.0, origin.1, 41.5, -73.0);
        assert!(near < far);
    }

    #[test]
    fn test_coordinate_methods() {
        let nyc = Coordinate::new(40.7128, -74.0060);
        let bk = Coordinate::new(40.6782, -73.9442);
        let miles = nyc.distance_miles(&bk);
        assert!(miles > 2.0 && miles < 8.0);
        assert!((nyc.distance_km(&bk) - miles * MILES_TO_KM).abs() < 1e-9);
    }
}
