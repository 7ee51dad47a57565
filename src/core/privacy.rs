use crate::models::Coordinate;
use rand::Rng;

/// Default perturbation applied before a coordinate leaves its owner's view.
pub const DEFAULT_OFFSET_MILES: f64 = 0.5;

/// Approximate miles spanned by one degree of latitude.
const MILES_PER_DEGREE: f64 = 69.0;

/// Perturb a coordinate by an independent uniform offset in
/// `[-offset_miles, +offset_miles]` along each axis.
///
/// The longitude offset is widened by `1 / cos(latitude)` so the displacement
/// stays bounded in miles at high latitudes. The result is clamped into the
/// valid coordinate domain.
///
/// Display-time transform only: never apply it before persisting an entity's
/// authoritative coordinate, and never when the viewer owns the entity.
pub fn obfuscate(coordinate: Coordinate, offset_miles: f64) -> Coordinate {
    let mut rng = rand::thread_rng();

    let lat_offset = (offset_miles / MILES_PER_DEGREE) * rng.gen_range(-1.0..=1.0);
    let lng_scale = MILES_PER_DEGREE * coordinate.latitude.to_radians().cos().abs();
    let lng_offset = (offset_miles / lng_scale) * rng.gen_range(-1.0..=1.0);

    Coordinate {
        latitude: (coordinate.latitude + lat_offset).clamp(-90.0, 90.0),
        longitude: (coordinate.longitude + lng_offset).clamp(-180.0, 180.0),
    }
}
