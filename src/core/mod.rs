// Core geo algorithm exports
pub mod distance;
pub mod feed;
pub mod privacy;
pub mod proximity;

pub use distance::{haversine_km, haversine_miles, EARTH_RADIUS_MILES, MILES_TO_KM};
pub use feed::{blend_local_first, FEED_OVERSAMPLE};
pub use privacy::{obfuscate, DEFAULT_OFFSET_MILES};
pub use proximity::{filter_by_bounds, filter_by_radius, sort_listings, without_distance};
