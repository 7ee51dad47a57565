//! FreshTrade Geo - Geospatial listing discovery for the FreshTrade marketplace
//!
//! This library resolves free-text addresses into coordinates, computes
//! great-circle distances, filters and ranks listings by proximity, blends
//! local-first feeds, and degrades privacy-sensitive coordinates before
//! public display.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    blend_local_first, filter_by_bounds, filter_by_radius, haversine_km, haversine_miles,
    obfuscate,
};
pub use crate::models::{
    is_valid_coordinate, Actor, BoundingBox, Coordinate, DistancedListing, Listing, Place,
    DEFAULT_SEARCH_RADIUS_MILES,
};
