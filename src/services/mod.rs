// Service exports
pub mod catalog;
pub mod contact;
pub mod geocoder;

pub use catalog::{CatalogClient, CatalogError, ListingFilter};
pub use geocoder::{GeocodeError, NominatimClient, PlaceSuggestion, ResolvedPlace};
