use crate::models::domain::{
    Coordinate, DistancedListing, Listing, ListingType, LocationPrecision, Place,
};
use crate::services::geocoder::ResolvedPlace;
use serde::{Deserialize, Serialize};

/// Round a distance for display, one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A listing plus display-rounded distance annotations.
#[derive(Debug, Clone, Serialize)]
pub struct ListingWithDistance {
    pub listing: Listing,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(rename = "distanceKm", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl From<DistancedListing> for ListingWithDistance {
    fn from(annotated: DistancedListing) -> Self {
        Self {
            listing: annotated.listing,
            distance: annotated.distance_miles.map(round1),
            distance_km: annotated.distance_km.map(round1),
        }
    }
}

/// A map pin. Coordinates may be privacy-degraded for non-owners.
#[derive(Debug, Clone, Serialize)]
pub struct MapListing {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(rename = "listingType")]
    pub listing_type: ListingType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(rename = "ownerName", skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

/// Response after relocating an actor.
#[derive(Debug, Clone, Serialize)]
pub struct LocationUpdateResponse {
    pub message: String,
    pub location: Place,
    pub coordinates: Coordinate,
    #[serde(rename = "searchRadius")]
    pub search_radius: u32,
}

/// Response for pre-registration location validation. Lookup failures are a
/// `valid: false` payload, never a transport error.
#[derive(Debug, Clone, Serialize)]
pub struct ValidateLocationResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geocoded: Option<ResolvedPlace>,
    #[serde(rename = "formattedAddress", skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateLocationResponse {
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            geocoded: None,
            formatted_address: None,
            error: Some(error.into()),
        }
    }
}

/// An actor's own view of their location. Never obfuscated.
#[derive(Debug, Clone, Serialize)]
pub struct UserLocationResponse {
    pub location: Option<Place>,
    pub coordinates: Option<Coordinate>,
    #[serde(rename = "locationPrecision")]
    pub location_precision: LocationPrecision,
    #[serde(rename = "searchRadius")]
    pub search_radius: u32,
    #[serde(rename = "hasLocation")]
    pub has_location: bool,
}

/// Contact channels for a listing's owner.
#[derive(Debug, Clone, Serialize)]
pub struct ContactInfo {
    #[serde(rename = "canMessage")]
    pub can_message: bool,
    #[serde(rename = "canWhatsapp")]
    pub can_whatsapp: bool,
    #[serde(rename = "whatsappUrl", skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
}

/// Listing counts within the actor's radius.
#[derive(Debug, Clone, Serialize)]
pub struct LocalStats {
    #[serde(rename = "totalLocalListings")]
    pub total_local_listings: usize,
    #[serde(rename = "forSaleCount")]
    pub for_sale_count: usize,
    #[serde(rename = "giveAwayCount")]
    pub give_away_count: usize,
    #[serde(rename = "lookingForCount")]
    pub looking_for_count: usize,
    #[serde(rename = "organicCount")]
    pub organic_count: usize,
    #[serde(rename = "searchRadius")]
    pub search_radius: u32,
    #[serde(rename = "userLocation")]
    pub user_location: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
