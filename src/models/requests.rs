use crate::models::{LocationPrecision, Place, SortKey, SortOrder};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_suggest_limit() -> usize {
    5
}

fn default_nearby_limit() -> usize {
    50
}

fn default_map_limit() -> usize {
    200
}

fn default_search_limit() -> usize {
    20
}

fn default_feed_limit() -> usize {
    20
}

/// Body for relocating an actor: free-text address plus disclosure settings.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationUpdateRequest {
    #[validate(length(min = 1))]
    pub address: String,
    #[serde(alias = "location_precision", rename = "locationPrecision", default)]
    pub location_precision: LocationPrecision,
    #[validate(range(min = 1, max = 200))]
    #[serde(alias = "search_radius", rename = "searchRadius", default)]
    pub search_radius: Option<u32>,
}

/// Body for pre-registration location validation: a draft place descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateLocationRequest {
    pub location: Place,
}

/// Query for location autocomplete.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuggestQuery {
    pub q: String,
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_suggest_limit")]
    pub limit: usize,
}

/// Query for listings near an actor's stored location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1, max = 200))]
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(alias = "listing_type", rename = "listingType", default)]
    pub listing_type: Option<String>,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_nearby_limit")]
    pub limit: usize,
}

/// Query for map viewport pins.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MapQuery {
    pub bounds: String,
    #[serde(alias = "viewer_id", rename = "viewerId", default)]
    pub viewer_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(alias = "listing_type", rename = "listingType", default)]
    pub listing_type: Option<String>,
    #[validate(range(min = 1, max = 500))]
    #[serde(default = "default_map_limit")]
    pub limit: usize,
}

/// Query for direct coordinate search, independent of any stored actor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CoordinateSearchQuery {
    pub lat: f64,
    pub lng: f64,
    #[validate(range(min = 1, max = 200))]
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(alias = "listing_type", rename = "listingType", default)]
    pub listing_type: Option<String>,
    #[serde(alias = "organic_only", rename = "organicOnly", default)]
    pub organic_only: bool,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_nearby_limit")]
    pub limit: usize,
}

/// Query for the general listing search.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ListingSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(alias = "listing_type", rename = "listingType", default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(alias = "organic_only", rename = "organicOnly", default)]
    pub organic_only: bool,
    #[serde(alias = "near_me", rename = "nearMe", default)]
    pub near_me: bool,
    #[validate(range(min = 1, max = 200))]
    #[serde(default)]
    pub radius: Option<u32>,
    #[serde(alias = "sort_by", rename = "sortBy", default)]
    pub sort_by: SortKey,
    #[serde(alias = "sort_order", rename = "sortOrder", default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub skip: usize,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_search_limit")]
    pub limit: usize,
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
}

/// Query for the blended feed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeedQuery {
    #[validate(range(min = 1, max = 50))]
    #[serde(default = "default_feed_limit")]
    pub limit: usize,
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<String>,
}

/// Query for local area statistics.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatsQuery {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}
