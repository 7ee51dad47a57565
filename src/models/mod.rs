// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    is_valid_coordinate, Actor, BoundingBox, BoundsParseError, Coordinate, DistancedListing,
    Listing, ListingType, LocationPrecision, Place, SortKey, SortOrder,
    DEFAULT_SEARCH_RADIUS_MILES,
};
pub use requests::{
    CoordinateSearchQuery, FeedQuery, ListingSearchQuery, LocationUpdateRequest, MapQuery,
    NearbyQuery, StatsQuery, SuggestQuery, ValidateLocationRequest,
};
pub use responses::{
    ContactInfo, ErrorResponse, HealthResponse, ListingWithDistance, LocalStats,
    LocationUpdateResponse, MapListing, UserLocationResponse, ValidateLocationResponse,
};
