use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Default search radius in miles when an actor has not configured one.
pub const DEFAULT_SEARCH_RADIUS_MILES: u32 = 25;

/// Validate that a latitude/longitude pair is within the WGS84 domain.
#[inline]
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// A complete latitude/longitude pair.
///
/// Partial coordinates never exist in this codebase: a pair is either fully
/// present and in range, or it is absent. Use [`Coordinate::from_parts`] to
/// enforce that at the boundary where optional fields come in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Build a coordinate from two optional scalars.
    ///
    /// Returns `None` unless both parts are present and in range.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) if is_valid_coordinate(lat, lng) => {
                Some(Self::new(lat, lng))
            }
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self.latitude, self.longitude)
    }
}

/// Granularity at which an actor discloses their location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocationPrecision {
    #[default]
    City,
    Neighborhood,
}

/// A resolved or user-supplied place description, persisted verbatim on the
/// owning entity by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Place {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(rename = "formattedAddress", alias = "formatted_address", default)]
    pub formatted_address: Option<String>,
}

impl Place {
    /// Required fields for any location-bearing entity.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.country.as_deref().map_or(true, str::is_empty) {
            missing.push("country");
        }
        if self.city.as_deref().map_or(true, str::is_empty) {
            missing.push("city");
        }
        missing
    }

    /// Free-form query string for the geocoder: present `area, city, state,
    /// country` fields, in that order, joined by ", ".
    pub fn geocode_query(&self) -> String {
        [&self.area, &self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// "City, State, Country" display label, omitting absent parts.
    pub fn display_label(&self) -> String {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();

        if parts.is_empty() {
            "Location not specified".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    ForSale,
    GiveAway,
    LookingFor,
}

/// A marketplace listing as served by the catalog backend.
///
/// The place descriptor is mandatory for listings; coordinates are optional
/// and a listing without them is silently skipped by all distance-based
/// filtering, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(rename = "listingType")]
    pub listing_type: ListingType,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(rename = "viewCount", default)]
    pub view_count: u64,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub organic: bool,
    pub location: Place,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "ownerId")]
    pub owner_id: String,
    #[serde(rename = "ownerName", default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Listing {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}

/// The querying actor, as supplied by the auth collaborator via the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub location: Option<Place>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "locationPrecision", default)]
    pub location_precision: LocationPrecision,
    #[serde(rename = "searchRadius", default)]
    pub search_radius: Option<u32>,
    #[serde(rename = "whatsappNumber", default)]
    pub whatsapp_number: Option<String>,
    #[serde(rename = "showWhatsappOnListings", default)]
    pub show_whatsapp_on_listings: bool,
}

impl Actor {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }

    pub fn radius_miles(&self) -> u32 {
        self.search_radius.unwrap_or(DEFAULT_SEARCH_RADIUS_MILES)
    }
}

/// A listing with its ephemeral per-query distance annotation. Distances are
/// `None` when the query had no origin; they are never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct DistancedListing {
    pub listing: Listing,
    #[serde(rename = "distance", skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
    #[serde(rename = "distanceKm", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Axis-aligned latitude/longitude rectangle for map viewport queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub sw_lat: f64,
    pub sw_lng: f64,
    pub ne_lat: f64,
    pub ne_lng: f64,
}

impl BoundingBox {
    /// Inclusive on all four edges.
    #[inline]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.sw_lat && lat <= self.ne_lat && lng >= self.sw_lng && lng <= self.ne_lng
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoundsParseError {
    #[error("bounds must have exactly four comma-separated fields, got {0}")]
    WrongFieldCount(usize),
    #[error("bounds field {0:?} is not a number")]
    NotANumber(String),
}

impl FromStr for BoundingBox {
    type Err = BoundsParseError;

    /// Parse the `"swLat,swLng,neLat,neLng"` query parameter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').collect();
        if fields.len() != 4 {
            return Err(BoundsParseError::WrongFieldCount(fields.len()));
        }

        let mut parsed = [0.0f64; 4];
        for (slot, field) in parsed.iter_mut().zip(&fields) {
            *slot = field
                .trim()
                .parse()
                .map_err(|_| BoundsParseError::NotANumber(field.trim().to_string()))?;
        }

        Ok(BoundingBox {
            sw_lat: parsed[0],
            sw_lng: parsed[1],
            ne_lat: parsed[2],
            ne_lng: parsed[3],
        })
    }
}

/// Sort keys supported by the general listing search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedDate,
    Price,
    ViewCount,
    Distance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validation() {
        assert!(!is_valid_coordinate(91.0, 0.0));
        assert!(is_valid_coordinate(45.0, -180.0));
        assert!(is_valid_coordinate(-90.0, 180.0));
        assert!(!is_valid_coordinate(0.0, 180.1));
    }

    #[test]
    fn test_coordinate_from_parts_rejects_partial_pairs() {
        assert!(Coordinate::from_parts(Some(40.7), Some(-74.0)).is_some());
        assert!(Coordinate::from_parts(Some(40.7), None).is_none());
        assert!(Coordinate::from_parts(None, Some(-74.0)).is_none());
        assert!(Coordinate::from_parts(Some(99.0), Some(-74.0)).is_none());
    }

    #[test]
    fn test_geocode_query_joins_present_fields() {
        let place = Place {
            country: Some("Germany".to_string()),
            city: Some("Berlin".to_string()),
            area: Some("Kreuzberg".to_string()),
            ..Place::default()
        };
        assert_eq!(place.geocode_query(), "Kreuzberg, Berlin, Germany");
    }

    #[test]
    fn test_display_label_fallback() {
        assert_eq!(Place::default().display_label(), "Location not specified");

        let place = Place {
            city: Some("Portland".to_string()),
            state: Some("Oregon".to_string()),
            country: Some("United States".to_string()),
            ..Place::default()
        };
        assert_eq!(place.display_label(), "Portland, Oregon, United States");
    }

    #[test]
    fn test_missing_required_fields() {
        let place = Place {
            city: Some("Berlin".to_string()),
            ..Place::default()
        };
        assert_eq!(place.missing_required_fields(), vec!["country"]);
    }

    #[test]
    fn test_bounds_parsing() {
        let bounds: BoundingBox = "40.5,-74.3,40.9,-73.7".parse().unwrap();
        assert_eq!(bounds.sw_lat, 40.5);
        assert_eq!(bounds.ne_lng, -73.7);

        assert_eq!(
            "40.5,-74.3,40.9".parse::<BoundingBox>(),
            Err(BoundsParseError::WrongFieldCount(3))
        );
        assert!(matches!(
            "a,b,c,d".parse::<BoundingBox>(),
            Err(BoundsParseError::NotANumber(_))
        ));
    }

    #[test]
    fn test_bounds_contains_is_inclusive() {
        let bounds: BoundingBox = "40.0,-75.0,41.0,-74.0".parse().unwrap();
        assert!(bounds.contains(40.0, -75.0));
        assert!(bounds.contains(41.0, -74.0));
        assert!(!bounds.contains(41.0001, -74.5));
    }
}
