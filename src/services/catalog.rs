use crate::models::{Actor, Coordinate, Listing, LocationPrecision, Place};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the catalog backend
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Server-side filters forwarded to the catalog's listing query. The `"all"`
/// sentinel from clients is normalized away before it gets here.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub category: Option<String>,
    pub listing_type: Option<String>,
    pub organic_only: bool,
    pub search: Option<String>,
    pub location: Option<String>,
}

/// Marketplace catalog API client
///
/// The catalog owns users and listings; this service only ever reads
/// bounded snapshots of them and writes back resolved locations.
pub struct CatalogClient {
    base_url: String,
    service_key: String,
    client: Client,
}

impl CatalogClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            service_key,
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Fetch the acting user, including their resolved coordinates.
    pub async fn get_actor(&self, user_id: &str) -> Result<Actor, CatalogError> {
        let url = self.url(&format!("/internal/users/{}", user_id));

        tracing::debug!("Fetching actor: {}", user_id);

        let response = self
            .client
            .get(&url)
            .header("X-Service-Key", &self.service_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("user {}", user_id)));
        }
        if !response.status().is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to fetch user {}: {}",
                user_id,
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        serde_json::from_value(json)
            .map_err(|e| CatalogError::InvalidResponse(format!("Failed to parse user: {}", e)))
    }

    /// Fetch the active listing snapshot, with catalog-side filters applied.
    ///
    /// Rows that fail to parse are dropped individually so one malformed
    /// listing cannot take down a whole query.
    pub async fn active_listings(
        &self,
        filter: &ListingFilter,
    ) -> Result<Vec<Listing>, CatalogError> {
        let url = self.url("/internal/listings");

        let mut params: Vec<(&str, String)> = vec![("status", "active".to_string())];
        if let Some(category) = &filter.category {
            params.push(("category", category.clone()));
        }
        if let Some(listing_type) = &filter.listing_type {
            params.push(("listingType", listing_type.clone()));
        }
        if filter.organic_only {
            params.push(("organic", "true".to_string()));
        }
        if let Some(search) = &filter.search {
            params.push(("search", search.clone()));
        }
        if let Some(location) = &filter.location {
            params.push(("location", location.clone()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("X-Service-Key", &self.service_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to query listings: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        parse_listing_page(&json)
    }

    /// Fetch the newest active listings, newest first.
    pub async fn recent_listings(&self, limit: usize) -> Result<Vec<Listing>, CatalogError> {
        let url = self.url("/internal/listings");
        let limit_param = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("status", "active"),
                ("sort", "-createdAt"),
                ("limit", limit_param.as_str()),
            ])
            .header("X-Service-Key", &self.service_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to query recent listings: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        parse_listing_page(&json)
    }

    /// Fetch a single listing by id.
    pub async fn get_listing(&self, listing_id: &str) -> Result<Listing, CatalogError> {
        let url = self.url(&format!("/internal/listings/{}", listing_id));

        let response = self
            .client
            .get(&url)
            .header("X-Service-Key", &self.service_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("listing {}", listing_id)));
        }
        if !response.status().is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to fetch listing {}: {}",
                listing_id,
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        serde_json::from_value(json)
            .map_err(|e| CatalogError::InvalidResponse(format!("Failed to parse listing: {}", e)))
    }

    /// Persist a freshly resolved location on the actor. The authoritative
    /// coordinate is stored as-is; privacy degradation happens only at
    /// display time.
    pub async fn update_user_location(
        &self,
        user_id: &str,
        place: &Place,
        coordinate: Coordinate,
        precision: LocationPrecision,
        search_radius: u32,
    ) -> Result<(), CatalogError> {
        let url = self.url(&format!("/internal/users/{}/location", user_id));

        let payload = serde_json::json!({
            "location": place,
            "latitude": coordinate.latitude,
            "longitude": coordinate.longitude,
            "locationPrecision": precision,
            "searchRadius": search_radius,
        });

        let response = self
            .client
            .put(&url)
            .header("X-Service-Key", &self.service_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Api(format!(
                "Failed to store location for {}: {}",
                user_id,
                response.status()
            )));
        }

        tracing::debug!("Stored location for {}: {}", user_id, place.display_label());

        Ok(())
    }

    /// Liveness probe against the catalog.
    pub async fn health_check(&self) -> bool {
        let url = self.url("/internal/health");

        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("catalog health check failed: {}", e);
                false
            }
        }
    }
}

fn parse_listing_page(json: &Value) -> Result<Vec<Listing>, CatalogError> {
    let rows = json
        .get("listings")
        .and_then(|l| l.as_array())
        .ok_or_else(|| CatalogError::InvalidResponse("Missing listings array".into()))?;

    let listings: Vec<Listing> = rows
        .iter()
        .filter_map(|row| match serde_json::from_value(row.clone()) {
            Ok(listing) => Some(listing),
            Err(e) => {
                tracing::warn!("skipping malformed listing row: {}", e);
                None
            }
        })
        .collect();

    let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);
    tracing::debug!("Fetched {} listings (total: {})", listings.len(), total);

    Ok(listings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_client_creation() {
        let client = CatalogClient::new(
            "https://catalog.freshtrade.test".to_string(),
            "test_key".to_string(),
        );

        assert_eq!(client.base_url, "https://catalog.freshtrade.test");
        assert_eq!(client.service_key, "test_key");
    }

    #[test]
    fn test_parse_listing_page_drops_bad_rows() {
        let json = serde_json::json!({
            "total": 2,
            "listings": [
                {
                    "id": "l1",
                    "title": "Fresh eggs",
                    "category": "produce",
                    "listingType": "for_sale",
                    "createdAt": "2024-06-01T12:00:00Z",
                    "location": {"city": "Berlin", "country": "Germany"},
                    "latitude": 52.52,
                    "longitude": 13.405,
                    "ownerId": "u1"
                },
                {"id": "broken"}
            ]
        });

        let listings = parse_listing_page(&json).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "l1");
    }

    #[test]
    fn test_parse_listing_page_requires_array() {
        let json = serde_json::json!({"nope": true});
        assert!(matches!(
            parse_listing_page(&json),
            Err(CatalogError::InvalidResponse(_))
        ));
    }
}
