use crate::models::{Coordinate, Place};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from the geocoding provider. These never escape the public
/// `resolve`/`suggest` methods: a failed lookup is "not found", and the
/// caller decides whether that is fatal.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(reqwest::StatusCode),
}

/// A successfully resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub coordinate: Coordinate,
    #[serde(rename = "formattedAddress")]
    pub formatted_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
    pub area: Option<String>,
}

impl ResolvedPlace {
    /// Place descriptor for persistence on the owning entity.
    pub fn to_place(&self) -> Place {
        Place {
            country: self.country.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            area: self.area.clone(),
            postcode: self.postcode.clone(),
            formatted_address: Some(self.formatted_address.clone()),
        }
    }
}

/// A lightweight autocomplete suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceSuggestion {
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One result row from the provider. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct ProviderPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    address: ProviderAddress,
}

/// Nested address details; the provider's field names vary by region, hence
/// the fallback chains below.
#[derive(Debug, Default, Deserialize)]
struct ProviderAddress {
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    town: Option<String>,
    #[serde(default)]
    village: Option<String>,
    #[serde(default)]
    municipality: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    province: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    postcode: Option<String>,
    #[serde(default)]
    suburb: Option<String>,
    #[serde(default)]
    neighbourhood: Option<String>,
}

impl ProviderAddress {
    fn city(&self) -> Option<String> {
        self.city
            .clone()
            .or_else(|| self.town.clone())
            .or_else(|| self.village.clone())
            .or_else(|| self.municipality.clone())
    }

    fn state(&self) -> Option<String> {
        self.state
            .clone()
            .or_else(|| self.province.clone())
            .or_else(|| self.region.clone())
    }

    fn area(&self) -> Option<String> {
        self.suburb.clone().or_else(|| self.neighbourhood.clone())
    }
}

/// Nominatim-compatible geocoding client.
///
/// Outbound calls always carry the configured `User-Agent` (provider usage
/// policy) and request English, structured results. Full resolution and
/// autocomplete use distinct timeouts since autocomplete sits behind
/// interactive typing.
pub struct NominatimClient {
    base_url: String,
    user_agent: String,
    client: Client,
    resolve_timeout: Duration,
    suggest_timeout: Duration,
    cache: moka::future::Cache<String, ResolvedPlace>,
}

impl NominatimClient {
    pub fn new(
        base_url: String,
        user_agent: String,
        resolve_timeout_secs: u64,
        suggest_timeout_secs: u64,
        cache_size: u64,
        cache_ttl_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        let cache = moka::future::CacheBuilder::new(cache_size)
            .time_to_live(Duration::from_secs(cache_ttl_secs))
            .build();

        Self {
            base_url,
            user_agent,
            client,
            resolve_timeout: Duration::from_secs(resolve_timeout_secs),
            suggest_timeout: Duration::from_secs(suggest_timeout_secs),
            cache,
        }
    }

    /// Resolve a free-text address to its single best match.
    ///
    /// Transport errors, non-success responses, timeouts, and empty result
    /// sets all resolve to `None`; the caller decides whether that is fatal.
    pub async fn resolve(&self, address: &str) -> Option<ResolvedPlace> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        if let Some(hit) = self.cache.get(address).await {
            tracing::trace!("geocode cache hit: {}", address);
            return Some(hit);
        }

        let results = match self.search(address, 1, self.resolve_timeout).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("geocoding failed for {:?}: {}", address, e);
                return None;
            }
        };

        let result = results.into_iter().next()?;
        let coordinate = parse_coordinate(&result)?;

        let resolved = ResolvedPlace {
            coordinate,
            formatted_address: result
                .display_name
                .clone()
                .unwrap_or_else(|| address.to_string()),
            city: result.address.city(),
            state: result.address.state(),
            country: result.address.country.clone(),
            postcode: result.address.postcode.clone(),
            area: result.address.area(),
        };

        self.cache
            .insert(address.to_string(), resolved.clone())
            .await;

        Some(resolved)
    }

    /// Autocomplete suggestions for a partial query.
    ///
    /// Queries shorter than two characters short-circuit to an empty list
    /// without touching the network. Suggestions lacking a city or a country
    /// are discarded. Failures degrade to an empty list.
    pub async fn suggest(&self, query: &str, limit: usize) -> Vec<PlaceSuggestion> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let results = match self.search(query, limit, self.suggest_timeout).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("location search failed for {:?}: {}", query, e);
                return Vec::new();
            }
        };

        results
            .into_iter()
            .filter_map(|result| {
                let coordinate = parse_coordinate(&result)?;
                let city = result.address.city()?;
                let country = result.address.country.clone()?;

                Some(PlaceSuggestion {
                    display_name: result.display_name.clone().unwrap_or_default(),
                    city,
                    state: result.address.state(),
                    country,
                    latitude: coordinate.latitude,
                    longitude: coordinate.longitude,
                    kind: result.kind.unwrap_or_else(|| "unknown".to_string()),
                })
            })
            .collect()
    }

    async fn search(
        &self,
        query: &str,
        limit: usize,
        timeout: Duration,
    ) -> Result<Vec<ProviderPlace>, GeocodeError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let limit_param = limit.to_string();

        tracing::debug!("geocoding lookup: {:?} (limit {})", query, limit);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit_param.as_str()),
                ("addressdetails", "1"),
                ("accept-language", "en"),
            ])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}

/// Coordinates come back as strings; a row with unparseable or out-of-range
/// values is dropped rather than surfaced.
fn parse_coordinate(place: &ProviderPlace) -> Option<Coordinate> {
    let lat = place.lat.parse().ok();
    let lng = place.lon.parse().ok();
    Coordinate::from_parts(lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_place(lat: &str, lon: &str) -> ProviderPlace {
        ProviderPlace {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: Some("somewhere".to_string()),
            kind: None,
            address: ProviderAddress::default(),
        }
    }

    #[test]
    fn test_parse_coordinate_rejects_garbage() {
        assert!(parse_coordinate(&provider_place("40.7", "-74.0")).is_some());
        assert!(parse_coordinate(&provider_place("not-a-number", "-74.0")).is_none());
        assert!(parse_coordinate(&provider_place("95.0", "-74.0")).is_none());
    }

    #[test]
    fn test_city_fallback_chain() {
        let address = ProviderAddress {
            town: Some("Smallville".to_string()),
            village: Some("Even Smaller".to_string()),
            ..ProviderAddress::default()
        };
        assert_eq!(address.city(), Some("Smallville".to_string()));

        let address = ProviderAddress {
            municipality: Some("Metro".to_string()),
            ..ProviderAddress::default()
        };
        assert_eq!(address.city(), Some("Metro".to_string()));
    }

    #[test]
    fn test_state_and_area_fallback_chains() {
        let address = ProviderAddress {
            province: Some("Ontario".to_string()),
            neighbourhood: Some("The Annex".to_string()),
            ..ProviderAddress::default()
        };
        assert_eq!(address.state(), Some("Ontario".to_string()));
        assert_eq!(address.area(), Some("The Annex".to_string()));
    }

    #[test]
    fn test_resolved_place_to_place() {
        let resolved = ResolvedPlace {
            coordinate: Coordinate::new(52.52, 13.405),
            formatted_address: "Berlin, Germany".to_string(),
            city: Some("Berlin".to_string()),
            state: None,
            country: Some("Germany".to_string()),
            postcode: Some("10117".to_string()),
            area: None,
        };

        let place = resolved.to_place();
        assert_eq!(place.city.as_deref(), Some("Berlin"));
        assert_eq!(place.formatted_address.as_deref(), Some("Berlin, Germany"));
    }
}
