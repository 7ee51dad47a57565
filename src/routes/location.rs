use crate::config::SearchSettings;
use crate::core::{filter_by_bounds, filter_by_radius, obfuscate, sort_listings, DEFAULT_OFFSET_MILES};
use crate::models::{
    is_valid_coordinate, BoundingBox, ContactInfo, Coordinate, CoordinateSearchQuery,
    ErrorResponse, HealthResponse, ListingType, ListingWithDistance, LocalStats,
    LocationUpdateRequest, LocationUpdateResponse, MapListing, MapQuery, NearbyQuery, SortKey,
    SortOrder, StatsQuery, SuggestQuery, UserLocationResponse, ValidateLocationRequest,
    ValidateLocationResponse,
};
use crate::services::{contact, CatalogClient, CatalogError, ListingFilter, NominatimClient};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<NominatimClient>,
    pub catalog: Arc<CatalogClient>,
    pub search: SearchSettings,
}

/// Configure health and location routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/location")
            .route("/validate", web::post().to(validate_location))
            .route("/suggest", web::get().to(suggest_locations))
            .route("/nearby", web::get().to(nearby_listings))
            .route("/search", web::get().to(coordinate_search))
            .route("/map", web::get().to(map_listings))
            .route("/stats", web::get().to(local_stats))
            .route("/contact/{listing_id}", web::get().to(listing_contact_info))
            .route("/user/{user_id}", web::get().to(user_location))
            .route("/user/{user_id}", web::put().to(update_user_location)),
    );
}

/// Clients send "all" as a no-filter sentinel.
pub(crate) fn normalize_filter(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "all")
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_healthy = state.catalog.health_check().await;
    let status = if catalog_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Relocate an actor from a free-text address
///
/// PUT /api/v1/location/user/{user_id}
async fn update_user_location(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<LocationUpdateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = path.into_inner();

    let resolved = match state.geocoder.resolve(&req.address).await {
        Some(resolved) => resolved,
        None => {
            tracing::info!("address did not resolve for {}: {:?}", user_id, req.address);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "location_not_found".to_string(),
                message: "Could not find location. Please try a different address.".to_string(),
                status_code: 400,
            });
        }
    };

    let search_radius = req
        .search_radius
        .unwrap_or(state.search.default_radius_miles);
    let place = resolved.to_place();

    if let Err(e) = state
        .catalog
        .update_user_location(
            &user_id,
            &place,
            resolved.coordinate,
            req.location_precision,
            search_radius,
        )
        .await
    {
        tracing::error!("Failed to store location for {}: {}", user_id, e);
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Failed to update location".to_string(),
            message: e.to_string(),
            status_code: 500,
        });
    }

    HttpResponse::Ok().json(LocationUpdateResponse {
        message: "Location updated successfully".to_string(),
        location: place,
        coordinates: resolved.coordinate,
        search_radius,
    })
}

/// Validate a draft place before registration commits to it
///
/// POST /api/v1/location/validate
///
/// A failed lookup is a `valid: false` payload, never an error status;
/// the registration caller fails closed on it.
async fn validate_location(
    state: web::Data<AppState>,
    req: web::Json<ValidateLocationRequest>,
) -> impl Responder {
    let missing = req.location.missing_required_fields();
    if !missing.is_empty() {
        return HttpResponse::Ok().json(ValidateLocationResponse::invalid(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let query = req.location.geocode_query();
    match state.geocoder.resolve(&query).await {
        Some(resolved) => {
            let formatted = resolved.formatted_address.clone();
            HttpResponse::Ok().json(ValidateLocationResponse {
                valid: true,
                geocoded: Some(resolved),
                formatted_address: Some(formatted),
                error: None,
            })
        }
        None => HttpResponse::Ok().json(ValidateLocationResponse::invalid(
            "Could not find this location. Please check your spelling.",
        )),
    }
}

/// Location autocomplete
///
/// GET /api/v1/location/suggest?q=ber&limit=5
async fn suggest_locations(
    state: web::Data<AppState>,
    query: web::Query<SuggestQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let suggestions = state.geocoder.suggest(&query.q, query.limit).await;
    HttpResponse::Ok().json(suggestions)
}

/// Listings within the actor's radius, nearest first
///
/// GET /api/v1/location/nearby?userId=...&radius=10
async fn nearby_listings(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let actor = match state.catalog.get_actor(&query.user_id).await {
        Ok(actor) => actor,
        Err(e) => return catalog_error_response("Failed to fetch user", e),
    };

    let origin = match actor.coordinate() {
        Some(origin) => origin,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "location_not_set".to_string(),
                message: "User location not set. Please update your location first."
                    .to_string(),
                status_code: 400,
            });
        }
    };

    let radius = query
        .radius
        .or(actor.search_radius)
        .unwrap_or(state.search.default_radius_miles);

    let filter = ListingFilter {
        category: normalize_filter(query.category.clone()),
        listing_type: normalize_filter(query.listing_type.clone()),
        ..ListingFilter::default()
    };

    let listings = match state.catalog.active_listings(&filter).await {
        Ok(listings) => listings,
        Err(e) => return catalog_error_response("Failed to query listings", e),
    };

    let mut nearby = filter_by_radius(origin, radius, &listings);
    sort_listings(&mut nearby, SortKey::Distance, SortOrder::Asc);
    nearby.truncate(query.limit);

    tracing::debug!(
        "nearby: {} of {} listings within {} miles of {}",
        nearby.len(),
        listings.len(),
        radius,
        query.user_id
    );

    let response: Vec<ListingWithDistance> =
        nearby.into_iter().map(ListingWithDistance::from).collect();
    HttpResponse::Ok().json(response)
}

/// Direct coordinate search, no stored actor required
///
/// GET /api/v1/location/search?lat=40.7&lng=-74.0&radius=25
async fn coordinate_search(
    state: web::Data<AppState>,
    query: web::Query<CoordinateSearchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // Reject malformed coordinates before any distance work.
    if !is_valid_coordinate(query.lat, query.lng) {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_coordinates".to_string(),
            message: "Invalid coordinates".to_string(),
            status_code: 400,
        });
    }
    let origin = Coordinate::new(query.lat, query.lng);

    let radius = query.radius.unwrap_or(state.search.default_radius_miles);
    let filter = ListingFilter {
        category: normalize_filter(query.category.clone()),
        listing_type: normalize_filter(query.listing_type.clone()),
        organic_only: query.organic_only,
        ..ListingFilter::default()
    };

    let listings = match state.catalog.active_listings(&filter).await {
        Ok(listings) => listings,
        Err(e) => return catalog_error_response("Failed to query listings", e),
    };

    let mut nearby = filter_by_radius(origin, radius, &listings);
    sort_listings(&mut nearby, SortKey::Distance, SortOrder::Asc);
    nearby.truncate(query.limit);

    let response: Vec<ListingWithDistance> =
        nearby.into_iter().map(ListingWithDistance::from).collect();
    HttpResponse::Ok().json(response)
}

/// Map viewport pins
///
/// GET /api/v1/location/map?bounds=swLat,swLng,neLat,neLng&viewerId=...
///
/// Pins not owned by the viewer carry privacy-degraded coordinates.
async fn map_listings(state: web::Data<AppState>, query: web::Query<MapQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let bounds: BoundingBox = match query.bounds.parse() {
        Ok(bounds) => bounds,
        Err(e) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_bounds".to_string(),
                message: format!("Invalid bounds format. Use: swLat,swLng,neLat,neLng ({})", e),
                status_code: 400,
            });
        }
    };

    let filter = ListingFilter {
        category: normalize_filter(query.category.clone()),
        listing_type: normalize_filter(query.listing_type.clone()),
        ..ListingFilter::default()
    };

    let listings = match state.catalog.active_listings(&filter).await {
        Ok(listings) => listings,
        Err(e) => return catalog_error_response("Failed to query listings", e),
    };

    let pins: Vec<MapListing> = filter_by_bounds(&bounds, &listings, query.limit)
        .into_iter()
        .filter_map(|listing| {
            let coordinate = listing.coordinate()?;
            let owned = query.viewer_id.as_deref() == Some(listing.owner_id.as_str());
            let shown = if owned {
                coordinate
            } else {
                obfuscate(coordinate, DEFAULT_OFFSET_MILES)
            };

            Some(MapListing {
                id: listing.id.clone(),
                title: listing.title.clone(),
                category: listing.category.clone(),
                listing_type: listing.listing_type,
                price: listing.price,
                latitude: shown.latitude,
                longitude: shown.longitude,
                image: listing.images.first().cloned(),
                owner_name: listing.owner_name.clone(),
            })
        })
        .collect();

    HttpResponse::Ok().json(pins)
}

/// An actor's own location view
///
/// GET /api/v1/location/user/{user_id}
async fn user_location(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    let actor = match state.catalog.get_actor(&user_id).await {
        Ok(actor) => actor,
        Err(e) => return catalog_error_response("Failed to fetch user", e),
    };

    let coordinates = actor.coordinate();
    HttpResponse::Ok().json(UserLocationResponse {
        location: actor.location.clone(),
        has_location: coordinates.is_some(),
        coordinates,
        location_precision: actor.location_precision,
        search_radius: actor.radius_miles(),
    })
}

/// Local listing counts for the actor's area
///
/// GET /api/v1/location/stats?userId=...
async fn local_stats(state: web::Data<AppState>, query: web::Query<StatsQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let actor = match state.catalog.get_actor(&query.user_id).await {
        Ok(actor) => actor,
        Err(e) => return catalog_error_response("Failed to fetch user", e),
    };

    let origin = match actor.coordinate() {
        Some(origin) => origin,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "location_not_set".to_string(),
                message: "Set your location to see local statistics".to_string(),
                status_code: 400,
            });
        }
    };

    let listings = match state.catalog.active_listings(&ListingFilter::default()).await {
        Ok(listings) => listings,
        Err(e) => return catalog_error_response("Failed to query listings", e),
    };

    let radius = actor.radius_miles();
    let local = filter_by_radius(origin, radius, &listings);

    let count_type = |t: ListingType| {
        local
            .iter()
            .filter(|d| d.listing.listing_type == t)
            .count()
    };

    HttpResponse::Ok().json(LocalStats {
        total_local_listings: local.len(),
        for_sale_count: count_type(ListingType::ForSale),
        give_away_count: count_type(ListingType::GiveAway),
        looking_for_count: count_type(ListingType::LookingFor),
        organic_count: local.iter().filter(|d| d.listing.organic).count(),
        search_radius: radius,
        user_location: actor
            .location
            .as_ref()
            .map(|place| place.display_label())
            .unwrap_or_else(|| "Location not specified".to_string()),
    })
}

/// Contact channels for a listing's owner
///
/// GET /api/v1/location/contact/{listing_id}
async fn listing_contact_info(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let listing_id = path.into_inner();

    let listing = match state.catalog.get_listing(&listing_id).await {
        Ok(listing) => listing,
        Err(e) => return catalog_error_response("Failed to fetch listing", e),
    };

    let owner = match state.catalog.get_actor(&listing.owner_id).await {
        Ok(owner) => owner,
        Err(e) => {
            // Platform messaging still works when the owner record is
            // unavailable; only the direct channel is withheld.
            tracing::warn!("owner lookup failed for listing {}: {}", listing_id, e);
            return HttpResponse::Ok().json(ContactInfo {
                can_message: true,
                can_whatsapp: false,
                whatsapp_url: None,
            });
        }
    };

    let can_whatsapp = owner.show_whatsapp_on_listings
        && owner
            .whatsapp_number
            .as_deref()
            .map(contact::is_valid_phone)
            .unwrap_or(false);

    let whatsapp_url = if can_whatsapp {
        let message = contact::listing_inquiry_message(&listing.title);
        owner
            .whatsapp_number
            .as_deref()
            .map(|number| contact::whatsapp_url(number, Some(&message)))
    } else {
        None
    };

    HttpResponse::Ok().json(ContactInfo {
        can_message: true,
        can_whatsapp,
        whatsapp_url,
    })
}

/// Map catalog failures onto the wire error shape.
fn catalog_error_response(context: &str, e: CatalogError) -> HttpResponse {
    match e {
        CatalogError::NotFound(what) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("Not found: {}", what),
            status_code: 404,
        }),
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: context.to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_normalize_filter_drops_all_sentinel() {
        assert_eq!(normalize_filter(Some("all".to_string())), None);
        assert_eq!(normalize_filter(Some(String::new())), None);
        assert_eq!(
            normalize_filter(Some("produce".to_string())),
            Some("produce".to_string())
        );
        assert_eq!(normalize_filter(None), None);
    }
}
