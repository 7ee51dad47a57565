use crate::core::{blend_local_first, filter_by_radius, sort_listings, without_distance};
use crate::models::{
    ErrorResponse, FeedQuery, ListingSearchQuery, ListingWithDistance, SortKey,
};
use crate::routes::location::AppState;
use crate::services::{CatalogError, ListingFilter};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure listing search and feed routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/listings")
            .route("", web::get().to(search_listings))
            .route("/feed", web::get().to(feed)),
    );
}

/// General listing search with optional proximity filtering
///
/// GET /api/v1/listings?search=&category=&nearMe=true&sortBy=price&sortOrder=asc
///
/// `nearMe` restricts results to the actor's radius and enables distance
/// sorting; without it, distance is neither computed nor a usable sort key
/// and the catalog's newest-first order is kept for unsorted keys.
async fn search_listings(
    state: web::Data<AppState>,
    query: web::Query<ListingSearchQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let filter = ListingFilter {
        category: super::location::normalize_filter(query.category.clone()),
        listing_type: super::location::normalize_filter(query.listing_type.clone()),
        organic_only: query.organic_only,
        search: query.search.clone(),
        location: query.location.clone(),
    };

    let listings = match state.catalog.active_listings(&filter).await {
        Ok(listings) => listings,
        Err(e) => return search_error(e),
    };

    // Resolve the actor's origin only when proximity filtering is on.
    let origin = if query.near_me {
        let user_id = match &query.user_id {
            Some(user_id) => user_id,
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "missing_user".to_string(),
                    message: "nearMe requires userId".to_string(),
                    status_code: 400,
                });
            }
        };

        let actor = match state.catalog.get_actor(user_id).await {
            Ok(actor) => actor,
            Err(e) => return search_error(e),
        };

        match actor.coordinate() {
            Some(origin) => Some((origin, query.radius.unwrap_or(actor.radius_miles()))),
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "location_not_set".to_string(),
                    message: "User location not set. Please update your location first."
                        .to_string(),
                    status_code: 400,
                });
            }
        }
    } else {
        None
    };

    let mut results = match origin {
        Some((origin, radius)) => filter_by_radius(origin, radius, &listings),
        None => without_distance(&listings),
    };

    // Distance is only meaningful under nearMe; otherwise keep the
    // catalog's newest-first order.
    if query.sort_by != SortKey::Distance || origin.is_some() {
        sort_listings(&mut results, query.sort_by, query.sort_order);
    }

    let page: Vec<ListingWithDistance> = results
        .into_iter()
        .skip(query.skip)
        .take(query.limit)
        .map(ListingWithDistance::from)
        .collect();

    HttpResponse::Ok().json(page)
}

/// Local-first blended feed
///
/// GET /api/v1/listings/feed?limit=20&userId=...
///
/// Without a user (or without a stored location) this degrades to a pure
/// recency feed. The window is oversampled so truncation after blending
/// can still fill the page.
async fn feed(state: web::Data<AppState>, query: web::Query<FeedQuery>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let window_size = query.limit * state.search.feed_oversample;
    let window = match state.catalog.recent_listings(window_size).await {
        Ok(window) => window,
        Err(e) => return search_error(e),
    };

    let (origin, radius) = match &query.user_id {
        Some(user_id) => match state.catalog.get_actor(user_id).await {
            Ok(actor) => (actor.coordinate(), actor.radius_miles()),
            Err(e) => {
                // The feed never fails because the actor lookup did; it
                // just loses its local-first ordering.
                tracing::warn!("feed actor lookup failed for {}: {}", user_id, e);
                (None, state.search.default_radius_miles)
            }
        },
        None => (None, state.search.default_radius_miles),
    };

    let blended = blend_local_first(origin, radius, &window, query.limit);

    tracing::debug!(
        "feed: {} items from a window of {} (origin: {})",
        blended.len(),
        window.len(),
        origin.is_some()
    );

    HttpResponse::Ok().json(blended)
}

fn search_error(e: CatalogError) -> HttpResponse {
    match e {
        CatalogError::NotFound(what) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("Not found: {}", what),
            status_code: 404,
        }),
        other => {
            tracing::error!("catalog query failed: {}", other);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to fetch listings".to_string(),
                message: other.to_string(),
                status_code: 500,
            })
        }
    }
}
