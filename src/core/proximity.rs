use crate::core::distance::MILES_TO_KM;
use crate::models::{BoundingBox, Coordinate, DistancedListing, Listing, SortKey, SortOrder};
use std::cmp::Ordering;

/// Filter candidates to those within `radius_miles` of `origin`, annotating
/// each survivor with its distance.
///
/// Candidates without coordinates are skipped silently. The boundary is
/// inclusive: a candidate at exactly `radius_miles` is kept. Input order is
/// preserved among the survivors.
pub fn filter_by_radius(
    origin: Coordinate,
    radius_miles: u32,
    candidates: &[Listing],
) -> Vec<DistancedListing> {
    let radius = radius_miles as f64;

    candidates
        .iter()
        .filter_map(|listing| {
            let coordinate = listing.coordinate()?;
            let distance = origin.distance_miles(&coordinate);
            if distance <= radius {
                Some(DistancedListing {
                    listing: listing.clone(),
                    distance_miles: Some(distance),
                    distance_km: Some(distance * MILES_TO_KM),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Attach empty distance annotations, for queries without an origin.
pub fn without_distance(candidates: &[Listing]) -> Vec<DistancedListing> {
    candidates
        .iter()
        .map(|listing| DistancedListing {
            listing: listing.clone(),
            distance_miles: None,
            distance_km: None,
        })
        .collect()
}

/// Sort annotated listings by the requested key and order.
///
/// The sort is stable, so equal-keyed entries keep their input order.
/// Listings with no price sort as if the price were zero; listings with no
/// distance annotation sort as infinitely far.
pub fn sort_listings(items: &mut [DistancedListing], key: SortKey, order: SortOrder) {
    let compare = |a: &DistancedListing, b: &DistancedListing| -> Ordering {
        match key {
            SortKey::CreatedDate => a.listing.created_at.cmp(&b.listing.created_at),
            SortKey::Price => {
                let pa = a.listing.price.unwrap_or(0.0);
                let pb = b.listing.price.unwrap_or(0.0);
                pa.partial_cmp(&pb).unwrap_or(Ordering::Equal)
            }
            SortKey::ViewCount => a.listing.view_count.cmp(&b.listing.view_count),
            SortKey::Distance => {
                let da = a.distance_miles.unwrap_or(f64::INFINITY);
                let db = b.distance_miles.unwrap_or(f64::INFINITY);
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            }
        }
    };

    match order {
        SortOrder::Asc => items.sort_by(compare),
        SortOrder::Desc => items.sort_by(|a, b| compare(b, a)),
    }
}

/// Filter candidates to those inside the bounding box, stopping once `cap`
/// results have been collected.
///
/// Iteration is in input order, and all four box edges are inclusive. Once
/// the cap is hit the scan stops, so callers must not assume every matching
/// candidate is returned, only that each returned one matches.
pub fn filter_by_bounds<'a>(
    bounds: &BoundingBox,
    candidates: &'a [Listing],
    cap: usize,
) -> Vec<&'a Listing> {
    let mut inside = Vec::new();

    for listing in candidates {
        if let Some(coordinate) = listing.coordinate() {
            if bounds.contains(coordinate.latitude, coordinate.longitude) {
                inside.push(listing);
                if inside.len() >= cap {
                    break;
                }
            }
        }
    }

    inside
}
