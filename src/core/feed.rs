use crate::models::{Coordinate, Listing};

/// Oversampling multiple applied to the feed window so that truncation after
/// blending can still fill the page.
pub const FEED_OVERSAMPLE: usize = 3;

/// Compose a local-first feed from a newest-first window.
///
/// With no origin this is a pure recency feed: the first `limit` items of
/// the window, unchanged. With an origin the window is partitioned into
/// in-radius listings and everything else (out of radius or no coordinates),
/// each group keeping its newest-first order, then concatenated local-first
/// and truncated. Local content therefore always leads, but a scarcity of
/// local listings never empties the feed.
pub fn blend_local_first(
    origin: Option<Coordinate>,
    radius_miles: u32,
    window: &[Listing],
    limit: usize,
) -> Vec<Listing> {
    let origin = match origin {
        Some(origin) => origin,
        None => return window.iter().take(limit).cloned().collect(),
    };

    let radius = radius_miles as f64;
    let mut local = Vec::new();
    let mut other = Vec::new();

    for listing in window {
        let in_radius = listing
            .coordinate()
            .map(|coordinate| origin.distance_miles(&coordinate) <= radius)
            .unwrap_or(false);

        if in_radius {
            local.push(listing.clone());
        } else {
            other.push(listing.clone());
        }
    }

    local.extend(other);
    local.truncate(limit);
    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingType, Place};
    use chrono::{Duration, TimeZone, Utc};

    fn listing(id: &str, lat: Option<f64>, lng: Option<f64>, age_hours: i64) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Listing {}", id),
            category: "produce".to_string(),
            listing_type: ListingType::ForSale,
            price: Some(5.0),
            view_count: 0,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
                - Duration::hours(age_hours),
            organic: false,
            location: Place {
                city: Some("New York".to_string()),
                country: Some("United States".to_string()),
                ..Place::default()
            },
            latitude: lat,
            longitude: lng,
            owner_id: "owner-1".to_string(),
            owner_name: None,
            images: vec![],
        }
    }

    #[test]
    fn test_no_origin_returns_window_prefix() {
        let window = vec![
            listing("1", Some(40.72), Some(-74.01), 0),
            listing("2", None, None, 1),
            listing("3", Some(51.5), Some(-0.12), 2),
        ];

        let feed = blend_local_first(None, 25, &window, 2);
        let ids: Vec<&str> = feed.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_local_listings_lead_the_feed() {
        let origin = Coordinate::new(40.7128, -74.0060);
        // Window is newest-first; the far listing is newest.
        let window = vec![
            listing("far", Some(51.5074), Some(-0.1278), 0),
            listing("near", Some(40.7306), Some(-73.9352), 1),
            listing("no-coords", None, None, 2),
        ];

        let feed = blend_local_first(Some(origin), 25, &window, 10);
        let ids: Vec<&str> = feed.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "far", "no-coords"]);
    }

    #[test]
    fn test_groups_keep_relative_recency_order() {
        let origin = Coordinate::new(40.7128, -74.0060);
        let window = vec![
            listing("near-new", Some(40.72), Some(-74.01), 0),
            listing("far-new", Some(51.5), Some(-0.12), 1),
            listing("near-old", Some(40.73), Some(-73.99), 2),
            listing("far-old", Some(48.85), Some(2.35), 3),
        ];

        let feed = blend_local_first(Some(origin), 25, &window, 10);
        let ids: Vec<&str> = feed.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["near-new", "near-old", "far-new", "far-old"]);
    }

    #[test]
    fn test_scarce_local_content_never_empties_feed() {
        let origin = Coordinate::new(40.7128, -74.0060);
        let window = vec![
            listing("far-1", Some(51.5), Some(-0.12), 0),
            listing("far-2", Some(48.85), Some(2.35), 1),
        ];

        let feed = blend_local_first(Some(origin), 25, &window, 2);
        assert_eq!(feed.len(), 2);
    }

    #[test]
    fn test_truncates_to_limit() {
        let origin = Coordinate::new(40.7128, -74.0060);
        let window: Vec<Listing> = (0..10)
            .map(|i| listing(&i.to_string(), Some(40.72), Some(-74.01), i))
            .collect();

        let feed = blend_local_first(Some(origin), 25, &window, 4);
        assert_eq!(feed.len(), 4);
    }
}
