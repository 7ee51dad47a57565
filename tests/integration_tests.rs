// Integration tests for the geo discovery core

use chrono::{Duration, TimeZone, Utc};
use freshtrade_geo::core::{
    blend_local_first, filter_by_bounds, filter_by_radius, haversine_km, haversine_miles,
    obfuscate, sort_listings, without_distance, DEFAULT_OFFSET_MILES, MILES_TO_KM,
};
use freshtrade_geo::models::{
    is_valid_coordinate, BoundingBox, Coordinate, Listing, ListingType, Place, SortKey,
    SortOrder,
};
use freshtrade_geo::services::contact;

fn test_listing(id: &str, lat: Option<f64>, lng: Option<f64>, age_hours: i64) -> Listing {
    Listing {
        id: id.to_string(),
        title: format!("Listing {}", id),
        category: "produce".to_string(),
        listing_type: ListingType::ForSale,
        price: Some(12.0),
        view_count: 0,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() - Duration::hours(age_hours),
        organic: false,
        location: Place {
            city: Some("New York".to_string()),
            country: Some("United States".to_string()),
            ..Place::default()
        },
        latitude: lat,
        longitude: lng,
        owner_id: format!("owner-{}", id),
        owner_name: None,
        images: vec![],
    }
}

#[test]
fn test_new_york_proximity_scenario() {
    // Origin: lower Manhattan. Candidate: ~5 miles away in Queens.
    let origin = Coordinate::new(40.7128, -74.0060);
    let candidates = vec![test_listing("queens", Some(40.7306), Some(-73.9352), 0)];

    let within_ten = filter_by_radius(origin, 10, &candidates);
    assert_eq!(within_ten.len(), 1);
    let distance = within_ten[0].distance_miles.unwrap();
    assert!(
        (4.4..=5.0).contains(&distance),
        "expected ~4.4-5.0 miles, got {}",
        distance
    );

    let within_three = filter_by_radius(origin, 3, &candidates);
    assert!(within_three.is_empty());
}

#[test]
fn test_km_annotation_matches_conversion() {
    let origin = Coordinate::new(40.7128, -74.0060);
    let candidates = vec![test_listing("queens", Some(40.7306), Some(-73.9352), 0)];

    let result = filter_by_radius(origin, 10, &candidates);
    let miles = result[0].distance_miles.unwrap();
    let km = result[0].distance_km.unwrap();
    assert!((km - miles * MILES_TO_KM).abs() < 1e-9);

    assert!(
        (haversine_km(40.7128, -74.0060, 40.7306, -73.9352)
            - haversine_miles(40.7128, -74.0060, 40.7306, -73.9352) * MILES_TO_KM)
            .abs()
            < 1e-9
    );
}

#[test]
fn test_coordinate_less_listings_never_error() {
    let origin = Coordinate::new(40.7128, -74.0060);
    let candidates = vec![
        test_listing("ok", Some(40.72), Some(-74.01), 0),
        test_listing("missing", None, None, 1),
        test_listing("half", Some(40.72), None, 2),
    ];

    let result = filter_by_radius(origin, 25, &candidates);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].listing.id, "ok");
}

#[test]
fn test_feed_blending_end_to_end() {
    let origin = Coordinate::new(40.7128, -74.0060);
    // Newest-first window mixing local, remote, and unlocated listings.
    let window = vec![
        test_listing("remote-newest", Some(51.5074), Some(-0.1278), 0),
        test_listing("local-1", Some(40.7306), Some(-73.9352), 1),
        test_listing("unlocated", None, None, 2),
        test_listing("local-2", Some(40.7580), Some(-73.9855), 3),
    ];

    let feed = blend_local_first(Some(origin), 25, &window, 10);
    let ids: Vec<&str> = feed.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["local-1", "local-2", "remote-newest", "unlocated"]);

    // An out-of-radius listing never precedes an in-radius one.
    let last_local = ids.iter().rposition(|id| id.starts_with("local")).unwrap();
    let first_other = ids.iter().position(|id| !id.starts_with("local")).unwrap();
    assert!(last_local < first_other);

    // Without an origin the window prefix comes back unchanged.
    let plain = blend_local_first(None, 25, &window, 2);
    let ids: Vec<&str> = plain.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["remote-newest", "local-1"]);
}

#[test]
fn test_map_bounds_pipeline() {
    let bounds: BoundingBox = "40.5,-74.3,40.9,-73.7".parse().unwrap();
    let candidates = vec![
        test_listing("in-1", Some(40.7128), Some(-74.0060), 0),
        test_listing("out", Some(42.0), Some(-74.0), 1),
        test_listing("in-2", Some(40.73), Some(-73.93), 2),
        test_listing("in-3", Some(40.6), Some(-74.1), 3),
    ];

    let pins = filter_by_bounds(&bounds, &candidates, 2);
    let ids: Vec<&str> = pins.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["in-1", "in-2"]);
}

#[test]
fn test_search_sorting_contracts() {
    let mut items = without_distance(&[
        {
            let mut l = test_listing("cheap", Some(40.72), Some(-74.01), 2);
            l.price = Some(3.0);
            l.view_count = 10;
            l
        },
        {
            let mut l = test_listing("free", Some(40.72), Some(-74.01), 1);
            l.price = None;
            l.view_count = 30;
            l
        },
        {
            let mut l = test_listing("dear", Some(40.72), Some(-74.01), 0);
            l.price = Some(40.0);
            l.view_count = 20;
            l
        },
    ]);

    sort_listings(&mut items, SortKey::Price, SortOrder::Asc);
    let ids: Vec<&str> = items.iter().map(|d| d.listing.id.as_str()).collect();
    assert_eq!(ids, vec!["free", "cheap", "dear"]);

    sort_listings(&mut items, SortKey::ViewCount, SortOrder::Desc);
    let ids: Vec<&str> = items.iter().map(|d| d.listing.id.as_str()).collect();
    assert_eq!(ids, vec!["free", "dear", "cheap"]);

    sort_listings(&mut items, SortKey::CreatedDate, SortOrder::Desc);
    let ids: Vec<&str> = items.iter().map(|d| d.listing.id.as_str()).collect();
    assert_eq!(ids, vec!["dear", "free", "cheap"]);
}

#[test]
fn test_privacy_offset_bounds() {
    let original = Coordinate::new(40.7128, -74.0060);

    for _ in 0..100 {
        let fuzzed = obfuscate(original, DEFAULT_OFFSET_MILES);
        assert!(fuzzed.is_valid());
        // Independent per-axis offsets give at most offset * sqrt(2).
        assert!(original.distance_miles(&fuzzed) <= 0.75);
    }
}

#[test]
fn test_coordinate_validation_bounds() {
    assert!(!is_valid_coordinate(91.0, 0.0));
    assert!(is_valid_coordinate(45.0, -180.0));
    assert!(is_valid_coordinate(-90.0, 180.0));
}

#[test]
fn test_contact_identifier_normalization() {
    let digits = contact::normalize_phone("+1 (555) 123-4567");
    assert_eq!(digits, "15551234567");
    assert_eq!(digits.len(), 11);
    assert!(contact::is_valid_phone("+1 (555) 123-4567"));

    let url = contact::whatsapp_url("+1 (555) 123-4567", None);
    assert_eq!(url, "https://wa.me/15551234567");
}
