use crate::geo::*;

#[test]
fn haversine_matches_known_distance() {
    // One degree of latitude is ~111.19 km on the mean sphere.
    let d = haversine_distance(LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0));
    assert!((d - 111_194.9).abs() < 1.0, "{d}");
    assert_eq!(haversine_distance(LatLng::new(60.0, 30.0), LatLng::new(60.0, 30.0)), 0.0);
}

#[test]
fn cumulative_distances_accumulate() {
    let pts = [
        LatLng::new(0.0, 0.0),
        LatLng::new(1.0, 0.0),
        LatLng::new(2.0, 0.0),
    ];
    let d = cumulative_distances(&pts);
    assert_eq!(d.len(), 3);
    assert_eq!(d[0], 0.0);
    assert!((d[2] - 2.0 * d[1]).abs() < 1e-6);
    assert!(cumulative_distances(&[]).is_empty());
}

#[test]
fn format_distance_switches_units() {
    assert_eq!(format_distance(0.0), "0 m");
    assert_eq!(format_distance(999.4), "999 m");
    assert_eq!(format_distance(1234.0), "1.234 km");
    assert_eq!(format_distance(2000.0), "2 km");
    assert_eq!(format_distance(12_345.0), "12.35 km");
}

#[test]
fn latlng_accepts_pair_and_object() {
    let a: LatLng = serde_json::from_str("[59.9, 30.3]").unwrap();
    let b: LatLng = serde_json::from_str(r#"{ "lat": 59.9, "lng": 30.3 }"#).unwrap();
    assert_eq!(a, b);
    assert_eq!(serde_json::to_string(&a).unwrap(), "[59.9,30.3]");
}

#[test]
fn geo_bounds_corners() {
    let b = GeoBounds::from_points([LatLng::new(59.0, 31.0), LatLng::new(60.0, 30.0)]).unwrap();
    assert_eq!(b.north_west(), LatLng::new(60.0, 30.0));
    assert_eq!(b.south_east(), LatLng::new(59.0, 31.0));
    assert_eq!(b.center(), LatLng::new(59.5, 30.5));
    assert!(GeoBounds::from_points(std::iter::empty()).is_none());
}
