use super::hub_feed;
use crate::*;
use serde_json::json;

fn load(value: serde_json::Value) -> Result<Graph> {
    Graph::from_json(&value.to_string())
}

#[test]
fn feed_resolves_back_references_and_incident_spans() {
    let g = load(hub_feed()).unwrap();
    assert_eq!(g.platforms().len(), 7);
    assert_eq!(g.platform(PlatformId(2)).station, StationId(1));
    assert_eq!(g.platform(PlatformId(0)).station, StationId(0));
    assert_eq!(
        g.platform(PlatformId(1)).spans,
        vec![SpanId(0), SpanId(1)]
    );
    assert!(g.platform(PlatformId(3)).spans.is_empty());
    assert!(g.platform(PlatformId(1)).is_pass_through());
    assert!(!g.platform(PlatformId(0)).is_pass_through());
}

#[test]
fn station_name_defaults_to_first_platform() {
    let g = load(hub_feed()).unwrap();
    assert_eq!(g.station(StationId(0)).name, "Alpha");
    assert_eq!(g.station(StationId(1)).names(), vec!["Hub", "Keskus"]);
    assert_eq!(
        g.platform(PlatformId(1)).names(),
        vec!["Hub A", "Hub A (en)"]
    );
}

#[test]
fn passing_lines_and_route_colors() {
    let g = load(hub_feed()).unwrap();
    let lines = g.station(StationId(1)).passing_lines(&g);
    assert_eq!(lines.into_iter().collect::<Vec<_>>(), vec!["A", "B"]);

    assert_eq!(g.route_color(RouteId(0)), Some("#d00"));
    // The route's own color wins over the line table.
    assert_eq!(g.route_color(RouteId(1)), Some("#0a0"));
    assert_eq!(g.platform_routes(PlatformId(1)), vec![RouteId(0)]);
}

#[test]
fn neighbor_resolves_the_far_end() {
    let g = load(hub_feed()).unwrap();
    assert_eq!(g.neighbor(PlatformId(1), SpanId(0)), PlatformId(0));
    assert_eq!(g.neighbor(PlatformId(1), SpanId(1)), PlatformId(4));
    assert_eq!(g.neighbor(PlatformId(2), SpanId(2)), PlatformId(5));
}

#[test]
fn station_center_is_mean_of_platforms() {
    let g = load(hub_feed()).unwrap();
    let c = g.station(StationId(1)).center(&g);
    assert!((c.lat - (59.93 + 59.931 + 59.929) / 3.0).abs() < 1e-12);
    assert!((c.lng - (30.33 + 30.334 + 30.335) / 3.0).abs() < 1e-12);
}

#[test]
fn bounds_cover_all_platforms() {
    let g = load(hub_feed()).unwrap();
    let b = g.bounds();
    assert_eq!(b.south_west, LatLng::new(59.90, 30.30));
    assert_eq!(b.north_east, LatLng::new(59.96, 30.37));
    for p in g.platforms() {
        assert!(b.contains(p.location));
    }
}

#[test]
fn dangling_span_endpoint_is_rejected() {
    let mut feed = hub_feed();
    feed["spans"][1]["target"] = json!(42);
    let err = load(feed).unwrap_err();
    assert!(matches!(
        err,
        Error::DanglingReference {
            collection: "spans",
            index: 1,
            field: "target",
            target: 42
        }
    ));
}

#[test]
fn dangling_route_reference_is_rejected() {
    let mut feed = hub_feed();
    feed["spans"][0]["routes"] = json!([7]);
    assert!(matches!(
        load(feed).unwrap_err(),
        Error::DanglingReference { field: "routes", .. }
    ));
}

#[test]
fn platform_outside_every_station_is_rejected() {
    let mut feed = hub_feed();
    feed["stations"][4]["platforms"] = json!([5]);
    feed["stations"][3]["platforms"] = json!([0]);
    let err = load(feed).unwrap_err();
    assert!(matches!(
        err,
        Error::PlatformInSeveralStations {
            platform: 0,
            first: 0,
            second: 3
        }
    ));

    let mut feed = hub_feed();
    feed["stations"][4]["platforms"] = json!([5]);
    feed["stations"][3]["platforms"] = json!([]);
    assert!(matches!(
        load(feed).unwrap_err(),
        Error::StationWithoutPlatforms { station: 3 }
    ));
}

#[test]
fn unowned_platform_is_rejected() {
    let mut feed = hub_feed();
    feed["stations"]
        .as_array_mut()
        .unwrap()
        .pop();
    assert!(matches!(
        load(feed).unwrap_err(),
        Error::PlatformWithoutStation { platform: 6 }
    ));
}

#[test]
fn listed_span_must_touch_platform() {
    let mut feed = hub_feed();
    feed["platforms"][0]["spans"] = json!([0, 3]);
    assert!(matches!(
        load(feed).unwrap_err(),
        Error::SpanNotIncident {
            platform: 0,
            span: 3
        }
    ));

    let mut feed = hub_feed();
    feed["platforms"][1]["spans"] = json!([1, 0]);
    let g = load(feed).unwrap();
    assert_eq!(g.platform(PlatformId(1)).spans, vec![SpanId(1), SpanId(0)]);
}

#[test]
fn malformed_and_empty_feeds_are_errors() {
    assert!(matches!(
        Graph::from_json("{ not json").unwrap_err(),
        Error::Json(_)
    ));
    assert!(matches!(
        load(json!({ "platforms": [], "stations": [] })).unwrap_err(),
        Error::EmptyNetwork
    ));

    let mut feed = hub_feed();
    feed["platforms"][0]["location"] = json!([123.0, 30.0]);
    assert!(matches!(
        load(feed).unwrap_err(),
        Error::InvalidLocation { platform: 0, .. }
    ));
}
