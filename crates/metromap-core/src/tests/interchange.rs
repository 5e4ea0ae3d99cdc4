use super::hub_feed;
use crate::*;
use serde_json::json;

fn graph(feed: serde_json::Value) -> Graph {
    Graph::from_json(&feed.to_string()).unwrap()
}

#[test]
fn triangle_of_transfers_is_a_cluster() {
    let g = graph(hub_feed());
    assert_eq!(
        find_interchange_cluster(&g, StationId(1)),
        Some(vec![PlatformId(1), PlatformId(2), PlatformId(3)])
    );
}

#[test]
fn single_platform_station_never_clusters() {
    let g = graph(hub_feed());
    assert_eq!(find_interchange_cluster(&g, StationId(0)), None);
}

#[test]
fn open_chain_of_transfers_is_not_a_cluster() {
    let mut feed = hub_feed();
    feed["transfers"] = json!([
        { "source": 1, "target": 2 },
        { "source": 2, "target": 3 }
    ]);
    let g = graph(feed);
    assert_eq!(find_interchange_cluster(&g, StationId(1)), None);
}

#[test]
fn transfers_to_other_stations_do_not_count() {
    let mut feed = hub_feed();
    feed["transfers"] = json!([
        { "source": 1, "target": 2 },
        { "source": 2, "target": 0 },
        { "source": 0, "target": 1 }
    ]);
    let g = graph(feed);
    assert_eq!(find_interchange_cluster(&g, StationId(1)), None);
}

#[test]
fn largest_clique_wins_in_a_four_platform_station() {
    let feed = json!({
        "platforms": [
            { "name": "a", "location": [0.0, 0.0] },
            { "name": "b", "location": [0.0, 0.001] },
            { "name": "c", "location": [0.001, 0.0] },
            { "name": "d", "location": [0.001, 0.001] }
        ],
        "stations": [ { "name": "s", "platforms": [0, 1, 2, 3] } ],
        "transfers": [
            { "source": 0, "target": 1 },
            { "source": 0, "target": 2 },
            { "source": 1, "target": 2 },
            { "source": 1, "target": 3 },
            { "source": 2, "target": 3 },
            { "source": 0, "target": 3 }
        ]
    });
    let g = graph(feed);
    assert_eq!(
        find_interchange_cluster(&g, StationId(0)),
        Some(vec![PlatformId(0), PlatformId(1), PlatformId(2), PlatformId(3)])
    );
}

#[test]
fn ties_keep_the_first_clique() {
    // Two triangles sharing edge 1-2: {0,1,2} and {1,2,3}.
    let feed = json!({
        "platforms": [
            { "name": "a", "location": [0.0, 0.0] },
            { "name": "b", "location": [0.0, 0.001] },
            { "name": "c", "location": [0.001, 0.0] },
            { "name": "d", "location": [0.001, 0.001] }
        ],
        "stations": [ { "platforms": [0, 1, 2, 3] } ],
        "transfers": [
            { "source": 0, "target": 1 },
            { "source": 0, "target": 2 },
            { "source": 1, "target": 2 },
            { "source": 1, "target": 3 },
            { "source": 2, "target": 3 }
        ]
    });
    let g = graph(feed);
    assert_eq!(
        find_interchange_cluster(&g, StationId(0)),
        Some(vec![PlatformId(0), PlatformId(1), PlatformId(2)])
    );
}
