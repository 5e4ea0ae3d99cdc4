mod geo;
mod geom;
mod interchange;
mod network;
mod projection;

use serde_json::{Value, json};

/// Two lines crossing at a three-platform interchange ("Hub"), plus a single-platform terminus.
///
/// ```text
///   P0 (Alpha) -- P1 (Hub) -- P4 (Gamma)        line A
///   P5 (Delta) -- P2 (Hub) -- P6 (Epsilon)      line B
///                 P3 (Hub)                      no spans
/// ```
pub(crate) fn hub_feed() -> Value {
    json!({
        "platforms": [
            { "name": "Alpha", "location": [59.90, 30.30] },
            { "name": "Hub A", "altNames": { "en": "Hub A (en)" }, "location": [59.93, 30.33] },
            { "name": "Hub B", "location": { "lat": 59.931, "lng": 30.334 } },
            { "name": "Hub C", "location": [59.929, 30.335] },
            { "name": "Gamma", "location": [59.96, 30.36] },
            { "name": "Delta", "location": [59.95, 30.31] },
            { "name": "Epsilon", "location": [59.91, 30.37] }
        ],
        "stations": [
            { "platforms": [0] },
            { "name": "Hub", "altNames": { "fi": "Keskus" }, "platforms": [1, 2, 3] },
            { "platforms": [4] },
            { "platforms": [5] },
            { "platforms": [6] }
        ],
        "spans": [
            { "source": 0, "target": 1, "routes": [0] },
            { "source": 1, "target": 4, "routes": [0] },
            { "source": 5, "target": 2, "routes": [1] },
            { "source": 2, "target": 6, "routes": [1] }
        ],
        "transfers": [
            { "source": 1, "target": 2 },
            { "source": 2, "target": 3 },
            { "source": 3, "target": 1 }
        ],
        "routes": [
            { "line": "A", "spans": [0, 1] },
            { "line": "B", "color": "#0a0", "spans": [2, 3] }
        ],
        "lines": { "A": "#d00", "B": { "color": "#00d" } }
    })
}
