//! Geographic coordinates and distance helpers.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (the value Leaflet-style maps use for `distanceTo`).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LatLngRepr", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Feeds spell locations either as `[lat, lng]` or as `{ "lat": .., "lng": .. }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum LatLngRepr {
    Pair([f64; 2]),
    Object { lat: f64, lng: f64 },
}

impl From<LatLngRepr> for LatLng {
    fn from(value: LatLngRepr) -> Self {
        match value {
            LatLngRepr::Pair([lat, lng]) => Self { lat, lng },
            LatLngRepr::Object { lat, lng } => Self { lat, lng },
        }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(value: LatLng) -> Self {
        [value.lat, value.lng]
    }
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        haversine_distance(*self, *other)
    }
}

/// Axis-aligned geographic box, stored as its south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl GeoBounds {
    pub fn from_point(p: LatLng) -> Self {
        Self {
            south_west: p,
            north_east: p,
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut it = points.into_iter();
        let mut b = Self::from_point(it.next()?);
        for p in it {
            b.extend(p);
        }
        Some(b)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }

    pub fn contains(&self, p: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&p.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&p.lng)
    }
}

/// Arithmetic mean of the given coordinates. Good enough for the footprint of a single station.
pub fn mean(points: &[LatLng]) -> Option<LatLng> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lng) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat, lng + p.lng));
    Some(LatLng::new(lat / n, lng / n))
}

pub fn haversine_distance(a: LatLng, b: LatLng) -> f64 {
    let rad = std::f64::consts::PI / 180.0;
    let lat1 = a.lat * rad;
    let lat2 = b.lat * rad;
    let sin_dlat = ((b.lat - a.lat) * rad / 2.0).sin();
    let sin_dlng = ((b.lng - a.lng) * rad / 2.0).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Running distance along a polyline; the first entry is always `0`.
pub fn cumulative_distances(points: &[LatLng]) -> Vec<f64> {
    let mut out = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            total += haversine_distance(points[i - 1], *p);
        }
        out.push(total);
    }
    out
}

/// Human-readable distance: whole meters below 1 km, up to three decimals below 10 km, two
/// decimals above.
pub fn format_distance(meters: f64) -> String {
    let d = meters.round();
    if d < 1000.0 {
        return format!("{d} m");
    }
    let km = if d < 10_000.0 {
        d / 1000.0
    } else {
        (d / 10.0).round() / 100.0
    };
    format!("{km} km")
}
