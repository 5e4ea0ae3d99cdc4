use crate::lod::{Style, Tier};
use metromap_core::geom::{Point, Size};
use metromap_core::{PlatformId, RouteId, SpanId, StationId, TransferId};
use serde::{Deserialize, Serialize};

pub fn station_marker_id(station: StationId) -> String {
    format!("s-{station}")
}

pub fn platform_marker_id(platform: PlatformId) -> String {
    format!("p-{platform}")
}

pub fn hit_region_id(marker_id: &str) -> String {
    format!("h-{marker_id}")
}

/// CSS class for a line label: `line-` followed by the label with every character outside
/// `[A-Za-z0-9_-]` replaced by `-`, so one label always yields exactly one class.
pub fn line_class(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 5);
    out.push_str("line-");
    for ch in line.trim().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            out.push(ch);
        } else {
            out.push('-');
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum MarkerOwner {
    Station(StationId),
    Platform(PlatformId),
}

/// A visible roundel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    pub owner: MarkerOwner,
    pub station: StationId,
    pub center: Point,
    pub radius: f64,
    pub border_width: f64,
    /// CSS classes: `station-circle` followed by [`line_class`] of each line served here.
    pub classes: Vec<String>,
    /// Stroke colors of the routes serving the marker, first-seen order.
    pub colors: Vec<String>,
    pub hit_region: String,
}

/// Invisible, pointer-interactive circle paired with a [`Marker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRegion {
    pub id: String,
    pub marker: String,
    pub center: Point,
    pub radius: f64,
}

/// Bezier control points that carry a line smoothly through a pass-through platform.
///
/// `controls[i] = midpoints[i] + diff`, where `midpoints[i]` is the midpoint towards the neighbor
/// across the platform's `i`-th span and `diff = platform - mm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Whiskers {
    pub platform: PlatformId,
    pub midpoints: [Point; 2],
    pub mm: Point,
    pub diff: metromap_core::geom::Vector,
    pub controls: [Point; 2],
}

/// Cubic bezier for one span: `[source, source control, target control, target]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    pub span: SpanId,
    pub points: [Point; 4],
    pub width: f64,
    pub routes: Vec<RouteId>,
    pub colors: Vec<String>,
}

/// `[neighbor of source, source, target, neighbor of target]` for one span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanPath {
    pub span: SpanId,
    pub points: [Point; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterCircle {
    pub station: StationId,
    pub center: Point,
    pub radius: f64,
    pub members: Vec<PlatformId>,
    pub stroke_width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferLine {
    pub transfer: TransferId,
    pub from: Point,
    pub to: Point,
    pub stroke_width: f64,
    pub opacity: f64,
}

/// Everything one layout pass draws, in surface-local pixels (origin at the network's pixel
/// bounds). Rebuilt from scratch on every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub tier: Tier,
    pub style: Option<Style>,
    /// Pixel size of the network's extent.
    pub size: Size,
    pub markers: Vec<Marker>,
    pub hit_regions: Vec<HitRegion>,
    pub whiskers: Vec<Whiskers>,
    pub curves: Vec<CurveSegment>,
    pub span_paths: Vec<SpanPath>,
    pub clusters: Vec<ClusterCircle>,
    pub transfers: Vec<TransferLine>,
}

impl RenderModel {
    pub fn empty(tier: Tier, style: Option<Style>, size: Size) -> Self {
        Self {
            tier,
            style,
            size,
            markers: Vec::new(),
            hit_regions: Vec::new(),
            whiskers: Vec::new(),
            curves: Vec::new(),
            span_paths: Vec::new(),
            clusters: Vec::new(),
            transfers: Vec::new(),
        }
    }

    /// No drawable or interactive primitive at all.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
            && self.hit_regions.is_empty()
            && self.whiskers.is_empty()
            && self.curves.is_empty()
            && self.span_paths.is_empty()
            && self.clusters.is_empty()
            && self.transfers.is_empty()
    }

    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn whiskers_for(&self, platform: PlatformId) -> Option<&Whiskers> {
        self.whiskers.iter().find(|w| w.platform == platform)
    }
}
