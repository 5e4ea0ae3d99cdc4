//! Transit network arena.
//!
//! All collections are flat vectors indexed by the id newtypes below. Cross references are
//! checked once in [`Graph::from_feed`]; afterwards every id stored inside a [`Graph`] resolves,
//! so accessors index directly.

mod feed;

pub use feed::{LineFeed, NetworkFeed, PlatformFeed, RouteFeed, SpanFeed, StationFeed, TransferFeed};

use crate::error::Result;
use crate::geo::{self, GeoBounds, LatLng};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

arena_id!(PlatformId);
arena_id!(StationId);
arena_id!(SpanId);
arena_id!(TransferId);
arena_id!(RouteId);

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub name: String,
    /// Alternate spellings keyed by language code, in feed order.
    pub alt_names: IndexMap<String, String>,
    pub location: LatLng,
    /// Incident spans, in feed order.
    pub spans: Vec<SpanId>,
    /// Owning station, resolved at load time.
    pub station: StationId,
}

impl Platform {
    /// Primary name followed by the alternates.
    pub fn names(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.alt_names.values().map(String::as_str))
            .collect()
    }

    /// A platform a route passes straight through (neither a terminus nor a junction).
    pub fn is_pass_through(&self) -> bool {
        self.spans.len() == 2
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub alt_names: IndexMap<String, String>,
    pub platforms: Vec<PlatformId>,
}

impl Station {
    pub fn names(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.alt_names.values().map(String::as_str))
            .collect()
    }

    /// Geographic mean of the station's platforms.
    pub fn center(&self, graph: &Graph) -> LatLng {
        let locations = self
            .platforms
            .iter()
            .map(|&p| graph.platform(p).location)
            .collect::<Vec<_>>();
        // Stations always own at least one platform.
        geo::mean(&locations).unwrap_or(LatLng::new(0.0, 0.0))
    }

    /// Distinct line labels of every route running through one of the station's platforms.
    pub fn passing_lines<'g>(&self, graph: &'g Graph) -> BTreeSet<&'g str> {
        let mut lines = BTreeSet::new();
        for &p in &self.platforms {
            for &s in &graph.platform(p).spans {
                for &r in &graph.span(s).routes {
                    lines.insert(graph.route(r).line.as_str());
                }
            }
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub source: PlatformId,
    pub target: PlatformId,
    pub routes: Vec<RouteId>,
}

impl Span {
    /// The endpoint that is not `platform`; `None` when `platform` is not on this span.
    pub fn other_end(&self, platform: PlatformId) -> Option<PlatformId> {
        if self.source == platform {
            Some(self.target)
        } else if self.target == platform {
            Some(self.source)
        } else {
            None
        }
    }

    pub fn touches(&self, platform: PlatformId) -> bool {
        self.source == platform || self.target == platform
    }
}

/// A walking interchange between two platforms. Unordered: `source`/`target` only mirror the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub source: PlatformId,
    pub target: PlatformId,
}

impl Transfer {
    pub fn connects(&self, a: PlatformId, b: PlatformId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub line: String,
    pub color: Option<String>,
    pub spans: Vec<SpanId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    pub(crate) platforms: Vec<Platform>,
    pub(crate) stations: Vec<Station>,
    pub(crate) spans: Vec<Span>,
    pub(crate) transfers: Vec<Transfer>,
    pub(crate) routes: Vec<Route>,
    /// Line label -> color, as given by the feed.
    pub(crate) lines: IndexMap<String, String>,
}

impl Graph {
    /// Decodes and validates a network feed document.
    pub fn from_json(text: &str) -> Result<Self> {
        let feed: NetworkFeed = serde_json::from_str(text)?;
        Self::from_feed(feed)
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn lines(&self) -> &IndexMap<String, String> {
        &self.lines
    }

    pub fn platform(&self, id: PlatformId) -> &Platform {
        &self.platforms[id.0]
    }

    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id.0]
    }

    pub fn span(&self, id: SpanId) -> &Span {
        &self.spans[id.0]
    }

    pub fn transfer(&self, id: TransferId) -> &Transfer {
        &self.transfers[id.0]
    }

    pub fn route(&self, id: RouteId) -> &Route {
        &self.routes[id.0]
    }

    pub fn platform_ids(&self) -> impl Iterator<Item = PlatformId> + '_ {
        (0..self.platforms.len()).map(PlatformId)
    }

    pub fn station_ids(&self) -> impl Iterator<Item = StationId> + '_ {
        (0..self.stations.len()).map(StationId)
    }

    pub fn span_ids(&self) -> impl Iterator<Item = SpanId> + '_ {
        (0..self.spans.len()).map(SpanId)
    }

    pub fn transfer_ids(&self) -> impl Iterator<Item = TransferId> + '_ {
        (0..self.transfers.len()).map(TransferId)
    }

    /// The platform across `span` from `platform`.
    ///
    /// `span` must be incident to `platform` (true for every span listed by the platform); a
    /// foreign span resolves to its source.
    pub fn neighbor(&self, platform: PlatformId, span: SpanId) -> PlatformId {
        let s = self.span(span);
        s.other_end(platform).unwrap_or(s.source)
    }

    /// Distinct routes running along the platform's incident spans, first-seen order.
    pub fn platform_routes(&self, platform: PlatformId) -> Vec<RouteId> {
        let mut out: Vec<RouteId> = Vec::new();
        for &s in &self.platform(platform).spans {
            for &r in &self.span(s).routes {
                if !out.contains(&r) {
                    out.push(r);
                }
            }
        }
        out
    }

    /// The route's own color, falling back to its line's color.
    pub fn route_color(&self, route: RouteId) -> Option<&str> {
        let r = self.route(route);
        r.color
            .as_deref()
            .or_else(|| self.lines.get(&r.line).map(String::as_str))
    }

    /// Geographic extent of all platforms.
    pub fn bounds(&self) -> GeoBounds {
        // Validation rejects feeds without platforms.
        GeoBounds::from_points(self.platforms.iter().map(|p| p.location))
            .unwrap_or_else(|| GeoBounds::from_point(LatLng::new(0.0, 0.0)))
    }
}
