#![forbid(unsafe_code)]

//! Transit network model and geometry for schematic metro overlays (headless).
//!
//! This crate owns everything the layout engine reads:
//! - the validated network arena ([`Graph`]) decoded from a JSON feed
//! - pixel-space geometry (midpoints, circumcenters) and interchange cluster detection
//! - the projection contract the host map implements, plus a headless web-mercator map
//! - configuration defaults and typed settings

pub mod config;
pub mod error;
pub mod geo;
pub mod geom;
pub mod interchange;
pub mod network;
pub mod projection;

pub use config::{MapConfig, OverlaySettings, TileLayer, TileLayerSettings, ViewSettings};
pub use error::{Error, Result};
pub use geo::{GeoBounds, LatLng};
pub use interchange::find_interchange_cluster;
pub use network::{
    Graph, NetworkFeed, Platform, PlatformId, Route, RouteId, Span, SpanId, Station, StationId,
    Transfer, TransferId,
};
pub use projection::{MapView, Projector, WebMercatorView};

#[cfg(test)]
mod tests;
