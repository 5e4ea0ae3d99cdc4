#![forbid(unsafe_code)]

//! `metromap` draws a metro network as a zoom-dependent schematic overlay on top of a slippy map.
//!
//! The core crate validates the network feed and provides projection and configuration; the
//! render crate lays the network out per level of detail and serializes it as SVG.
//!
//! # Features
//!
//! - `render`: enable layout, the overlay synchronizer and SVG output (`metromap::render`)
//! - `raster`: enable PNG output via pure-Rust SVG rasterization

pub use metromap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use metromap_render::hit::{LabelLayer, Plate};
    pub use metromap_render::model::RenderModel;
    pub use metromap_render::svg::{SvgRenderOptions, render_overlay_svg};
    pub use metromap_render::sync::{
        OverlayBuilder, OverlayFrame, OverlaySynchronizer, SyncEffect, ViewportEvent,
    };
    pub use metromap_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use metromap_render::{LayoutOptions, Style, Tier, build};

    use metromap_core::geom::Size;
    use metromap_core::{Graph, MapConfig, Projector, WebMercatorView};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Network(#[from] metromap_core::Error),
        #[error(transparent)]
        Render(#[from] metromap_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Container id used for headless synchronizers.
    pub const HEADLESS_CONTAINER_ID: &str = "metromap-overlay";

    /// One settled layout pass, detached from the synchronizer that produced it.
    #[derive(Debug, Clone, PartialEq)]
    pub struct LaidOutNetwork {
        pub zoom: f64,
        pub tier: Tier,
        pub frame: OverlayFrame,
        pub model: RenderModel,
    }

    /// Viewport built from `view.*` settings; `zoom` overrides `view.initialZoom`.
    pub fn headless_view(config: &MapConfig, zoom: Option<f64>) -> Result<WebMercatorView> {
        let view = config.view_settings()?;
        Ok(WebMercatorView::new(
            Size::new(view.viewport_width, view.viewport_height),
            view.initial_center,
            zoom.unwrap_or(view.initial_zoom),
        ))
    }

    /// Runs the initial-load path of the synchronizer for an already validated graph.
    pub fn layout_graph_sync(
        graph: Graph,
        config: &MapConfig,
        zoom: Option<f64>,
    ) -> Result<LaidOutNetwork> {
        let mut sync = OverlayBuilder::new()
            .map(headless_view(config, zoom)?)
            .container(HEADLESS_CONTAINER_ID)
            .config(config)?
            .build()?;
        sync.load_graph(graph);
        Ok(LaidOutNetwork {
            zoom: sync.map().zoom(),
            tier: sync.state().tier,
            frame: *sync.frame(),
            model: sync.model().clone(),
        })
    }

    /// Synchronous layout helper: parse and validate a JSON feed, then lay it out.
    pub fn layout_network_sync(
        feed_json: &str,
        config: &MapConfig,
        zoom: Option<f64>,
    ) -> Result<LaidOutNetwork> {
        let graph = Graph::from_json(feed_json)?;
        layout_graph_sync(graph, config, zoom)
    }

    /// Standalone SVG (cropped to the network) for a JSON feed.
    pub fn render_svg_sync(
        feed_json: &str,
        config: &MapConfig,
        zoom: Option<f64>,
        svg_options: &SvgRenderOptions,
    ) -> Result<String> {
        let laid_out = layout_network_sync(feed_json, config, zoom)?;
        Ok(render_overlay_svg(&laid_out.model, None, None, svg_options))
    }

    /// Bundles a config and output options so callers pass only the feed per call.
    #[derive(Debug, Clone, Default)]
    pub struct HeadlessRenderer {
        pub config: MapConfig,
        pub zoom: Option<f64>,
        pub svg: SvgRenderOptions,
    }

    impl HeadlessRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(mut self, config: MapConfig) -> Self {
            self.config = config;
            self
        }

        pub fn with_zoom(mut self, zoom: f64) -> Self {
            self.zoom = Some(zoom);
            self
        }

        pub fn layout_sync(&self, feed_json: &str) -> Result<LaidOutNetwork> {
            layout_network_sync(feed_json, &self.config, self.zoom)
        }

        pub fn render_svg_sync(&self, feed_json: &str) -> Result<String> {
            render_svg_sync(feed_json, &self.config, self.zoom, &self.svg)
        }

        #[cfg(feature = "raster")]
        pub fn render_png_sync(
            &self,
            feed_json: &str,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg_sync(feed_json)?;
            raster::svg_to_png(&svg, raster)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const FEED: &str = r##"{
            "platforms": [
                { "name": "A", "location": [60.00, 30.00] },
                { "name": "B", "location": [60.01, 30.02] },
                { "name": "C", "location": [60.02, 30.01] }
            ],
            "stations": [{ "platforms": [0] }, { "platforms": [1] }, { "platforms": [2] }],
            "spans": [
                { "source": 0, "target": 1, "routes": [0] },
                { "source": 1, "target": 2, "routes": [0] }
            ],
            "routes": [{ "line": "M1", "color": "#c00", "spans": [0, 1] }]
        }"##;

        #[test]
        fn layout_uses_the_requested_zoom() {
            let out = layout_network_sync(FEED, &MapConfig::default(), Some(14.0))
                .expect("layout");
            assert_eq!(out.tier, Tier::Detailed);
            assert_eq!(out.model.markers.len(), 3);
            assert_eq!(out.model.curves.len(), 2);
            assert_eq!(out.model.whiskers.len(), 1);
            assert!(out.frame.width > 0.0);
        }

        #[test]
        fn layout_defaults_to_the_configured_zoom() {
            let out = layout_network_sync(FEED, &MapConfig::default(), None).expect("layout");
            assert_eq!(out.zoom, 11.0);
            assert_eq!(out.tier, Tier::Simplified);
        }

        #[test]
        fn invalid_feeds_surface_as_network_errors() {
            let err = layout_network_sync("{\"platforms\": []}", &MapConfig::default(), None)
                .expect_err("empty network");
            assert!(matches!(err, HeadlessError::Network(_)));
        }

        #[test]
        fn renderer_writes_svg() {
            let svg = HeadlessRenderer::new()
                .with_zoom(13.0)
                .render_svg_sync(FEED)
                .expect("svg");
            assert!(svg.starts_with("<svg"));
            assert!(svg.contains(r#"data-tier="detailed""#));
            assert_eq!(svg.matches(r#"class="span""#).count(), 2);
        }
    }
}
