//! Keeps the drawing surface aligned with the host map.
//!
//! Pans are mirrored onto the surface transform without touching geometry. Only a settled zoom
//! (or the first load of a network) re-projects the graph and rebuilds the [`RenderModel`].
//!
//! ```text
//!  move       surface.transform = pane offset
//!  moveend    remember the translation
//!  zoomstart  remember zoom, dim the surface, freeze dragging
//!  zoomend    maybe swap tiles, re-select tier, resize surface, rebuild, undim, unfreeze
//! ```

use crate::hit::{LabelLayer, Plate};
use crate::layout;
use crate::lod::{self, Tier};
use crate::model::RenderModel;
use crate::svg::{self, SvgRenderOptions};
use crate::{Error, LayoutOptions, Result};
use metromap_core::geom::{Size, Vector, vector};
use metromap_core::{GeoBounds, Graph, MapConfig, MapView, TileLayerSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportEvent {
    Move,
    MoveStart,
    MoveEnd,
    ZoomStart,
    ZoomEnd,
}

/// Explicit zoom bookkeeping carried between events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    pub tier: Tier,
    /// Zoom recorded at `zoomstart`; cleared once the zoom settles.
    pub prev_zoom: Option<f64>,
}

/// Placement of the drawing surface relative to the map container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Where the network's pixel-bounds origin sits inside the (buffered) surface.
    pub content_offset: Vector,
    /// Mirror of the map pane's translation.
    pub transform: Vector,
    /// `None` means fully opaque.
    pub opacity: Option<f64>,
}

impl Default for OverlayFrame {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            content_offset: vector(0.0, 0.0),
            transform: vector(0.0, 0.0),
            opacity: None,
        }
    }
}

/// What handling an event changed.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEffect {
    None,
    Translated,
    Provisional,
    Rebuilt { tile_layer_swapped_to: Option<String> },
}

/// Serializes layout passes: a pass requested while one is running is replayed once the current
/// pass finishes instead of running concurrently.
///
/// [`OverlaySynchronizer`] runs every pass to completion under `&mut self`, so it never observes a
/// running gate itself. The gate is the hook for hosts whose projector answers asynchronously:
/// they call [`RebuildGate::request`] when a settle arrives and [`RebuildGate::finish`] when the
/// pass they started completes, running again while `finish` returns `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RebuildGate {
    running: bool,
    pending: bool,
}

impl RebuildGate {
    /// `true` if the caller should start a pass now; otherwise the pass is queued.
    pub fn request(&mut self) -> bool {
        if self.running {
            self.pending = true;
            false
        } else {
            self.running = true;
            true
        }
    }

    /// `true` if a queued pass must run before the gate opens again.
    pub fn finish(&mut self) -> bool {
        if self.pending {
            self.pending = false;
            true
        } else {
            self.running = false;
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

pub struct OverlayBuilder<M> {
    map: Option<M>,
    container: Option<String>,
    options: LayoutOptions,
    tiles: Option<TileLayerSettings>,
}

impl<M: MapView> Default for OverlayBuilder<M> {
    fn default() -> Self {
        Self {
            map: None,
            container: None,
            options: LayoutOptions::default(),
            tiles: None,
        }
    }
}

impl<M: MapView> OverlayBuilder<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, map: M) -> Self {
        self.map = Some(map);
        self
    }

    /// Id of the element the overlay draws into.
    pub fn container(mut self, id: impl Into<String>) -> Self {
        self.container = Some(id.into());
        self
    }

    pub fn options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    pub fn tiles(mut self, tiles: TileLayerSettings) -> Self {
        self.tiles = Some(tiles);
        self
    }

    /// Applies overlay settings and tile layers from a config tree.
    pub fn config(mut self, config: &MapConfig) -> Result<Self> {
        self.options.overlay = config.overlay_settings()?;
        self.tiles = Some(config.tile_layers()?);
        Ok(self)
    }

    /// Fails loudly when the map or the drawing surface is missing.
    pub fn build(self) -> Result<OverlaySynchronizer<M>> {
        let Some(map) = self.map else {
            return Err(Error::MissingCollaborator { what: "map view" });
        };
        let container = match self.container {
            Some(id) if !id.trim().is_empty() => id,
            _ => {
                return Err(Error::MissingCollaborator {
                    what: "drawing surface container",
                });
            }
        };
        let tiles = match self.tiles {
            Some(t) => t,
            None => MapConfig::defaults().tile_layers()?,
        };

        let zoom = map.zoom();
        let tier = Tier::for_zoom(zoom);
        let tile_layer = tiles.layer_for_zoom(zoom).name.clone();
        Ok(OverlaySynchronizer {
            map,
            container,
            labels: LabelLayer::new(self.options.clone()),
            options: self.options,
            tiles,
            state: SyncState {
                tier,
                prev_zoom: None,
            },
            graph: None,
            geo_bounds: None,
            frame: OverlayFrame::default(),
            last_translation: vector(0.0, 0.0),
            tile_layer,
            model: RenderModel::empty(tier, None, Size::zero()),
            gate: RebuildGate::default(),
            passes: 0,
        })
    }
}

pub struct OverlaySynchronizer<M: MapView> {
    map: M,
    container: String,
    options: LayoutOptions,
    tiles: TileLayerSettings,
    state: SyncState,
    graph: Option<Graph>,
    geo_bounds: Option<GeoBounds>,
    frame: OverlayFrame,
    last_translation: Vector,
    tile_layer: String,
    model: RenderModel,
    labels: LabelLayer,
    gate: RebuildGate,
    passes: usize,
}

impl<M: MapView> OverlaySynchronizer<M> {
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Mutable access for driving the host map (pan, zoom) between events.
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn frame(&self) -> &OverlayFrame {
        &self.frame
    }

    pub fn model(&self) -> &RenderModel {
        &self.model
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn tile_layer(&self) -> &str {
        &self.tile_layer
    }

    /// Translation recorded at the last `moveend`.
    pub fn last_translation(&self) -> Vector {
        self.last_translation
    }

    /// Number of completed layout passes.
    pub fn layout_passes(&self) -> usize {
        self.passes
    }

    pub fn labels(&self) -> &LabelLayer {
        &self.labels
    }

    /// Installs a freshly fetched network: centers the map on it and runs the first layout
    /// pass exactly like a settled zoom.
    pub fn load_graph(&mut self, graph: Graph) -> SyncEffect {
        let bounds = graph.bounds();
        self.graph = Some(graph);
        self.geo_bounds = Some(bounds);
        let zoom = self.map.zoom();
        self.map.set_view(bounds.center(), zoom);
        tracing::info!(zoom, "network loaded, running initial layout");
        self.settle()
    }

    /// Replaces the network wholesale (e.g. after an edit) and lays it out again.
    pub fn replace_graph(&mut self, graph: Graph) -> SyncEffect {
        self.geo_bounds = Some(graph.bounds());
        self.graph = Some(graph);
        self.rebuild();
        SyncEffect::Rebuilt {
            tile_layer_swapped_to: None,
        }
    }

    /// A feed that could not be fetched or decoded leaves the map usable and the overlay empty.
    pub fn feed_failed(&mut self, err: &metromap_core::Error) {
        tracing::error!(%err, "could not load the network feed");
    }

    pub fn handle(&mut self, event: ViewportEvent) -> SyncEffect {
        match event {
            ViewportEvent::Move => {
                self.frame.transform = self.map.pane_offset();
                SyncEffect::Translated
            }
            ViewportEvent::MoveStart => SyncEffect::None,
            ViewportEvent::MoveEnd => {
                self.last_translation = self.frame.transform;
                SyncEffect::None
            }
            ViewportEvent::ZoomStart => {
                self.state.prev_zoom = Some(self.map.zoom());
                self.frame.opacity = Some(self.options.overlay.provisional_opacity);
                self.map.set_dragging(false);
                SyncEffect::Provisional
            }
            ViewportEvent::ZoomEnd => self.settle(),
        }
    }

    /// Shared tail of `zoomend` and the initial load.
    fn settle(&mut self) -> SyncEffect {
        let zoom = self.map.zoom();
        let wanted = self.tiles.layer_for_zoom(zoom).name.clone();
        let swapped = if wanted != self.tile_layer {
            tracing::info!(from = %self.tile_layer, to = %wanted, zoom, "swapping tile layer");
            self.tile_layer = wanted.clone();
            Some(wanted)
        } else {
            None
        };

        self.map.set_dragging(false);
        self.rebuild();
        self.map.set_dragging(true);
        self.frame.opacity = None;
        self.state.prev_zoom = None;

        SyncEffect::Rebuilt {
            tile_layer_swapped_to: swapped,
        }
    }

    fn rebuild(&mut self) {
        if !self.gate.request() {
            tracing::debug!("layout pass already running, queued another");
            return;
        }
        loop {
            self.layout_pass();
            if !self.gate.finish() {
                break;
            }
        }
    }

    fn layout_pass(&mut self) {
        let zoom = self.map.zoom();
        let (tier, _) = lod::select(zoom);
        self.state.tier = tier;
        self.frame.transform = self.map.pane_offset();

        let (Some(graph), Some(geo_bounds)) = (&self.graph, &self.geo_bounds) else {
            self.model = RenderModel::empty(tier, None, Size::zero());
            self.labels.attach(&self.model);
            return;
        };

        let bounds = self.map.pixel_bounds_for(geo_bounds);
        let size = bounds.size();
        let factor = self.options.overlay.buffer_factor;
        let margin = vector(
            size.width * (factor - 1.0) / 2.0,
            size.height * (factor - 1.0) / 2.0,
        );
        self.frame.width = size.width * factor;
        self.frame.height = size.height * factor;
        self.frame.content_offset = margin;
        self.frame.left = bounds.min.x - margin.x - self.frame.transform.x;
        self.frame.top = bounds.min.y - margin.y - self.frame.transform.y;

        self.model = layout::build(graph, &self.map, &bounds, tier, &self.options);
        self.labels.attach(&self.model);
        self.passes += 1;
    }

    pub fn pointer_enter(&mut self, hit_region: &str) -> Option<&Plate> {
        let graph = self.graph.as_ref()?;
        self.labels.pointer_enter(hit_region, graph, &self.model)
    }

    pub fn pointer_leave(&mut self, hit_region: &str) -> Option<Plate> {
        self.labels.pointer_leave(hit_region)
    }

    /// Current surface contents as SVG.
    pub fn render_svg(&self, options: &SvgRenderOptions) -> String {
        svg::render_overlay_svg(
            &self.model,
            Some(&self.frame),
            self.labels.live_plate(),
            options,
        )
    }
}
