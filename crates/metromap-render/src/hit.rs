//! Pointer hit regions and transient label plates.
//!
//! Every layout pass produces fresh hit regions; [`LabelLayer::attach`] swaps in a registry built
//! from the new model and discards whatever plate belonged to the previous one.

use crate::LayoutOptions;
use crate::model::{MarkerOwner, RenderModel};
use crate::text::{TextMeasurer, TextStyle};
use metromap_core::Graph;
use metromap_core::geom::{Point, point};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Hit region id -> id of the visible marker it stands for.
#[derive(Debug, Clone, Default)]
pub struct HitRegistry {
    targets: FxHashMap<String, String>,
}

impl HitRegistry {
    pub fn from_model(model: &RenderModel) -> Self {
        let targets = model
            .hit_regions
            .iter()
            .map(|h| (h.id.clone(), h.marker.clone()))
            .collect();
        Self { targets }
    }

    pub fn marker_for(&self, hit_region: &str) -> Option<&str> {
        self.targets.get(hit_region).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A label box anchored next to a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    pub hit_region: String,
    pub marker: String,
    /// Top-left corner, surface-local pixels.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
    /// Primary name first, then alternates.
    pub lines: Vec<String>,
}

pub struct LabelLayer {
    registry: HitRegistry,
    live: Option<Plate>,
    options: LayoutOptions,
}

impl std::fmt::Debug for LabelLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelLayer")
            .field("registry", &self.registry)
            .field("live", &self.live)
            .finish_non_exhaustive()
    }
}

impl LabelLayer {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            registry: HitRegistry::default(),
            live: None,
            options,
        }
    }

    /// Re-targets the layer at a freshly built model.
    pub fn attach(&mut self, model: &RenderModel) {
        self.registry = HitRegistry::from_model(model);
        self.live = None;
    }

    pub fn registry(&self) -> &HitRegistry {
        &self.registry
    }

    pub fn live_plate(&self) -> Option<&Plate> {
        self.live.as_ref()
    }

    fn measurer(&self) -> &Arc<dyn TextMeasurer + Send + Sync> {
        &self.options.text_measurer
    }

    /// Shows the plate for the marker behind `hit_region`.
    ///
    /// Only one plate lives at a time: while another plate is shown this returns `None` and
    /// creates nothing.
    pub fn pointer_enter(
        &mut self,
        hit_region: &str,
        graph: &Graph,
        model: &RenderModel,
    ) -> Option<&Plate> {
        if let Some(live) = &self.live {
            tracing::debug!(
                live = %live.hit_region,
                entered = hit_region,
                "plate already shown, ignoring pointer enter"
            );
            return None;
        }
        let Some(marker_id) = self.registry.marker_for(hit_region) else {
            tracing::debug!(hit_region, "pointer enter on unknown hit region");
            return None;
        };
        let marker = model.marker(marker_id)?;

        let lines: Vec<String> = match marker.owner {
            MarkerOwner::Platform(p) => graph.platform(p).names(),
            MarkerOwner::Station(s) => graph.station(s).names(),
        }
        .into_iter()
        .map(str::to_string)
        .collect();

        let style = TextStyle {
            font_size: self.options.overlay.plate_font_size,
            ..Default::default()
        };
        let metrics = self.measurer().measure(&lines.join("\n"), &style);
        let pad = style.font_size * 0.25;
        let width = metrics.width + pad * 2.0;
        let height = metrics.height + pad * 2.0;
        let gap = marker.radius + self.options.overlay.plate_offset;
        let origin = point(
            marker.center.x + gap,
            marker.center.y - gap - height,
        );

        self.live = Some(Plate {
            hit_region: hit_region.to_string(),
            marker: marker.id.clone(),
            origin,
            width,
            height,
            font_size: style.font_size,
            lines,
        });
        self.live.as_ref()
    }

    /// Removes the plate shown for `hit_region`, if any.
    pub fn pointer_leave(&mut self, hit_region: &str) -> Option<Plate> {
        match &self.live {
            Some(p) if p.hit_region == hit_region => self.live.take(),
            _ => None,
        }
    }
}
