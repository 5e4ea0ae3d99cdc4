#![forbid(unsafe_code)]

//! Zoom-dependent schematic overlay for metro networks.
//!
//! - [`lod`] maps a zoom level to a rendering tier and style constants
//! - [`layout`] turns a validated [`metromap_core::Graph`] into a [`model::RenderModel`]
//! - [`sync`] keeps the drawing surface glued to the map and decides when to rebuild
//! - [`hit`] maps pointer events on hit regions to transient label plates
//! - [`svg`] serializes a model (plus the live plate) into an SVG overlay

pub mod hit;
pub mod layout;
pub mod lod;
pub mod model;
pub mod svg;
pub mod sync;
pub mod text;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use metromap_core::OverlaySettings;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required collaborator: {what}")]
    MissingCollaborator { what: &'static str },
    #[error(transparent)]
    Core(#[from] metromap_core::Error),
    #[error("render model JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct LayoutOptions {
    pub overlay: OverlaySettings,
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            overlay: OverlaySettings::default(),
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

impl LayoutOptions {
    pub fn with_overlay(mut self, overlay: OverlaySettings) -> Self {
        self.overlay = overlay;
        self
    }
}

pub use layout::build;
pub use lod::{Style, Tier};
pub use model::RenderModel;
