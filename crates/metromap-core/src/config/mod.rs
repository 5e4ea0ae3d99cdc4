//! Engine configuration.
//!
//! [`MapConfig`] is a loosely typed JSON tree addressed by dotted paths (`overlay.bufferFactor`).
//! User documents (JSON or YAML) are deep-merged over [`MapConfig::defaults`]; the typed
//! settings structs below are read out of the merged tree.

use crate::error::{Error, Result};
use crate::geo::LatLng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig(Value);

impl Default for MapConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

impl MapConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Built-in defaults.
    pub fn defaults() -> Self {
        Self(json!({
            "view": {
                "initialZoom": 11,
                "initialCenter": [60.0, 30.0],
                "viewportWidth": 800,
                "viewportHeight": 600
            },
            "overlay": {
                "bufferFactor": 3.0,
                "provisionalOpacity": 0.5,
                "hitRadiusFactor": 2.0,
                "transferOpacity": 0.5,
                "plateOffset": 4.0,
                "plateFontSize": 12.0
            },
            "tiles": [
                { "name": "overview", "minZoom": 0 },
                { "name": "detailed", "minZoom": 13 }
            ]
        }))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Defaults overridden by a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let mut cfg = Self::defaults();
        cfg.deep_merge(&value);
        Ok(cfg)
    }

    /// Defaults overridden by a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        let mut cfg = Self::defaults();
        if !value.is_null() {
            cfg.deep_merge(&value);
        }
        Ok(cfg)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Any JSON value can be wrapped via `from_value`; coerce non-objects so this never panics.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }

    fn number(&self, dotted_path: &str) -> Result<f64> {
        match self.get(dotted_path) {
            None => Self::defaults()
                .get_f64(dotted_path)
                .ok_or_else(|| invalid(dotted_path, "missing")),
            Some(v) => v
                .as_f64()
                .filter(|n| n.is_finite())
                .ok_or_else(|| invalid(dotted_path, "expected a finite number")),
        }
    }

    fn positive(&self, dotted_path: &str) -> Result<f64> {
        let n = self.number(dotted_path)?;
        if n > 0.0 {
            Ok(n)
        } else {
            Err(invalid(dotted_path, "expected a positive number"))
        }
    }

    fn opacity(&self, dotted_path: &str) -> Result<f64> {
        let n = self.number(dotted_path)?;
        if (0.0..=1.0).contains(&n) {
            Ok(n)
        } else {
            Err(invalid(dotted_path, "expected an opacity between 0 and 1"))
        }
    }

    pub fn overlay_settings(&self) -> Result<OverlaySettings> {
        Ok(OverlaySettings {
            buffer_factor: self.positive("overlay.bufferFactor")?,
            provisional_opacity: self.opacity("overlay.provisionalOpacity")?,
            hit_radius_factor: self.positive("overlay.hitRadiusFactor")?,
            transfer_opacity: self.opacity("overlay.transferOpacity")?,
            plate_offset: self.number("overlay.plateOffset")?,
            plate_font_size: self.positive("overlay.plateFontSize")?,
        })
    }

    pub fn view_settings(&self) -> Result<ViewSettings> {
        let center = match self.get("view.initialCenter") {
            None => LatLng::new(60.0, 30.0),
            Some(v) => serde_json::from_value::<LatLng>(v.clone())
                .map_err(|e| invalid("view.initialCenter", &e.to_string()))?,
        };
        Ok(ViewSettings {
            initial_zoom: self.number("view.initialZoom")?,
            initial_center: center,
            viewport_width: self.positive("view.viewportWidth")?,
            viewport_height: self.positive("view.viewportHeight")?,
        })
    }

    pub fn tile_layers(&self) -> Result<TileLayerSettings> {
        let Some(v) = self.get("tiles") else {
            return Self::defaults().tile_layers();
        };
        let layers: Vec<TileLayer> = serde_json::from_value(v.clone())
            .map_err(|e| invalid("tiles", &e.to_string()))?;
        TileLayerSettings::new(layers)
    }
}

fn invalid(path: &str, message: &str) -> Error {
    Error::InvalidConfig {
        path: path.to_string(),
        message: message.to_string(),
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlaySettings {
    /// Drawing surface size as a multiple of the network's pixel extent.
    pub buffer_factor: f64,
    /// Overlay opacity while a zoom animation makes the geometry stale.
    pub provisional_opacity: f64,
    /// Hit region radius as a multiple of the marker radius.
    pub hit_radius_factor: f64,
    pub transfer_opacity: f64,
    /// Gap between a marker's edge and its label plate.
    pub plate_offset: f64,
    pub plate_font_size: f64,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            buffer_factor: 3.0,
            provisional_opacity: 0.5,
            hit_radius_factor: 2.0,
            transfer_opacity: 0.5,
            plate_offset: 4.0,
            plate_font_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub initial_zoom: f64,
    pub initial_center: LatLng,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub name: String,
    pub min_zoom: f64,
}

/// Background tile layers ordered by the zoom they take over at. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayerSettings {
    layers: Vec<TileLayer>,
}

impl TileLayerSettings {
    pub fn new(mut layers: Vec<TileLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(invalid("tiles", "at least one tile layer is required"));
        }
        if let Some(bad) = layers.iter().find(|l| !l.min_zoom.is_finite()) {
            return Err(invalid(
                "tiles",
                &format!("layer `{}` has a non-finite minZoom", bad.name),
            ));
        }
        layers.sort_by(|a, b| a.min_zoom.total_cmp(&b.min_zoom));
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    /// The last layer whose `min_zoom` is reached, or the first layer below every threshold.
    pub fn layer_for_zoom(&self, zoom: f64) -> &TileLayer {
        self.layers
            .iter()
            .rev()
            .find(|l| l.min_zoom <= zoom)
            .unwrap_or(&self.layers[0])
    }
}
