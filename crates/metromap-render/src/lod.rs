//! Level-of-detail selection.
//!
//! ```text
//!  zoom < 10        hidden
//!  10 <= zoom < 12  station roundels:  line (z-7)*0.5, radius line*1.25, border radius*0.4
//!  zoom >= 12       platforms, curves, interchanges: line and radius (z-7)*0.5, border radius*0.4
//! ```

use serde::{Deserialize, Serialize};

pub const SIMPLIFIED_MIN_ZOOM: f64 = 10.0;
pub const DETAILED_MIN_ZOOM: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Hidden,
    Simplified,
    Detailed,
}

impl Tier {
    pub fn for_zoom(zoom: f64) -> Self {
        if zoom < SIMPLIFIED_MIN_ZOOM {
            Tier::Hidden
        } else if zoom < DETAILED_MIN_ZOOM {
            Tier::Simplified
        } else {
            Tier::Detailed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Hidden => "hidden",
            Tier::Simplified => "simplified",
            Tier::Detailed => "detailed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub line_width: f64,
    pub circle_radius: f64,
    pub circle_border: f64,
}

/// Style constants for `zoom`; `None` on the hidden tier.
pub fn style_for(tier: Tier, zoom: f64) -> Option<Style> {
    let line_width = (zoom - 7.0) * 0.5;
    let circle_radius = match tier {
        Tier::Hidden => return None,
        Tier::Simplified => line_width * 1.25,
        Tier::Detailed => (zoom - 7.0) * 0.5,
    };
    Some(Style {
        line_width,
        circle_radius,
        circle_border: circle_radius * 0.4,
    })
}

/// Tier and style for `zoom`. Pure: no memory of the previous zoom.
pub fn select(zoom: f64) -> (Tier, Option<Style>) {
    let tier = Tier::for_zoom(zoom);
    (tier, style_for(tier, zoom))
}
