//! SVG serialization of a [`RenderModel`].
//!
//! Groups are emitted in stacking order: route paths, transfer geometry, visible station
//! circles, the label plate, and finally the invisible hit circles so they stay on top for
//! pointer events.

use crate::hit::Plate;
use crate::model::{CurveSegment, RenderModel};
use crate::sync::OverlayFrame;
use std::fmt::Write as _;

mod util;

use util::{escape_xml, escape_xml_into, fmt, fmt_path_into};

const FALLBACK_STROKE: &str = "#333";

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Padding around the network when no frame is given.
    pub viewbox_padding: f64,
    /// When true, include the invisible hit circles.
    pub include_hit_regions: bool,
    /// Optional background fill for standalone output.
    pub background: Option<String>,
    pub font_family: String,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 8.0,
            include_hit_regions: true,
            background: None,
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Writes the overlay as a standalone SVG document.
///
/// With a frame, the document matches the buffered surface (size, placement, pan transform and
/// provisional opacity). Without one it is cropped to the network plus `viewbox_padding`.
pub fn render_overlay_svg(
    model: &RenderModel,
    frame: Option<&OverlayFrame>,
    plate: Option<&Plate>,
    options: &SvgRenderOptions,
) -> String {
    let mut out = String::new();

    let (width, height, offset_x, offset_y) = match frame {
        Some(f) => (f.width, f.height, f.content_offset.x, f.content_offset.y),
        None => {
            let pad = options.viewbox_padding.max(0.0);
            (
                model.size.width + pad * 2.0,
                model.size.height + pad * 2.0,
                pad,
                pad,
            )
        }
    };

    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="metromap-overlay" data-tier="{}" width="{}" height="{}" viewBox="0 0 {} {}""#,
        model.tier.as_str(),
        fmt(width),
        fmt(height),
        fmt(width),
        fmt(height)
    );
    if let Some(f) = frame {
        let _ = write!(
            &mut out,
            r#" style="left:{}px;top:{}px;transform:translate({}px,{}px)"#,
            fmt(f.left),
            fmt(f.top),
            fmt(f.transform.x),
            fmt(f.transform.y)
        );
        if let Some(opacity) = f.opacity {
            let _ = write!(&mut out, ";opacity:{}", fmt(opacity));
        }
        out.push('"');
    }
    out.push('>');

    if let Some(bg) = &options.background {
        let _ = write!(
            &mut out,
            r#"<rect class="background" width="100%" height="100%" fill="{}"/>"#,
            escape_xml(bg)
        );
    }

    let _ = write!(
        &mut out,
        r#"<g class="network" transform="translate({}, {})">"#,
        fmt(offset_x),
        fmt(offset_y)
    );

    out.push_str(r#"<g id="paths">"#);
    for curve in &model.curves {
        render_curve(&mut out, curve);
    }
    out.push_str("</g>");

    out.push_str(r#"<g id="transfers">"#);
    for cluster in &model.clusters {
        let _ = write!(
            &mut out,
            r#"<circle class="transfer" data-station="{}" cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
            cluster.station,
            fmt(cluster.center.x),
            fmt(cluster.center.y),
            fmt(cluster.radius),
            FALLBACK_STROKE,
            fmt(cluster.stroke_width),
            fmt(cluster.opacity)
        );
    }
    for t in &model.transfers {
        let _ = write!(
            &mut out,
            r#"<line class="transfer" data-transfer="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
            t.transfer,
            fmt(t.from.x),
            fmt(t.from.y),
            fmt(t.to.x),
            fmt(t.to.y),
            FALLBACK_STROKE,
            fmt(t.stroke_width),
            fmt(t.opacity)
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g id="station-circles">"#);
    for m in &model.markers {
        let stroke = m.colors.first().map(String::as_str).unwrap_or(FALLBACK_STROKE);
        let _ = write!(
            &mut out,
            r##"<circle id="{}" class="{}" cx="{}" cy="{}" r="{}" fill="#fff" stroke="{}" stroke-width="{}"/>"##,
            escape_xml(&m.id),
            escape_xml(&m.classes.join(" ")),
            fmt(m.center.x),
            fmt(m.center.y),
            fmt(m.radius),
            escape_xml(stroke),
            fmt(m.border_width)
        );
    }
    out.push_str("</g>");

    if let Some(p) = plate {
        render_plate(&mut out, p, &options.font_family);
    }

    if options.include_hit_regions {
        out.push_str(r#"<g id="dummy-circles">"#);
        for h in &model.hit_regions {
            let _ = write!(
                &mut out,
                r##"<circle id="{}" class="invisible-circle" data-marker-id="{}" cx="{}" cy="{}" r="{}" fill="#000" fill-opacity="0" stroke="none"/>"##,
                escape_xml(&h.id),
                escape_xml(&h.marker),
                fmt(h.center.x),
                fmt(h.center.y),
                fmt(h.radius)
            );
        }
        out.push_str("</g>");
    }

    out.push_str("</g></svg>\n");
    out
}

fn render_curve(out: &mut String, curve: &CurveSegment) {
    let [p0, c1, c2, p3] = curve.points;
    let mut d = String::with_capacity(64);
    d.push('M');
    fmt_path_into(&mut d, p0.x);
    d.push(',');
    fmt_path_into(&mut d, p0.y);
    d.push('C');
    for (i, p) in [c1, c2, p3].into_iter().enumerate() {
        if i > 0 {
            d.push(' ');
        }
        fmt_path_into(&mut d, p.x);
        d.push(',');
        fmt_path_into(&mut d, p.y);
    }

    // Several routes on one span are drawn as parallel strokes of decreasing width, widest first.
    let colors: Vec<&str> = if curve.colors.is_empty() {
        vec![FALLBACK_STROKE]
    } else {
        curve.colors.iter().map(String::as_str).collect()
    };
    let n = colors.len() as f64;
    for (i, color) in colors.iter().enumerate() {
        let width = curve.width * (n - i as f64) / n;
        let _ = write!(
            out,
            r#"<path class="span" data-span="{}" d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round"/>"#,
            curve.span,
            d,
            escape_xml(color),
            fmt(width)
        );
    }
}

fn render_plate(out: &mut String, plate: &Plate, font_family: &str) {
    let pad = plate.font_size * 0.25;
    let _ = write!(
        out,
        r##"<g id="plate" data-marker-id="{}" transform="translate({}, {})"><rect class="plate" width="{}" height="{}" rx="2" fill="#fff" stroke="{}" stroke-width="1"/><text class="plate-text" font-family=""##,
        escape_xml(&plate.marker),
        fmt(plate.origin.x),
        fmt(plate.origin.y),
        fmt(plate.width),
        fmt(plate.height),
        FALLBACK_STROKE
    );
    escape_xml_into(out, font_family);
    let _ = write!(out, r#"" font-size="{}">"#, fmt(plate.font_size));
    for (i, line) in plate.lines.iter().enumerate() {
        let y = pad + plate.font_size * (1.2 * i as f64 + 1.0);
        let _ = write!(out, r#"<tspan x="{}" y="{}">"#, fmt(pad), fmt(y));
        escape_xml_into(out, line);
        out.push_str("</tspan>");
    }
    out.push_str("</text></g>");
}
