//! Map projection contract and a headless spherical-mercator map.
//!
//! The interactive map that hosts the overlay is an external collaborator. The layout only needs
//! [`Projector`]; the overlay synchronizer additionally drives a [`MapView`].
//! [`WebMercatorView`] implements both without any UI so the engine can run in tests and in the
//! CLI.

use crate::geo::{GeoBounds, LatLng};
use crate::geom::{Box2D, Point, Size, Vector, point, vector};

/// Web-mercator tiles are 256 pixels wide at zoom 0.
pub const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the square mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

pub trait Projector {
    /// Geographic coordinate to a pixel position relative to the viewport's top-left corner.
    fn project(&self, location: LatLng) -> Point;

    fn zoom(&self) -> f64;

    /// Pixel box spanned by a geographic box (north-west corner to south-east corner).
    fn pixel_bounds_for(&self, bounds: &GeoBounds) -> Box2D {
        let nw = self.project(bounds.north_west());
        let se = self.project(bounds.south_east());
        Box2D::new(nw.min(se), nw.max(se))
    }
}

impl<P: Projector + ?Sized> Projector for &P {
    fn project(&self, location: LatLng) -> Point {
        (**self).project(location)
    }

    fn zoom(&self) -> f64 {
        (**self).zoom()
    }

    fn pixel_bounds_for(&self, bounds: &GeoBounds) -> Box2D {
        (**self).pixel_bounds_for(bounds)
    }
}

/// The parts of an interactive map the overlay needs beyond projection.
pub trait MapView: Projector {
    /// Current translation of the map's panning layer, in pixels.
    fn pane_offset(&self) -> Vector;

    fn set_dragging(&mut self, enabled: bool);

    fn dragging_enabled(&self) -> bool;

    fn set_view(&mut self, center: LatLng, zoom: f64);
}

/// Absolute mercator pixel position at `zoom`.
pub fn world_pixel(location: LatLng, zoom: f64) -> Point {
    let scale = TILE_SIZE * zoom.exp2();
    let lat = location.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = 0.5 + location.lng / 360.0;
    let y = 0.5 - (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln() / std::f64::consts::TAU;
    point(x * scale, y * scale)
}

/// Inverse of [`world_pixel`].
pub fn world_location(p: Point, zoom: f64) -> LatLng {
    let scale = TILE_SIZE * zoom.exp2();
    let lng = (p.x / scale - 0.5) * 360.0;
    let lat = (2.0 * ((0.5 - p.y / scale) * std::f64::consts::TAU).exp().atan()
        - std::f64::consts::FRAC_PI_2)
        .to_degrees();
    LatLng::new(lat, lng)
}

/// Headless map viewport: a center, a zoom level, a container size and a pan offset.
#[derive(Debug, Clone)]
pub struct WebMercatorView {
    size: Size,
    zoom: f64,
    /// World pixel shown at the container's top-left corner when the pane is not translated.
    pixel_origin: Point,
    /// Translation of the panning layer accumulated since the last view reset.
    pane: Vector,
    dragging: bool,
}

impl WebMercatorView {
    pub fn new(size: Size, center: LatLng, zoom: f64) -> Self {
        let mut view = Self {
            size,
            zoom,
            pixel_origin: point(0.0, 0.0),
            pane: vector(0.0, 0.0),
            dragging: true,
        };
        view.reset(center, zoom);
        view
    }

    fn reset(&mut self, center: LatLng, zoom: f64) {
        self.zoom = zoom;
        let half = vector(self.size.width, self.size.height) / 2.0;
        let origin = world_pixel(center, zoom) - half;
        self.pixel_origin = point(origin.x.round(), origin.y.round());
        self.pane = vector(0.0, 0.0);
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn center(&self) -> LatLng {
        let half = vector(self.size.width, self.size.height) / 2.0;
        world_location(self.pixel_origin - self.pane + half, self.zoom)
    }

    /// Scrolls the view by `offset` pixels (content moves the opposite way).
    pub fn pan_by(&mut self, offset: Vector) {
        self.pane -= offset;
    }

    /// Zooms around the current center.
    pub fn set_zoom(&mut self, zoom: f64) {
        let center = self.center();
        self.reset(center, zoom);
    }
}

impl Projector for WebMercatorView {
    fn project(&self, location: LatLng) -> Point {
        world_pixel(location, self.zoom) - self.pixel_origin.to_vector() + self.pane
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }
}

impl MapView for WebMercatorView {
    fn pane_offset(&self) -> Vector {
        self.pane
    }

    fn set_dragging(&mut self, enabled: bool) {
        self.dragging = enabled;
    }

    fn dragging_enabled(&self) -> bool {
        self.dragging
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.reset(center, zoom);
    }
}
