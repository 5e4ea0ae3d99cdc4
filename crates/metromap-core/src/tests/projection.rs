use crate::geo::{GeoBounds, LatLng};
use crate::geom::{Size, point, vector};
use crate::projection::*;

fn view() -> WebMercatorView {
    WebMercatorView::new(Size::new(800.0, 600.0), LatLng::new(59.93, 30.33), 12.0)
}

#[test]
fn world_pixel_round_trips() {
    let p = LatLng::new(59.93, 30.33);
    let back = world_location(world_pixel(p, 11.0), 11.0);
    assert!((back.lat - p.lat).abs() < 1e-9);
    assert!((back.lng - p.lng).abs() < 1e-9);
    assert_eq!(world_pixel(LatLng::new(0.0, 0.0), 0.0), point(128.0, 128.0));
}

#[test]
fn center_projects_to_viewport_middle() {
    let v = view();
    let c = v.project(LatLng::new(59.93, 30.33));
    assert!((c.x - 400.0).abs() <= 0.5);
    assert!((c.y - 300.0).abs() <= 0.5);
}

#[test]
fn panning_translates_projection_and_pane() {
    let mut v = view();
    let p = LatLng::new(59.94, 30.35);
    let before = v.project(p);
    v.pan_by(vector(50.0, -20.0));
    let after = v.project(p);
    let moved = after - before;
    assert!((moved.x + 50.0).abs() < 1e-9 && (moved.y - 20.0).abs() < 1e-9);
    assert_eq!(v.pane_offset(), vector(-50.0, 20.0));
}

#[test]
fn zooming_doubles_pixel_distances() {
    let mut v = view();
    let a = LatLng::new(59.93, 30.33);
    let b = LatLng::new(59.95, 30.36);
    let d12 = (v.project(b) - v.project(a)).length();
    v.set_zoom(13.0);
    let d13 = (v.project(b) - v.project(a)).length();
    assert!((d13 / d12 - 2.0).abs() < 1e-9);
    assert_eq!(v.pane_offset(), vector(0.0, 0.0));
}

#[test]
fn pixel_bounds_span_north_west_to_south_east() {
    let v = view();
    let geo = GeoBounds::from_points([LatLng::new(59.90, 30.30), LatLng::new(59.96, 30.37)]).unwrap();
    let b = v.pixel_bounds_for(&geo);
    assert_eq!(b.min, v.project(geo.north_west()));
    assert_eq!(b.max, v.project(geo.south_east()));
    assert!(b.width() > 0.0 && b.height() > 0.0);
}

#[test]
fn dragging_flag_is_tracked() {
    let mut v = view();
    assert!(v.dragging_enabled());
    v.set_dragging(false);
    assert!(!v.dragging_enabled());
}
