use crate::error::Error;
use crate::geom::*;

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn midpoint_distance_and_lerp() {
    let a = point(0.0, 0.0);
    let b = point(6.0, 8.0);
    assert_eq!(midpoint(a, b), point(3.0, 4.0));
    assert_close(distance(a, b), 10.0);
    assert_eq!(lerp(a, b, 0.25), point(1.5, 2.0));
    assert_eq!((b - a) * 0.5 + vector(1.0, 1.0), vector(4.0, 5.0));
}

#[test]
fn circumcenter_is_equidistant() {
    let pts = [point(12.5, -3.0), point(40.0, 7.25), point(18.0, 30.0)];
    let c = circumcenter(&pts).unwrap();
    let r0 = distance(c, pts[0]);
    assert_close(distance(c, pts[1]), r0);
    assert_close(distance(c, pts[2]), r0);
}

#[test]
fn circumcenter_of_right_triangle_is_hypotenuse_midpoint() {
    let pts = [point(0.0, 0.0), point(4.0, 0.0), point(0.0, 3.0)];
    let c = circumcenter(&pts).unwrap();
    assert_close(c.x, 2.0);
    assert_close(c.y, 1.5);
}

#[test]
fn collinear_points_are_degenerate() {
    let pts = [point(0.0, 0.0), point(1.0, 1.0), point(5.0, 5.0)];
    assert!(matches!(
        circumcenter(&pts),
        Err(Error::DegenerateGeometry { .. })
    ));

    let coincident = [point(2.0, 2.0), point(2.0, 2.0), point(7.0, 1.0)];
    assert!(matches!(
        circumcenter(&coincident),
        Err(Error::DegenerateGeometry { .. })
    ));
}

#[test]
fn circumcenter_requires_exactly_three_points() {
    assert!(circumcenter(&[point(0.0, 0.0), point(1.0, 0.0)]).is_err());
    assert!(
        circumcenter(&[
            point(0.0, 0.0),
            point(1.0, 0.0),
            point(0.0, 1.0),
            point(1.0, 1.0)
        ])
        .is_err()
    );
}

#[test]
fn representative_triple_picks_largest_triangle() {
    // A nearly collinear trio plus one far-off point.
    let pts = [
        point(0.0, 0.0),
        point(1.0, 0.1),
        point(2.0, 0.0),
        point(1.0, 10.0),
    ];
    assert_eq!(representative_triple(&pts), Some([0, 2, 3]));
    assert_eq!(representative_triple(&pts[..2]), None);
    assert_eq!(representative_triple(&pts[..3]), Some([0, 1, 2]));
}

#[test]
fn bounding_box_spans_points() {
    let b = bounding_box([point(3.0, -1.0), point(-2.0, 4.0), point(0.0, 0.0)]).unwrap();
    assert_eq!(b.min, point(-2.0, -1.0));
    assert_eq!(b.max, point(3.0, 4.0));
    assert!(bounding_box(std::iter::empty()).is_none());
}
