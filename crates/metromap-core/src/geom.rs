#![forbid(unsafe_code)]

//! Pixel-space geometry used by the schematic layout.
//!
//! Everything here works on surface-local pixel coordinates (y grows downwards). At map scale
//! the values stay well inside `f64` precision, so the helpers are exact apart from the
//! collinearity check in [`circumcenter`].

use crate::error::{Error, Result};
use nalgebra as na;

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Rect = euclid::Rect<f64, Unit>;
pub type Box2D = euclid::Box2D<f64, Unit>;

/// Relative determinant threshold below which three points count as collinear.
pub const COLLINEAR_EPSILON: f64 = 1e-9;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn midpoint(a: Point, b: Point) -> Point {
    a.lerp(b, 0.5)
}

pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).length()
}

/// Point at `t` along the segment `a -> b` (`t = 0` is `a`, `t = 1` is `b`).
pub fn lerp(a: Point, b: Point, t: f64) -> Point {
    a + (b - a) * t
}

/// Center of the circle passing through exactly three points.
///
/// Solved as the intersection of the perpendicular bisectors of `p0p1` and `p0p2`, translated so
/// `p0` sits at the origin. Collinear (or coincident) points have no circumcircle and yield
/// [`Error::DegenerateGeometry`], as does any input that is not exactly three points; callers with
/// larger clusters pick a triple first via [`representative_triple`].
pub fn circumcenter(points: &[Point]) -> Result<Point> {
    let [p0, p1, p2] = points else {
        return Err(Error::DegenerateGeometry {
            message: format!("circumcenter needs exactly 3 points, got {}", points.len()),
        });
    };
    let b = *p1 - *p0;
    let c = *p2 - *p0;

    let det = b.cross(c);
    let scale = b.length() * c.length();
    if !det.is_finite() || scale == 0.0 || det.abs() <= COLLINEAR_EPSILON * scale {
        return Err(Error::DegenerateGeometry {
            message: format!(
                "points ({}, {}), ({}, {}), ({}, {}) are collinear",
                p0.x, p0.y, p1.x, p1.y, p2.x, p2.y
            ),
        });
    }

    let m = na::Matrix2::new(b.x, b.y, c.x, c.y);
    let rhs = na::Vector2::new(b.square_length() * 0.5, c.square_length() * 0.5);
    let Some(solution) = m.lu().solve(&rhs) else {
        return Err(Error::DegenerateGeometry {
            message: "perpendicular bisectors do not intersect".to_string(),
        });
    };

    Ok(*p0 + vector(solution.x, solution.y))
}

/// Twice the signed area of the triangle `abc`.
fn doubled_area(a: Point, b: Point, c: Point) -> f64 {
    (b - a).cross(c - a)
}

/// Picks the three points spanning the largest triangle.
///
/// Returns indices into `points` in ascending order; ties keep the first triple found in
/// lexicographic index order. `None` when fewer than three points are given.
pub fn representative_triple(points: &[Point]) -> Option<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut best = [0, 1, 2];
    let mut best_area = doubled_area(points[0], points[1], points[2]).abs();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let area = doubled_area(points[i], points[j], points[k]).abs();
                if area > best_area {
                    best_area = area;
                    best = [i, j, k];
                }
            }
        }
    }
    Some(best)
}

/// Smallest box containing every point, or `None` for an empty input.
pub fn bounding_box(points: impl IntoIterator<Item = Point>) -> Option<Box2D> {
    let mut it = points.into_iter();
    let first = it.next()?;
    let mut b = Box2D::new(first, first);
    for p in it {
        b.min = b.min.min(p);
        b.max = b.max.max(p);
    }
    Some(b)
}
