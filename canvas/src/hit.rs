#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::Point;
use crate::consts::HIT_SLOP;
use crate::doc::{Geometry, Shape, ShapeId, ShapeLists, points_of};

/// Return the topmost shape under `pt`, if any.
#[must_use]
pub fn hit_test(pt: Point, shapes: &ShapeLists) -> Option<ShapeId> {
    shapes.iter().rev().find(|s| shape_contains(s, pt)).map(|s| s.id)
}

/// Whether `pt` falls on `shape`.
#[must_use]
pub fn shape_contains(shape: &Shape, pt: Point) -> bool {
    match &shape.geometry {
        Geometry::Rectangle { x, y, width, height } => {
            let (left, right) = ordered(*x, x + width);
            let (top, bottom) = ordered(*y, y + height);
            pt.x >= left && pt.x <= right && pt.y >= top && pt.y <= bottom
        }
        Geometry::Circle { x, y, radius } => Point::new(*x, *y).distance(pt) <= radius.abs(),
        Geometry::Arrow { points } | Geometry::Scribble { points } => near_polyline(points, pt, HIT_SLOP),
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn near_polyline(flat: &[f64], pt: Point, slop: f64) -> bool {
    let pts: Vec<Point> = points_of(flat).collect();
    match pts.as_slice() {
        [] => false,
        [only] => only.distance(pt) <= slop,
        _ => pts
            .windows(2)
            .any(|w| distance_to_segment(pt, w[0], w[1]) <= slop),
    }
}

/// Distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq <= f64::EPSILON {
        return a.distance(p);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Point::new(a.x + t * dx, a.y + t * dy).distance(p)
}
