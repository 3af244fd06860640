//! Interpolation helpers:
//! - lerp_* (component-wise blends per value kind)
//! - lerp_path (point lists; `None` when cardinalities differ)
//! - bezier_ease (cubic-bezier timing curve with x inverted by bisection)

use crate::value::{Point2, Rgba};

const BEZIER_ITERATIONS: usize = 48;
const BEZIER_TOLERANCE: f64 = 1e-9;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_point(a: Point2, b: Point2, t: f64) -> Point2 {
    Point2 {
        x: lerp_f64(a.x, b.x, t),
        y: lerp_f64(a.y, b.y, t),
    }
}

#[inline]
pub fn lerp_rgba(a: Rgba, b: Rgba, t: f64) -> Rgba {
    Rgba {
        r: lerp_f64(a.r, b.r, t),
        g: lerp_f64(a.g, b.g, t),
        b: lerp_f64(a.b, b.b, t),
        a: lerp_f64(a.a, b.a, t),
    }
}

/// Point-wise blend of two paths. Returns `None` if the point counts differ.
pub fn lerp_path(a: &[Point2], b: &[Point2], t: f64) -> Option<Vec<Point2>> {
    if a.len() != b.len() {
        return None;
    }
    Some(
        a.iter()
            .zip(b.iter())
            .map(|(pa, pb)| lerp_point(*pa, *pb, t))
            .collect(),
    )
}

/// Cubic Bezier basis with p0 = 0 and p3 = 1.
#[inline]
fn cubic_bezier(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

/// Given control points (x1, y1, x2, y2) and progress `t` in [0,1],
/// compute the eased progress by inverting the x bezier via binary search.
///
/// `x1`/`x2` are clamped into [0,1] so x(s) is monotonic.
pub fn bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    let x1 = x1.clamp(0.0, 1.0);
    let x2 = x2.clamp(0.0, 1.0);
    if x1 == y1 && x2 == y2 {
        return t;
    }
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = t;
    for _ in 0..BEZIER_ITERATIONS {
        let x = cubic_bezier(x1, x2, mid);
        if (x - t).abs() < BEZIER_TOLERANCE {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    cubic_bezier(y1, y2, mid)
}
