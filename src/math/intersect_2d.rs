use super::{Point2, Vector2, TOLERANCE};

/// Intersection of the two logical lines through `(p1, p2)` and `(p3, p4)`.
///
/// Returns `None` when the determinant is exactly zero (parallel lines).
/// The parameter on the first segment is clamped to `[0, 1]`, so the
/// returned point never leaves segment 1.
#[must_use]
pub fn line_intersect_pt(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<Point2> {
    let dx1 = p2.x - p1.x;
    let dy1 = p2.y - p1.y;
    let dx2 = p4.x - p3.x;
    let dy2 = p4.y - p3.y;
    let det = dy1 * dx2 - dy2 * dx1;
    if det == 0.0 {
        return None;
    }
    let t = ((p1.x - p3.x) * dy2 - (p1.y - p3.y) * dx2) / det;
    if t <= 0.0 {
        Some(p1)
    } else if t >= 1.0 {
        Some(p2)
    } else {
        Some(Point2::new(p1.x + t * dx1, p1.y + t * dy1))
    }
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not
/// parallel.
#[must_use]
pub fn line_line_params(p1: Point2, d1: Vector2, p2: Point2, d2: Vector2) -> Option<(f64, f64)> {
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let t = (dx * d2.y - dy * d2.x) / cross;
    let u = (dx * d1.y - dy * d1.x) / cross;
    Some((t, u))
}
