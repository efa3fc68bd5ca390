use std::f64::consts::PI;

use crate::math::Point2;

use super::point::Point64;

/// Ordered sequence of grid points; open or closed depending on context.
pub type Path64 = Vec<Point64>;

/// Ordered collection of paths.
pub type Paths64 = Vec<Path64>;

/// Floating-point path for the scaled façade.
pub type PathD = Vec<Point2>;

/// Ordered collection of floating-point paths.
pub type PathsD = Vec<PathD>;

/// Removes vertices equal to their predecessor.
///
/// For closed interpretations a trailing duplicate of the first vertex is
/// removed as well.
#[must_use]
pub fn strip_duplicates(path: &[Point64], is_closed: bool) -> Path64 {
    let mut out: Path64 = Vec::with_capacity(path.len());
    for &pt in path {
        if out.last() != Some(&pt) {
            out.push(pt);
        }
    }
    if is_closed {
        while out.len() > 1 && out.last() == out.first() {
            out.pop();
        }
    }
    out
}

/// Returns the path with vertex order reversed.
#[must_use]
pub fn reverse_path(path: &[Point64]) -> Path64 {
    path.iter().rev().copied().collect()
}

/// Scales floating coordinates onto the integer grid.
///
/// Out-of-domain results become the invalid sentinel coordinate, per
/// [`Point64::from_f64`].
#[must_use]
pub fn scale_to_path64(path: &[Point2], scale: f64) -> Path64 {
    path.iter()
        .map(|p| Point64::from_f64(p.x * scale, p.y * scale))
        .collect()
}

/// Scales grid coordinates back into floating space.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scale_to_path_d(path: &[Point64], scale: f64) -> PathD {
    path.iter()
        .map(|p| Point2::new(p.x as f64 * scale, p.y as f64 * scale))
        .collect()
}

/// Closed path approximating an ellipse, wound counter-clockwise.
///
/// Vertices lie exactly on the ellipse before grid rounding; `steps` is
/// clamped to at least 3.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ellipse(center: Point64, radius_x: f64, radius_y: f64, steps: usize) -> Path64 {
    let steps = steps.max(3);
    let theta = 2.0 * PI / steps as f64;
    let (si, co) = theta.sin_cos();
    let cx = center.x as f64;
    let cy = center.y as f64;

    let mut path = Vec::with_capacity(steps);
    path.push(Point64::from_f64(cx + radius_x, cy));
    let mut dx = co;
    let mut dy = si;
    for _ in 1..steps {
        path.push(Point64::from_f64(cx + radius_x * dx, cy + radius_y * dy));
        let x = dx * co - dy * si;
        dy = dy * co + dx * si;
        dx = x;
    }
    path
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> Point64 {
        Point64::new(x, y)
    }

    #[test]
    fn strip_consecutive_duplicates() {
        let path = vec![p(0, 0), p(0, 0), p(5, 0), p(5, 0), p(5, 5)];
        let out = strip_duplicates(&path, false);
        assert_eq!(out, vec![p(0, 0), p(5, 0), p(5, 5)]);
    }

    #[test]
    fn strip_closing_duplicate_when_closed() {
        let path = vec![p(0, 0), p(5, 0), p(5, 5), p(0, 0)];
        assert_eq!(strip_duplicates(&path, true).len(), 3);
        assert_eq!(strip_duplicates(&path, false).len(), 4);
    }

    #[test]
    fn strip_all_duplicates_collapses_to_single_point() {
        let path = vec![p(3, 3), p(3, 3), p(3, 3)];
        assert_eq!(strip_duplicates(&path, true), vec![p(3, 3)]);
    }

    #[test]
    fn reverse_path_basic() {
        let path = vec![p(0, 0), p(1, 0), p(2, 0)];
        assert_eq!(reverse_path(&path), vec![p(2, 0), p(1, 0), p(0, 0)]);
    }

    #[test]
    fn ellipse_vertices_on_circle() {
        let path = ellipse(p(50, 50), 10.0, 10.0, 32);
        assert_eq!(path.len(), 32);
        for v in &path {
            #[allow(clippy::cast_precision_loss)]
            let d = ((v.x - 50).pow(2) as f64 + (v.y - 50).pow(2) as f64).sqrt();
            // Grid rounding is the only deviation source.
            assert!((d - 10.0).abs() <= 0.75, "vertex {v:?} at distance {d}");
        }
    }

    #[test]
    fn ellipse_minimum_steps() {
        assert_eq!(ellipse(p(0, 0), 5.0, 5.0, 1).len(), 3);
    }

    #[test]
    fn scaling_round_trips() {
        let path: PathD = vec![Point2::new(1.25, -2.5), Point2::new(0.005, 3.0)];
        let scaled = scale_to_path64(&path, 100.0);
        assert_eq!(scaled, vec![p(125, -250), p(1, 300)]);
        let back = scale_to_path_d(&scaled, 0.01);
        assert!((back[0].x - 1.25).abs() < 1e-12);
        assert!((back[1].y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn scaling_out_of_domain_is_invalid() {
        use super::super::point::INVALID_COORD;
        let path: PathD = vec![Point2::new(1e12, 0.0)];
        assert_eq!(scale_to_path64(&path, 100.0)[0].x, INVALID_COORD);
    }
}
