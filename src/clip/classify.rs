//! Sub-edge fill classification.

use crate::geometry::path::PathD;
use crate::math::polygon_2d::winding_number;
use crate::math::{Point2, Vector2, TOLERANCE};

use super::split::Edge;
use super::FillRule;

/// Distance of the side-sampling probes from an edge midpoint.
const SIDE_PROBE: f64 = 1e-4;

/// Squared endpoint distance treated as the same vertex.
const MATCH_EPS_SQ: f64 = 1e-12;

/// Keeps the sub-edges separating filled from unfilled space, oriented
/// with the filled side on their left.
///
/// The fill state on each side is sampled as the winding number of the
/// subject rings just off the edge midpoint. Edges with both sides
/// filled or both unfilled lie inside or outside the result and are
/// dropped; coincident survivors (from exactly overlapping subject
/// edges) collapse to a single representative.
pub(super) fn filled_boundary(edges: &[Edge], rings: &[PathD], fill_rule: FillRule) -> Vec<Edge> {
    let mut kept: Vec<Edge> = Vec::new();
    for &(a, b) in edges {
        let d = b - a;
        let len = d.norm();
        if len < TOLERANCE {
            continue;
        }
        let left = Vector2::new(-d.y, d.x) / len;
        let mid = Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
        let left_filled = fill_rule.is_filled(winding_number(mid + left * SIDE_PROBE, rings));
        let right_filled = fill_rule.is_filled(winding_number(mid - left * SIDE_PROBE, rings));
        let oriented = match (left_filled, right_filled) {
            (true, false) => (a, b),
            (false, true) => (b, a),
            _ => continue,
        };
        if !kept.iter().any(|&e| coincident(e, oriented)) {
            kept.push(oriented);
        }
    }
    kept
}

fn coincident((a1, b1): Edge, (a2, b2): Edge) -> bool {
    (a1 - a2).norm_squared() < MATCH_EPS_SQ && (b1 - b2).norm_squared() < MATCH_EPS_SQ
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn ccw_square() -> PathD {
        vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)]
    }

    fn ring_edges(ring: &PathD) -> Vec<Edge> {
        (0..ring.len())
            .map(|i| (ring[i], ring[(i + 1) % ring.len()]))
            .collect()
    }

    #[test]
    fn ccw_ring_keeps_orientation_under_positive() {
        let ring = ccw_square();
        let edges = ring_edges(&ring);
        let kept = filled_boundary(&edges, &[ring], FillRule::Positive);
        assert_eq!(kept, edges);
    }

    #[test]
    fn cw_ring_is_empty_under_positive() {
        let ring: PathD = ccw_square().into_iter().rev().collect();
        let edges = ring_edges(&ring);
        let kept = filled_boundary(&edges, &[ring], FillRule::Positive);
        assert!(kept.is_empty());
    }

    #[test]
    fn cw_ring_reorients_under_negative() {
        let ring: PathD = ccw_square().into_iter().rev().collect();
        let edges = ring_edges(&ring);
        let kept = filled_boundary(&edges, &[ring], FillRule::Negative);
        assert_eq!(kept.len(), 4);
        // Every kept edge runs opposite its subject edge, so the filled
        // hole interior ends up on the left.
        for (a, b) in edges {
            assert!(kept.contains(&(b, a)));
        }
    }

    #[test]
    fn coincident_duplicates_collapse() {
        let ring = ccw_square();
        let mut edges = ring_edges(&ring);
        edges.extend(ring_edges(&ring));
        let kept = filled_boundary(&edges, &[ring.clone(), ring], FillRule::Positive);
        assert_eq!(kept.len(), 4);
    }
}
