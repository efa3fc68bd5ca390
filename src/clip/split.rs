//! Segment splitting at crossings.

use crate::geometry::path::PathD;
use crate::math::intersect_2d::line_line_params;
use crate::math::{Point2, TOLERANCE};

/// Parameter margin below which an intersection counts as an endpoint
/// touch rather than an interior cut.
const PARAM_EPS: f64 = 1e-9;

/// A directed sub-edge between consecutive cut points.
pub(super) type Edge = (Point2, Point2);

/// Cuts every segment of `rings` at its interior intersections with
/// every other segment and returns the resulting sub-edges.
///
/// Crossings, endpoint-on-interior touches, and collinear overlaps all
/// produce cuts. Each cut point is computed once per segment pair, so
/// the fragments on both segments share the exact same vertex.
pub(super) fn split_at_crossings(rings: &[PathD]) -> Vec<Edge> {
    let mut segs: Vec<Edge> = Vec::new();
    for ring in rings {
        let n = ring.len();
        for i in 0..n {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            if (b - a).norm_squared() > TOLERANCE {
                segs.push((a, b));
            }
        }
    }

    let mut cuts: Vec<Vec<(f64, Point2)>> = vec![Vec::new(); segs.len()];
    for i in 0..segs.len() {
        for j in (i + 1)..segs.len() {
            cut_pair(&segs, &mut cuts, i, j);
        }
    }

    let mut edges = Vec::with_capacity(segs.len() * 2);
    for (seg, mut seg_cuts) in segs.into_iter().zip(cuts) {
        seg_cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut prev = seg.0;
        for (_, pt) in seg_cuts {
            if (pt - prev).norm_squared() > TOLERANCE {
                edges.push((prev, pt));
                prev = pt;
            }
        }
        if (seg.1 - prev).norm_squared() > TOLERANCE {
            edges.push((prev, seg.1));
        }
    }
    edges
}

fn interior(t: f64) -> bool {
    t > PARAM_EPS && t < 1.0 - PARAM_EPS
}

fn cut_pair(segs: &[Edge], cuts: &mut [Vec<(f64, Point2)>], i: usize, j: usize) {
    let (p1, p2) = segs[i];
    let (p3, p4) = segs[j];
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    if let Some((t, u)) = line_line_params(p1, d1, p3, d2) {
        if t < -PARAM_EPS || t > 1.0 + PARAM_EPS || u < -PARAM_EPS || u > 1.0 + PARAM_EPS {
            return;
        }
        // Snap touches onto the touched endpoint so both fragments agree
        // bit for bit.
        let pt = if u <= PARAM_EPS {
            p3
        } else if u >= 1.0 - PARAM_EPS {
            p4
        } else if t <= PARAM_EPS {
            p1
        } else if t >= 1.0 - PARAM_EPS {
            p2
        } else {
            p1 + d1 * t
        };
        if interior(t) {
            cuts[i].push((t, pt));
        }
        if interior(u) {
            cuts[j].push((u, pt));
        }
    } else {
        // Parallel; only collinear overlaps produce cuts, at the other
        // segment's projected endpoints.
        let off = p3 - p1;
        if (d1.x * off.y - d1.y * off.x).abs() > 1e-9 * d1.norm() {
            return;
        }
        let len1_sq = d1.norm_squared();
        for e in [p3, p4] {
            let t = (e - p1).dot(&d1) / len1_sq;
            if interior(t) {
                cuts[i].push((t, e));
            }
        }
        let len2_sq = d2.norm_squared();
        for e in [p1, p2] {
            let u = (e - p3).dot(&d2) / len2_sq;
            if interior(u) {
                cuts[j].push((u, e));
            }
        }
    }
}
