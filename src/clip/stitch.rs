//! Loop stitching of classified boundary edges.

use std::f64::consts::PI;

use crate::geometry::path::PathD;
use crate::math::Vector2;

use super::split::Edge;

/// Squared endpoint distance treated as a shared vertex.
const MATCH_EPS_SQ: f64 = 1e-12;

/// Chains directed edges into closed loops by endpoint matching.
///
/// Edges arrive oriented with filled space on their left, so at a
/// junction with several outgoing candidates the continuation is the one
/// with the smallest counter-clockwise turn from the incoming direction;
/// that choice keeps the same filled region on the left and the loops
/// free of crossings. Chains that never close are dropped.
pub(super) fn connect(edges: &[Edge]) -> Vec<PathD> {
    let n = edges.len();
    let mut used = vec![false; n];
    let mut loops = Vec::new();

    for start in 0..n {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut chain: PathD = vec![edges[start].0, edges[start].1];

        loop {
            let end = chain[chain.len() - 1];
            let d_in = end - chain[chain.len() - 2];

            let close_turn = if chain.len() > 2
                && (end - chain[0]).norm_squared() < MATCH_EPS_SQ
            {
                Some(ccw_turn(d_in, chain[1] - chain[0]))
            } else {
                None
            };

            let mut best: Option<(usize, f64)> = None;
            for (idx, &(a, b)) in edges.iter().enumerate() {
                if used[idx] || (a - end).norm_squared() >= MATCH_EPS_SQ {
                    continue;
                }
                let turn = ccw_turn(d_in, b - a);
                if best.map_or(true, |(_, t)| turn < t) {
                    best = Some((idx, turn));
                }
            }

            match (close_turn, best) {
                (Some(ct), Some((_, bt))) if ct <= bt => {
                    chain.pop();
                    loops.push(chain);
                    break;
                }
                (Some(_), None) => {
                    chain.pop();
                    loops.push(chain);
                    break;
                }
                (_, Some((idx, _))) => {
                    used[idx] = true;
                    chain.push(edges[idx].1);
                }
                (None, None) => break,
            }
        }
    }
    loops
}

/// Counter-clockwise turn from direction `a` to direction `b`, in
/// `[0, 2 * pi)`; straight ahead is zero.
fn ccw_turn(a: Vector2, b: Vector2) -> f64 {
    let angle = (a.x * b.y - a.y * b.x).atan2(a.dot(&b));
    if angle < -1e-9 {
        angle + 2.0 * PI
    } else {
        angle.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn pt(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn scrambled_triangle_closes() {
        let edges = [
            (pt(10.0, 0.0), pt(5.0, 8.0)),
            (pt(0.0, 0.0), pt(10.0, 0.0)),
            (pt(5.0, 8.0), pt(0.0, 0.0)),
        ];
        let loops = connect(&edges);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 3);
    }

    #[test]
    fn unclosed_chain_is_dropped() {
        let edges = [
            (pt(0.0, 0.0), pt(10.0, 0.0)),
            (pt(10.0, 0.0), pt(10.0, 10.0)),
        ];
        assert!(connect(&edges).is_empty());
    }

    #[test]
    fn touching_loops_take_the_smallest_left_turn() {
        // Two triangles sharing the vertex at the origin; the smallest
        // counter-clockwise turn keeps them separate.
        let edges = [
            (pt(-2.0, -1.0), pt(0.0, 0.0)),
            (pt(0.0, 0.0), pt(-2.0, 1.0)),
            (pt(-2.0, 1.0), pt(-2.0, -1.0)),
            (pt(2.0, 1.0), pt(0.0, 0.0)),
            (pt(0.0, 0.0), pt(2.0, -1.0)),
            (pt(2.0, -1.0), pt(2.0, 1.0)),
        ];
        let loops = connect(&edges);
        assert_eq!(loops.len(), 2);
        assert!(loops.iter().all(|l| l.len() == 3));
    }

    #[test]
    fn straight_continuation_beats_turning_off() {
        assert!(ccw_turn(Vector2::new(1.0, 0.0), Vector2::new(1.0, 0.0)) < 1e-9);
        let left = ccw_turn(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0));
        let right = ccw_turn(Vector2::new(1.0, 0.0), Vector2::new(0.0, -1.0));
        assert!((left - PI / 2.0).abs() < 1e-12);
        assert!((right - 1.5 * PI).abs() < 1e-12);
    }
}
