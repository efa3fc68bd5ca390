//! Per-vertex join and cap generation.
//!
//! Caps are degenerate joins: the generators are called with `j == k`
//! (one normal) for path extremities, so Butt maps onto Bevel, Round onto
//! a half-turn Round, and Square onto the single-normal Square variant.

use crate::geometry::path::Path64;
use crate::geometry::point::Point64;
use crate::math::intersect_2d::line_intersect_pt;
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{arc_steps, JoinType, OffsetCtx, DELTA_TOLERANCE};

impl OffsetCtx<'_> {
    /// Emits the join geometry for vertex `j`, where `k` tracks the
    /// previous retained vertex.
    pub(super) fn offset_point(&mut self, path: &Path64, j: usize, k: &mut usize) {
        if path[j] == path[*k] {
            *k = j;
            return;
        }

        let mut sin_a = cross(self.norms[*k], self.norms[j]);
        let cos_a = self.norms[*k].dot(&self.norms[j]).clamp(-1.0, 1.0);
        sin_a = sin_a.clamp(-1.0, 1.0);

        self.refresh_group_delta(path, j, *k);
        if self.group_delta.abs() < DELTA_TOLERANCE {
            self.path_out.push(path[j]);
            return;
        }

        if cos_a > -0.999 && sin_a * self.group_delta < 0.0 {
            // Concave: insert a deliberately self-overlapping notch through
            // the original vertex. The mandatory union pass removes it.
            self.path_out.push(self.perpendic(path[j], self.norms[*k]));
            self.path_out.push(path[j]);
            self.path_out.push(self.perpendic(path[j], self.norms[j]));
        } else if cos_a > 0.999 && self.join_type != JoinType::Round {
            // Under ~2.5 degrees of turn an exact miter always suffices.
            self.do_miter(path, j, *k, cos_a);
        } else {
            match self.join_type {
                JoinType::Miter => {
                    if cos_a > self.mit_lim_sqr - 1.0 {
                        self.do_miter(path, j, *k, cos_a);
                    } else {
                        self.do_square(path, j, *k);
                    }
                }
                JoinType::Round => self.do_round(path, j, *k, sin_a.atan2(cos_a)),
                JoinType::Bevel => self.do_bevel(path, j, *k),
                JoinType::Square => self.do_square(path, j, *k),
            }
        }

        *k = j;
    }

    /// Single point on the angle bisector, scaled by
    /// `group_delta / (1 + cos_a)`.
    pub(super) fn do_miter(&mut self, path: &Path64, j: usize, k: usize, cos_a: f64) {
        let q = self.group_delta / (cos_a + 1.0);
        #[allow(clippy::cast_precision_loss)]
        self.path_out.push(Point64::from_f64(
            path[j].x as f64 + (self.norms[k].x + self.norms[j].x) * q,
            path[j].y as f64 + (self.norms[k].y + self.norms[j].y) * q,
        ));
    }

    /// Straight chord between the two perpendicular offset points; with
    /// `j == k` this is the butt cap across the path end.
    pub(super) fn do_bevel(&mut self, path: &Path64, j: usize, k: usize) {
        let (pt1, pt2) = if j == k {
            let abs_delta = self.group_delta.abs();
            (
                translated(path[j], -abs_delta, self.norms[j]),
                translated(path[j], abs_delta, self.norms[j]),
            )
        } else {
            (
                translated(path[j], self.group_delta, self.norms[k]),
                translated(path[j], self.group_delta, self.norms[j]),
            )
        };
        self.path_out.push(pt1);
        self.path_out.push(pt2);
    }

    /// Projects the vertex outward along the averaged bisector, then cuts
    /// the corner with a line through that projection, yielding exactly
    /// two vertices (the second through point reflection).
    pub(super) fn do_square(&mut self, path: &Path64, j: usize, k: usize) {
        let vec = if j == k {
            Vector2::new(self.norms[j].y, -self.norms[j].x)
        } else {
            avg_unit_vector(
                Vector2::new(-self.norms[k].y, self.norms[k].x),
                Vector2::new(self.norms[j].y, -self.norms[j].x),
            )
        };

        let abs_delta = self.group_delta.abs();
        let pt_q = path[j].to_point2() + abs_delta * vec;

        // The cut line through pt_q, perpendicular to the bisector.
        let perp = Vector2::new(vec.y, -vec.x);
        let pt1 = pt_q + self.group_delta * perp;
        let pt2 = pt_q - self.group_delta * perp;
        // The incoming offset edge line.
        let pt3 = self.perpendic_d(path[k], self.norms[k]);

        if j == k {
            let pt4 = pt3 + self.group_delta * vec;
            let Some(pt) = line_intersect_pt(pt1, pt2, pt3, pt4) else {
                self.do_bevel(path, j, k);
                return;
            };
            self.path_out.push(rounded(reflected(pt, pt_q)));
            self.path_out.push(rounded(pt));
        } else {
            let pt4 = self.perpendic_d(path[j], self.norms[k]);
            let Some(pt) = line_intersect_pt(pt1, pt2, pt3, pt4) else {
                self.do_bevel(path, j, k);
                return;
            };
            self.path_out.push(rounded(pt));
            self.path_out.push(rounded(reflected(pt, pt_q)));
        }
    }

    /// Steps the offset vector around the vertex with the group rotation,
    /// one vertex per step, then closes with the outgoing perpendicular.
    pub(super) fn do_round(&mut self, path: &Path64, j: usize, k: usize, angle: f64) {
        if self.delta_callback.is_some() {
            // Variable widths invalidate the per-group stepping.
            self.steps = arc_steps(self.arc_tolerance, self.group_delta);
        }

        let pt = path[j].to_point2();
        let mut offset_vec = self.norms[k] * self.group_delta;
        if j == k {
            offset_vec = -offset_vec;
        }
        self.path_out
            .push(Point64::from_f64(pt.x + offset_vec.x, pt.y + offset_vec.y));

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (self.steps.per_radian * angle.abs()).ceil() as usize;
        for _ in 1..steps {
            offset_vec = Vector2::new(
                offset_vec.x * self.steps.cos - self.steps.sin * offset_vec.y,
                offset_vec.x * self.steps.sin + offset_vec.y * self.steps.cos,
            );
            self.path_out
                .push(Point64::from_f64(pt.x + offset_vec.x, pt.y + offset_vec.y));
        }
        self.path_out.push(self.perpendic(path[j], self.norms[j]));
    }

    /// The vertex moved `group_delta` along a unit normal, on the grid.
    pub(super) fn perpendic(&self, pt: Point64, normal: Vector2) -> Point64 {
        translated(pt, self.group_delta, normal)
    }

    /// The vertex moved `group_delta` along a unit normal, off-grid.
    fn perpendic_d(&self, pt: Point64, normal: Vector2) -> Point2 {
        pt.to_point2() + self.group_delta * normal
    }
}

fn cross(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

#[allow(clippy::cast_precision_loss)]
fn translated(pt: Point64, delta: f64, dir: Vector2) -> Point64 {
    Point64::from_f64(pt.x as f64 + delta * dir.x, pt.y as f64 + delta * dir.y)
}

fn rounded(pt: Point2) -> Point64 {
    Point64::from_f64(pt.x, pt.y)
}

fn reflected(pt: Point2, pivot: Point2) -> Point2 {
    Point2::new(2.0 * pivot.x - pt.x, 2.0 * pivot.y - pt.y)
}

/// Unit vector along the sum of two unit vectors, or zero when they
/// cancel exactly (a full reversal).
fn avg_unit_vector(v1: Vector2, v2: Vector2) -> Vector2 {
    let sum = v1 + v2;
    let h = sum.norm();
    if h < TOLERANCE {
        Vector2::zeros()
    } else {
        sum / h
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_perpendicular_units() {
        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(0.0, 1.0);
        assert!((cross(a, b) - 1.0).abs() < TOLERANCE);
        assert!((cross(b, a) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn avg_unit_vector_bisects() {
        let v = avg_unit_vector(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0));
        let expected = std::f64::consts::FRAC_1_SQRT_2;
        assert!((v.x - expected).abs() < TOLERANCE);
        assert!((v.y - expected).abs() < TOLERANCE);
    }

    #[test]
    fn avg_unit_vector_of_opposites_is_zero() {
        let v = avg_unit_vector(Vector2::new(1.0, 0.0), Vector2::new(-1.0, 0.0));
        assert!(v.norm() < TOLERANCE);
    }

    #[test]
    fn reflected_through_pivot() {
        let pt = reflected(Point2::new(3.0, 4.0), Point2::new(1.0, 1.0));
        assert!((pt.x + 1.0).abs() < TOLERANCE);
        assert!((pt.y + 2.0).abs() < TOLERANCE);
    }
}
