//! Path offsetting with configurable join and cap geometry.
//!
//! Registered path groups are offset a signed perpendicular distance:
//! one parallel rail per edge, a join per vertex chosen by [`JoinType`],
//! a cap per open-path extremity chosen by [`EndType`]. Concave joins
//! emit a deliberately self-overlapping notch instead of being trimmed
//! locally; a single union pass over the accumulated raw output (see
//! [`crate::clip`]) removes every overlap at once.

mod group;
mod joins;

use std::f64::consts::PI;

use crate::boundary::BoundaryTree;
use crate::clip::{BooleanEngine, ClipType, FillRule, UnionEngine};
use crate::error::{GeometryError, Result};
use crate::geometry::path::{
    ellipse, reverse_path, scale_to_path64, scale_to_path_d, Path64, Paths64, PathsD,
};
use crate::geometry::point::Point64;
use crate::math::Vector2;

use group::Group;

/// Corner geometry where two offset edges meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Miter,
    Square,
    Bevel,
    Round,
}

/// Treatment of a path's extremities.
///
/// `Polygon` closes the path as a filled ring, `Joined` offsets both
/// sides of an open path into one closed loop, and the remaining
/// variants cap an open path's ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndType {
    Polygon,
    Joined,
    Butt,
    Square,
    Round,
}

/// Per-vertex offset width strategy.
///
/// Receives the path being offset, its edge normals, and the current and
/// previous vertex indices; the returned width replaces the constant
/// delta at that vertex.
pub type DeltaCallback = dyn Fn(&Path64, &[Vector2], usize, usize) -> f64;

/// Offsets below this magnitude leave the input unchanged.
const MIN_DISCERNIBLE_DELTA: f64 = 0.5;

/// Widths below this are treated as no offset at all.
const DELTA_TOLERANCE: f64 = 1e-12;

/// Arc stepping state for round joins and caps.
#[derive(Debug, Clone, Copy)]
struct ArcSteps {
    per_radian: f64,
    sin: f64,
    cos: f64,
}

/// Derives the per-step rotation for round joins from the arc tolerance
/// and the effective radius.
///
/// Explicit tolerances above 0.01 are honored; anything lower derives
/// the tolerance as `radius / 500`. The step count for a full turn is
/// `pi / acos(1 - tolerance / radius)`, capped at `pi * radius`. The
/// step rotation runs clockwise for negative deltas.
fn arc_steps(arc_tolerance: f64, group_delta: f64) -> ArcSteps {
    let radius = group_delta.abs();
    let arc_tol = if arc_tolerance > 0.01 {
        arc_tolerance
    } else {
        radius / 500.0
    };
    let steps_per_360 =
        (PI / (1.0 - arc_tol / radius).clamp(-1.0, 1.0).acos()).min(PI * radius);
    let (sin, cos) = (2.0 * PI / steps_per_360).sin_cos();
    ArcSteps {
        per_radian: steps_per_360 / (2.0 * PI),
        sin: if group_delta < 0.0 { -sin } else { sin },
        cos,
    }
}

/// Offsets registered path groups by a signed perpendicular distance.
///
/// Groups are registered with [`add_path`](Self::add_path) or
/// [`add_paths`](Self::add_paths), each with its own join and end type,
/// and offset together by [`execute`](Self::execute). For `Polygon` end
/// types a positive delta grows the outline and a negative delta shrinks
/// it, regardless of the input winding; for open end types the sign is
/// ignored.
///
/// All working buffers live in a per-invocation context, so a single
/// offsetter may serve concurrent `execute` calls.
pub struct PathOffset {
    groups: Vec<Group>,
    miter_limit: f64,
    arc_tolerance: f64,
    merge_groups: bool,
    preserve_collinear: bool,
    reverse_solution: bool,
    delta_callback: Option<Box<DeltaCallback>>,
}

impl Default for PathOffset {
    fn default() -> Self {
        Self::new(2.0, 0.0)
    }
}

impl PathOffset {
    /// Creates an offsetter.
    ///
    /// `miter_limit` caps the miter spike length as a multiple of the
    /// offset width; values at or below 1 square every sharp corner.
    /// `arc_tolerance` bounds the deviation of round joins and caps from
    /// the ideal arc; values at or below 0.01 derive the bound from the
    /// offset radius instead.
    #[must_use]
    pub fn new(miter_limit: f64, arc_tolerance: f64) -> Self {
        Self {
            groups: Vec::new(),
            miter_limit,
            arc_tolerance,
            merge_groups: true,
            preserve_collinear: false,
            reverse_solution: false,
            delta_callback: None,
        }
    }

    /// Registers a single path as its own group.
    pub fn add_path(&mut self, path: &[Point64], join_type: JoinType, end_type: EndType) {
        self.add_paths(&[path.to_vec()], join_type, end_type);
    }

    /// Registers a path set sharing one join/end type.
    ///
    /// Duplicate vertices are stripped and the group's orientation is
    /// fixed here, once, from the path holding the lowest vertex.
    pub fn add_paths(&mut self, paths: &[Path64], join_type: JoinType, end_type: EndType) {
        self.groups.push(Group::new(paths, join_type, end_type));
    }

    /// When false, each group is cleaned up separately instead of being
    /// unioned with the others. Default true.
    pub fn set_merge_groups(&mut self, merge_groups: bool) {
        self.merge_groups = merge_groups;
    }

    /// Keep exactly-collinear vertices in the cleaned output.
    pub fn set_preserve_collinear(&mut self, preserve_collinear: bool) {
        self.preserve_collinear = preserve_collinear;
    }

    /// Reverse the winding of every output path.
    pub fn set_reverse_solution(&mut self, reverse_solution: bool) {
        self.reverse_solution = reverse_solution;
    }

    /// Installs a per-vertex width strategy overriding the constant
    /// delta.
    pub fn set_delta_callback(&mut self, callback: Box<DeltaCallback>) {
        self.delta_callback = Some(callback);
    }

    /// Offsets every registered group by `delta` and returns the cleaned
    /// result.
    ///
    /// Deltas below 0.5 are not discernible on the integer grid: the
    /// duplicate-stripped inputs are returned verbatim and no cleanup
    /// runs.
    #[must_use]
    pub fn execute(&self, delta: f64) -> Paths64 {
        if delta.abs() < MIN_DISCERNIBLE_DELTA {
            return self
                .groups
                .iter()
                .flat_map(|g| g.in_paths.iter().filter(|p| !p.is_empty()).cloned())
                .collect();
        }

        if self.merge_groups {
            let mut raw = Paths64::new();
            for group in &self.groups {
                self.offset_group(group, delta, &mut raw);
            }
            self.cleaned(raw, self.solution_reversed())
        } else {
            let mut out = Paths64::new();
            for group in &self.groups {
                let mut raw = Paths64::new();
                self.offset_group(group, delta, &mut raw);
                out.extend(self.cleaned(raw, group.paths_reversed));
            }
            out
        }
    }

    /// Like [`execute`](Self::execute), delivering the result organized
    /// into nested outer/hole structure.
    #[must_use]
    pub fn execute_into_tree(&self, delta: f64) -> BoundaryTree {
        BoundaryTree::from_paths(&self.execute(delta))
    }

    /// Only the first polygon group's orientation selects the cleanup
    /// fill rule; mixed-orientation group sets are not reconciled
    /// further.
    fn solution_reversed(&self) -> bool {
        self.groups
            .iter()
            .find(|g| g.end_type == EndType::Polygon)
            .is_some_and(|g| g.paths_reversed)
    }

    /// Removes self-intersections from the raw offset output.
    fn cleaned(&self, raw: Paths64, reversed: bool) -> Paths64 {
        let fill_rule = if reversed {
            FillRule::Negative
        } else {
            FillRule::Positive
        };
        let mut engine = UnionEngine::new();
        engine.preserve_collinear = self.preserve_collinear;
        engine.reverse_solution = self.reverse_solution != reversed;
        engine.add_subject(&raw);
        engine.execute(ClipType::Union, fill_rule)
    }

    fn offset_group(&self, group: &Group, delta: f64, raw: &mut Paths64) {
        let group_delta = if group.end_type == EndType::Polygon {
            if group.lowest_path_idx.is_none() {
                delta.abs()
            } else if group.paths_reversed {
                -delta
            } else {
                delta
            }
        } else {
            delta.abs()
        };

        let mit_lim_sqr = if self.miter_limit <= 1.0 {
            2.0
        } else {
            2.0 / (self.miter_limit * self.miter_limit)
        };

        let uses_arcs = group.join_type == JoinType::Round || group.end_type == EndType::Round;
        let steps = if uses_arcs {
            arc_steps(self.arc_tolerance, group_delta)
        } else {
            ArcSteps {
                per_radian: 0.0,
                sin: 0.0,
                cos: 1.0,
            }
        };

        let mut ctx = OffsetCtx {
            join_type: group.join_type,
            end_type: group.end_type,
            group_delta,
            group_reversed: group.paths_reversed,
            mit_lim_sqr,
            arc_tolerance: self.arc_tolerance,
            steps,
            norms: Vec::new(),
            path_out: Path64::new(),
            delta_callback: self.delta_callback.as_deref(),
        };

        for path in &group.in_paths {
            ctx.offset_path(path, raw);
        }
    }
}

/// Working state for one group of one `execute` invocation.
///
/// Every mutable buffer lives here rather than on [`PathOffset`], so
/// concurrent invocations never share state.
struct OffsetCtx<'a> {
    join_type: JoinType,
    end_type: EndType,
    group_delta: f64,
    group_reversed: bool,
    mit_lim_sqr: f64,
    arc_tolerance: f64,
    steps: ArcSteps,
    norms: Vec<Vector2>,
    path_out: Path64,
    delta_callback: Option<&'a DeltaCallback>,
}

impl OffsetCtx<'_> {
    fn offset_path(&mut self, path: &Path64, raw: &mut Paths64) {
        if path.is_empty() {
            return;
        }
        if path.len() == 1 {
            let out = self.point_path(path);
            if !out.is_empty() {
                raw.push(out);
            }
            return;
        }

        // A 2-point "polygon" cannot sustain the joined machinery.
        let end_type = if path.len() == 2 && self.end_type == EndType::Joined {
            if self.join_type == JoinType::Round {
                EndType::Round
            } else {
                EndType::Square
            }
        } else {
            self.end_type
        };

        self.build_normals(path);
        match end_type {
            EndType::Polygon => self.offset_ring(path, raw),
            EndType::Joined => {
                self.offset_ring(path, raw);
                let reversed = reverse_path(path);
                self.build_normals(&reversed);
                self.offset_ring(&reversed, raw);
            }
            _ => self.offset_open(path, end_type, raw),
        }
    }

    /// A 1-point path becomes a circle or an axis-aligned square of the
    /// offset radius around the point.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn point_path(&mut self, path: &Path64) -> Path64 {
        if self.delta_callback.is_some() {
            self.refresh_group_delta(path, 0, 0);
            if self.end_type == EndType::Round && self.group_delta.abs() > DELTA_TOLERANCE {
                self.steps = arc_steps(self.arc_tolerance, self.group_delta);
            }
        }
        let radius = self.group_delta.abs();
        if radius < DELTA_TOLERANCE {
            return vec![path[0]];
        }
        if self.end_type == EndType::Round {
            let steps = (self.steps.per_radian * 2.0 * PI).ceil() as usize;
            ellipse(path[0], radius, radius, steps)
        } else {
            let pt = path[0].to_point2();
            vec![
                Point64::from_f64(pt.x - radius, pt.y - radius),
                Point64::from_f64(pt.x + radius, pt.y - radius),
                Point64::from_f64(pt.x + radius, pt.y + radius),
                Point64::from_f64(pt.x - radius, pt.y + radius),
            ]
        }
    }

    /// One full pass around a closed ring.
    fn offset_ring(&mut self, path: &Path64, raw: &mut Paths64) {
        self.path_out = Path64::new();
        let mut k = path.len() - 1;
        for j in 0..path.len() {
            self.offset_point(path, j, &mut k);
        }
        raw.push(std::mem::take(&mut self.path_out));
    }

    /// Start cap, left rail forward, end cap, right rail backward.
    fn offset_open(&mut self, path: &Path64, end_type: EndType, raw: &mut Paths64) {
        self.path_out = Path64::new();
        let hi = path.len() - 1;

        self.cap(path, 0, end_type);

        let mut k = 0;
        for j in 1..hi {
            self.offset_point(path, j, &mut k);
        }

        // Flip the normals for the return rail.
        for i in (1..=hi).rev() {
            self.norms[i] = -self.norms[i - 1];
        }
        self.norms[0] = self.norms[hi];

        self.cap(path, hi, end_type);

        let mut k = hi;
        for j in (1..hi).rev() {
            self.offset_point(path, j, &mut k);
        }

        raw.push(std::mem::take(&mut self.path_out));
    }

    /// Caps are degenerate joins called with a single normal.
    fn cap(&mut self, path: &Path64, i: usize, end_type: EndType) {
        self.refresh_group_delta(path, i, i);
        if self.group_delta.abs() < DELTA_TOLERANCE {
            self.path_out.push(path[i]);
            return;
        }
        match end_type {
            EndType::Butt => self.do_bevel(path, i, i),
            EndType::Round => self.do_round(path, i, i, PI),
            _ => self.do_square(path, i, i),
        }
    }

    /// Re-evaluates the width strategy for the current vertex, negated
    /// when the group is reversed.
    fn refresh_group_delta(&mut self, path: &Path64, j: usize, k: usize) {
        if let Some(callback) = self.delta_callback {
            let delta = callback(path, &self.norms, j, k);
            self.group_delta = if self.group_reversed { -delta } else { delta };
        }
    }

    fn build_normals(&mut self, path: &Path64) {
        self.norms.clear();
        self.norms.reserve(path.len());
        for w in path.windows(2) {
            self.norms.push(unit_normal(w[0], w[1]));
        }
        self.norms.push(unit_normal(path[path.len() - 1], path[0]));
    }
}

/// Unit perpendicular of the edge `a -> b`, pointing to its right.
#[allow(clippy::cast_precision_loss)]
fn unit_normal(a: Point64, b: Point64) -> Vector2 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    if dx == 0.0 && dy == 0.0 {
        return Vector2::zeros();
    }
    let inverse = 1.0 / dx.hypot(dy);
    Vector2::new(dy * inverse, -dx * inverse)
}

/// One-shot offset of `paths` by `delta`.
#[must_use]
pub fn inflate_paths(
    paths: &[Path64],
    delta: f64,
    join_type: JoinType,
    end_type: EndType,
    miter_limit: f64,
    arc_tolerance: f64,
) -> Paths64 {
    let mut offset = PathOffset::new(miter_limit, arc_tolerance);
    offset.add_paths(paths, join_type, end_type);
    offset.execute(delta)
}

/// One-shot offset of floating paths via the scaled integer pipeline.
///
/// `precision` is the number of retained decimal places, in `[-8, 8]`.
/// Scaled coordinates falling outside the safe integer domain convert to
/// the invalid sentinel coordinate.
///
/// # Errors
///
/// Returns [`GeometryError::PrecisionOutOfRange`] when `precision` lies
/// outside `[-8, 8]`.
pub fn inflate_paths_d(
    paths: &PathsD,
    delta: f64,
    join_type: JoinType,
    end_type: EndType,
    precision: i32,
    miter_limit: f64,
    arc_tolerance: f64,
) -> Result<PathsD> {
    if !(-8..=8).contains(&precision) {
        return Err(GeometryError::PrecisionOutOfRange(precision).into());
    }
    let scale = 10_f64.powi(precision);
    let scaled: Paths64 = paths.iter().map(|p| scale_to_path64(p, scale)).collect();
    let solution = inflate_paths(
        &scaled,
        delta * scale,
        join_type,
        end_type,
        miter_limit,
        arc_tolerance * scale,
    );
    Ok(solution
        .iter()
        .map(|p| scale_to_path_d(p, 1.0 / scale))
        .collect())
}
