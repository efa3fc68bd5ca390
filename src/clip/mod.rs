//! Boolean union of closed paths.
//!
//! A purpose-built union pipeline: subject segments are split at their
//! crossings, each sub-edge is classified by the fill state on its two
//! sides, the edges separating filled from unfilled space are kept with
//! the filled side on their left, and the survivors are stitched back
//! into closed loops. This is the cleanup pass that removes the
//! self-intersections deliberately introduced by the offset join
//! generators; intersection, difference, and xor are not provided.

mod classify;
mod split;
mod stitch;

use crate::geometry::path::{strip_duplicates, Path64, PathD, Paths64};
use crate::geometry::point::Point64;
use crate::math::polygon_2d::signed_area;
use crate::math::predicates::is_collinear;

/// Boolean operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipType {
    Union,
}

/// Winding-count interpretation deciding which regions are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

impl FillRule {
    /// True when a winding count is filled under this rule.
    pub(crate) fn is_filled(self, winding: i32) -> bool {
        match self {
            Self::EvenOdd => winding % 2 != 0,
            Self::NonZero => winding != 0,
            Self::Positive => winding > 0,
            Self::Negative => winding < 0,
        }
    }
}

/// Interface of the boolean clipping collaborator.
pub trait BooleanEngine {
    /// Registers subject paths, interpreted as closed rings.
    fn add_subject(&mut self, paths: &[Path64]);

    /// Runs the operation under `fill_rule` and returns the resulting
    /// paths.
    fn execute(&mut self, clip_type: ClipType, fill_rule: FillRule) -> Paths64;
}

/// Union engine over closed integer paths.
#[derive(Debug, Default)]
pub struct UnionEngine {
    subjects: Paths64,
    /// Keep exactly-collinear interior vertices in the output.
    pub preserve_collinear: bool,
    /// Reverse the winding of every output path.
    pub reverse_solution: bool,
}

impl UnionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds a stitched loop back onto the grid, dropping whatever
    /// collapses in the process.
    fn tidied(&self, ring: &PathD) -> Option<Path64> {
        let rounded: Path64 = ring.iter().map(|p| Point64::from_f64(p.x, p.y)).collect();
        let mut path = strip_duplicates(&rounded, true);
        if !self.preserve_collinear {
            remove_collinear(&mut path);
        }
        if path.len() < 3 || signed_area(&path) == 0.0 {
            return None;
        }
        if self.reverse_solution {
            path.reverse();
        }
        Some(path)
    }
}

impl BooleanEngine for UnionEngine {
    fn add_subject(&mut self, paths: &[Path64]) {
        self.subjects.extend(paths.iter().cloned());
    }

    fn execute(&mut self, _clip_type: ClipType, fill_rule: FillRule) -> Paths64 {
        // Step 1: Closed floating rings; degenerate subjects contribute
        // nothing.
        let rings: Vec<PathD> = self
            .subjects
            .iter()
            .filter(|p| p.len() >= 3)
            .map(|p| p.iter().map(|pt| pt.to_point2()).collect())
            .collect();

        // Step 2: Split every segment at its crossings.
        let edges = split::split_at_crossings(&rings);

        // Step 3: Keep the sub-edges separating filled from unfilled
        // space, filled side left.
        let boundary = classify::filled_boundary(&edges, &rings, fill_rule);

        // Step 4: Stitch the kept edges into closed loops.
        let loops = stitch::connect(&boundary);

        // Step 5: Round back onto the grid and drop what collapsed.
        loops.iter().filter_map(|ring| self.tidied(ring)).collect()
    }
}

/// Removes interior vertices lying exactly on the line through their
/// neighbours, spikes included.
fn remove_collinear(path: &mut Path64) {
    let mut i = 0;
    while path.len() > 2 && i < path.len() {
        let prev = path[(i + path.len() - 1) % path.len()];
        let next = path[(i + 1) % path.len()];
        if is_collinear(prev, path[i], next) {
            path.remove(i);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
}
