use crate::geometry::path::{strip_duplicates, Path64, Paths64};
use crate::geometry::point::Point64;
use crate::math::polygon_2d::signed_area;

use super::{EndType, JoinType};

/// A set of input paths sharing one join/end type and one orientation
/// decision.
///
/// The `paths_reversed` flag is computed once here, from the signed area
/// of the path holding the lowest extremity vertex, and never changes. It
/// alone decides whether the delta is negated for polygon offsetting.
#[derive(Debug)]
pub(super) struct Group {
    pub in_paths: Paths64,
    pub join_type: JoinType,
    pub end_type: EndType,
    pub paths_reversed: bool,
    pub lowest_path_idx: Option<usize>,
}

impl Group {
    pub fn new(paths: &[Path64], join_type: JoinType, end_type: EndType) -> Self {
        let is_joined = matches!(end_type, EndType::Polygon | EndType::Joined);
        let in_paths: Paths64 = paths
            .iter()
            .map(|p| strip_duplicates(p, is_joined))
            .collect();

        if end_type == EndType::Polygon {
            let lowest_path_idx = lowest_path_idx(&in_paths);
            let paths_reversed =
                lowest_path_idx.is_some_and(|i| signed_area(&in_paths[i]) < 0.0);
            Self {
                in_paths,
                join_type,
                end_type,
                paths_reversed,
                lowest_path_idx,
            }
        } else {
            Self {
                in_paths,
                join_type,
                end_type,
                paths_reversed: false,
                lowest_path_idx: None,
            }
        }
    }
}

/// Index of the path containing the overall lowest vertex: minimal Y,
/// ties broken toward greater X.
///
/// Paths whose signed area is exactly zero carry no orientation and are
/// skipped, so they can never establish the group's reversed flag.
fn lowest_path_idx(paths: &[Path64]) -> Option<usize> {
    let mut result = None;
    let mut bot: Option<Point64> = None;
    for (i, path) in paths.iter().enumerate() {
        if signed_area(path) == 0.0 {
            continue;
        }
        for &pt in path {
            let better = match bot {
                None => true,
                Some(b) => pt.y < b.y || (pt.y == b.y && pt.x > b.x),
            };
            if better {
                bot = Some(pt);
                result = Some(i);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i64, y: i64) -> Point64 {
        Point64::new(x, y)
    }

    fn ccw_square() -> Vec<Point64> {
        vec![p(0, 0), p(10, 0), p(10, 10), p(0, 10)]
    }

    #[test]
    fn ccw_polygon_is_not_reversed() {
        let group = Group::new(&vec![ccw_square()], JoinType::Miter, EndType::Polygon);
        assert!(!group.paths_reversed);
        assert_eq!(group.lowest_path_idx, Some(0));
    }

    #[test]
    fn cw_polygon_is_reversed() {
        let cw: Vec<Point64> = ccw_square().into_iter().rev().collect();
        let group = Group::new(&vec![cw], JoinType::Miter, EndType::Polygon);
        assert!(group.paths_reversed);
    }

    #[test]
    fn lowest_path_decides_for_the_whole_group() {
        // A CW ring higher up must not override the CCW ring holding the
        // lowest vertex.
        let low_ccw = ccw_square();
        let high_cw: Vec<Point64> = vec![p(0, 20), p(10, 20), p(10, 30), p(0, 30)]
            .into_iter()
            .rev()
            .collect();
        let group = Group::new(
            &vec![high_cw, low_ccw],
            JoinType::Miter,
            EndType::Polygon,
        );
        assert_eq!(group.lowest_path_idx, Some(1));
        assert!(!group.paths_reversed);
    }

    #[test]
    fn zero_area_path_never_establishes_orientation() {
        // The degenerate path holds the lowest vertex but has no area, so
        // the CW square above decides the flag.
        let flat = vec![p(0, -5), p(10, -5), p(0, -5), p(10, -5)];
        let cw: Vec<Point64> = ccw_square().into_iter().rev().collect();
        let group = Group::new(&vec![flat, cw], JoinType::Miter, EndType::Polygon);
        assert_eq!(group.lowest_path_idx, Some(1));
        assert!(group.paths_reversed);
    }

    #[test]
    fn open_end_types_skip_the_search() {
        let cw: Vec<Point64> = ccw_square().into_iter().rev().collect();
        let group = Group::new(&vec![cw], JoinType::Round, EndType::Round);
        assert!(!group.paths_reversed);
        assert_eq!(group.lowest_path_idx, None);
    }

    #[test]
    fn duplicate_stripping_respects_end_type() {
        let path = vec![p(0, 0), p(0, 0), p(10, 0), p(10, 10), p(0, 0)];
        let polygon = Group::new(&vec![path.clone()], JoinType::Miter, EndType::Polygon);
        assert_eq!(polygon.in_paths[0].len(), 3);
        let open = Group::new(&vec![path], JoinType::Miter, EndType::Butt);
        assert_eq!(open.in_paths[0].len(), 4);
    }
}
