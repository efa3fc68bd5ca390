pub mod intersect_2d;
pub mod polygon_2d;
pub mod predicates;

/// 2D point type for floating intermediate geometry.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type for unit normals and offset vectors.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
