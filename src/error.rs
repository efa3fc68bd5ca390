use thiserror::Error;

/// Top-level error type for the kerf2d offsetting kernel.
#[derive(Debug, Error)]
pub enum KerfError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Errors related to geometric parameters and conversions.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("precision {0} is out of range [-8, 8]")]
    PrecisionOutOfRange(i32),
}

/// Convenience type alias for results using [`KerfError`].
pub type Result<T> = std::result::Result<T, KerfError>;
