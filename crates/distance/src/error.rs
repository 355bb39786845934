use space::SpaceError;
use thiserror::Error;

/// Errors raised while measuring distances.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DistanceError {
    #[error(transparent)]
    Space(#[from] SpaceError),
    #[error("incompatible shapes: {0}")]
    ShapeMismatch(String),
    #[error("missing coordinate at flat index {index} is not allowed")]
    DisallowedMissingValue { index: usize },
    #[error("the matching space has no dimensions")]
    EmptySpace,
    #[error("reference and target positions belong to different matching spaces")]
    DifferentSpaces,
}
