use thiserror::Error;

use crate::shape::Shape;

/// Errors raised while building spaces and positions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpaceError {
    #[error("shape has {shape} dimensions but {weights} weights were given")]
    IncompatibleWeights { shape: usize, weights: usize },
    #[error("weight {weight} for dimension {index} must be finite and non-negative")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("invalid shape: {0}")]
    InvalidShape(String),
    #[error("incompatible shapes: expected {expected}, found {found}")]
    ShapeMismatch { expected: Shape, found: Shape },
    #[error("malformed position: {0}")]
    MalformedPosition(String),
    #[error("coordinate {value} at flat index {index} is outside the coordinate scale")]
    InvalidCoordinate { index: usize, value: f64 },
}
