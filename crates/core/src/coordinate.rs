//! The coordinate scale shared by all positions and distances.

use serde::{Deserialize, Serialize};

/// A single value along one flattened dimension of a matching space.
pub type Coordinate = f64;

/// A coordinate or the explicit missing marker ([`MISSING_VALUE`]).
pub type CoordinateOrMissing = Option<Coordinate>;

/// A distance in `[0, COORDINATE.extent]`.
pub type NormalizedDistance = f64;

/// Marker for an unanswered dimension.
pub const MISSING_VALUE: CoordinateOrMissing = None;

/// Bounds of the coordinate scale.
///
/// The scale is fixed at compile time through [`COORDINATE`] so that every
/// distance computation is a pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateScale {
    pub min: Coordinate,
    pub max: Coordinate,
    pub neutral: Coordinate,
    pub extent: Coordinate,
}

impl CoordinateScale {
    const fn new(min: Coordinate, max: Coordinate) -> Self {
        Self {
            min,
            max,
            neutral: (min + max) / 2.0,
            extent: max - min,
        }
    }
}

/// The global coordinate scale: `[-0.5, 0.5]` with neutral `0` and extent `1`.
pub const COORDINATE: CoordinateScale = CoordinateScale::new(-0.5, 0.5);

/// Whether `value` is a finite coordinate within `[COORDINATE.min, COORDINATE.max]`.
pub fn is_valid_coordinate(value: Coordinate) -> bool {
    value.is_finite() && value >= COORDINATE.min && value <= COORDINATE.max
}

pub fn is_missing(value: CoordinateOrMissing) -> bool {
    value.is_none()
}

/// Normalized answer to one question.
///
/// Questions that fit on a single axis produce a `Scalar`; questions that
/// need several axes (e.g. categorical questions with more than two choices)
/// produce `Subdimensions`, one coordinate per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Scalar(CoordinateOrMissing),
    Subdimensions(Vec<CoordinateOrMissing>),
}

impl NormalizedValue {
    /// Number of flattened coordinates this value expands to.
    pub fn dimensions(&self) -> usize {
        match self {
            NormalizedValue::Scalar(_) => 1,
            NormalizedValue::Subdimensions(values) => values.len(),
        }
    }

    /// A missing value of the given dimensionality.
    pub fn missing(dimensions: usize) -> Self {
        if dimensions == 1 {
            NormalizedValue::Scalar(MISSING_VALUE)
        } else {
            NormalizedValue::Subdimensions(vec![MISSING_VALUE; dimensions])
        }
    }
}

impl From<Coordinate> for NormalizedValue {
    fn from(value: Coordinate) -> Self {
        NormalizedValue::Scalar(Some(value))
    }
}

impl From<CoordinateOrMissing> for NormalizedValue {
    fn from(value: CoordinateOrMissing) -> Self {
        NormalizedValue::Scalar(value)
    }
}

impl From<Vec<CoordinateOrMissing>> for NormalizedValue {
    fn from(values: Vec<CoordinateOrMissing>) -> Self {
        NormalizedValue::Subdimensions(values)
    }
}

impl From<Vec<Coordinate>> for NormalizedValue {
    fn from(values: Vec<Coordinate>) -> Self {
        NormalizedValue::Subdimensions(values.into_iter().map(Some).collect())
    }
}
