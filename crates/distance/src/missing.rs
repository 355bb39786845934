//! Missing-value imputation.
//!
//! Imputation replaces the target's missing coordinates with concrete values
//! chosen relative to the reference. It never mutates its inputs and never
//! touches space metadata.

use serde::{Deserialize, Serialize};
use space::Position;
use vaa_core::{Coordinate, COORDINATE};

use crate::error::DistanceError;

/// How to impute a coordinate missing from the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueMethod {
    /// Impute the neutral coordinate.
    #[default]
    Neutral,
    /// Impute the extreme farthest from the reference coordinate, i.e. the
    /// worst case for that pairing.
    RelativeMaximum,
}

/// Which extreme [`MissingValueMethod::RelativeMaximum`] picks when the
/// reference coordinate is exactly neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueBias {
    /// Toward the maximum.
    #[default]
    Positive,
    /// Toward the minimum.
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MissingValueOptions {
    #[serde(default)]
    pub method: MissingValueMethod,
    #[serde(default)]
    pub bias: MissingValueBias,
}

impl MissingValueOptions {
    pub fn new(method: MissingValueMethod) -> Self {
        Self {
            method,
            bias: MissingValueBias::default(),
        }
    }

    pub fn with_bias(mut self, bias: MissingValueBias) -> Self {
        self.bias = bias;
        self
    }
}

/// Impute a value for a coordinate missing from the target, given the
/// reference coordinate in the same dimension.
pub fn impute_missing_value(reference: Coordinate, options: &MissingValueOptions) -> Coordinate {
    match options.method {
        MissingValueMethod::Neutral => COORDINATE.neutral,
        MissingValueMethod::RelativeMaximum => {
            if reference == COORDINATE.neutral {
                match options.bias {
                    MissingValueBias::Positive => COORDINATE.max,
                    MissingValueBias::Negative => COORDINATE.min,
                }
            } else if reference < COORDINATE.neutral {
                COORDINATE.max
            } else {
                COORDINATE.min
            }
        }
    }
}

/// A copy of `target` whose missing coordinates are imputed against
/// `reference`.
///
/// Where the reference coordinate is missing as well, the neutral coordinate
/// is imputed; whether that dimension then counts is up to the caller's
/// missing-reference policy.
pub fn impute_missing_position(
    reference: &Position,
    target: &Position,
    options: &MissingValueOptions,
) -> Result<Position, DistanceError> {
    if reference.shape() != target.shape() {
        return Err(DistanceError::ShapeMismatch(format!(
            "reference {} vs target {}",
            reference.shape(),
            target.shape()
        )));
    }
    let flat = target
        .flat()
        .iter()
        .zip(reference.flat())
        .map(|(&t, &r)| match (t, r) {
            (Some(t), _) => Some(t),
            (None, None) => Some(COORDINATE.neutral),
            (None, Some(r)) => Some(impute_missing_value(r, options)),
        })
        .collect();
    Ok(Position::from_flat(flat, target.space().clone())?)
}
