use serde::{Deserialize, Serialize};
use space::{MatchingSpace, Position};
use vaa_core::NormalizedDistance;

use crate::error::DistanceError;
use crate::metric::{DistanceMetric, MetricParams};
use crate::missing::{impute_missing_position, MissingValueOptions};

/// Options for [`measure_distance`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistanceMeasurementOptions {
    pub metric: DistanceMetric,
    pub missing_value_options: MissingValueOptions,
    /// Skip dimensions where the reference itself is missing instead of
    /// failing.
    pub allow_missing_reference: bool,
}

/// Distances in the global space and in each requested subspace, in the
/// order the subspaces were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAndSubspaceDistances {
    pub global: NormalizedDistance,
    pub subspaces: Vec<NormalizedDistance>,
}

/// Measure the distance from `reference` to `target`.
///
/// The target's missing coordinates are imputed first; the reference is
/// never imputed, so swapping the two arguments generally changes the
/// result.
pub fn measure_distance(
    reference: &Position,
    target: &Position,
    options: &DistanceMeasurementOptions,
) -> Result<NormalizedDistance, DistanceError> {
    check_spaces(reference, target, &[])?;
    let imputed = impute_missing_position(reference, target, &options.missing_value_options)?;
    options.metric.measure(
        reference,
        &imputed,
        MetricParams::default().allow_missing(options.allow_missing_reference),
    )
}

/// Like [`measure_distance`], additionally measuring in every subspace with
/// the same imputed target.
///
/// Subspaces are typically derived by zeroing the weights of questions
/// outside a category, so the category-level distances come without a second
/// imputation pass.
pub fn measure_distance_in_subspaces(
    reference: &Position,
    target: &Position,
    options: &DistanceMeasurementOptions,
    subspaces: &[MatchingSpace],
) -> Result<GlobalAndSubspaceDistances, DistanceError> {
    check_spaces(reference, target, subspaces)?;
    let imputed = impute_missing_position(reference, target, &options.missing_value_options)?;
    let params = MetricParams::default().allow_missing(options.allow_missing_reference);
    let global = options.metric.measure(reference, &imputed, params)?;
    let subspaces = subspaces
        .iter()
        .map(|s| options.metric.measure(reference, &imputed, params.in_space(s)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GlobalAndSubspaceDistances { global, subspaces })
}

fn check_spaces(
    reference: &Position,
    target: &Position,
    subspaces: &[MatchingSpace],
) -> Result<(), DistanceError> {
    let space = reference.space();
    if space.is_empty() {
        return Err(DistanceError::EmptySpace);
    }
    if space != target.space() {
        return Err(DistanceError::DifferentSpaces);
    }
    if let Some(s) = subspaces.iter().find(|s| !space.is_compatible(*s)) {
        return Err(DistanceError::ShapeMismatch(format!(
            "space {} vs subspace {}",
            space.shape(),
            s.shape()
        )));
    }
    Ok(())
}
