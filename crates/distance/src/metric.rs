use std::fmt;

use serde::{Deserialize, Serialize};
use space::{MatchingSpace, Position};
use vaa_core::{Coordinate, NormalizedDistance, COORDINATE};

use crate::error::DistanceError;
use crate::kernel::{
    absolute_kernel, basic_division, basic_sum, directional_kernel, euclidean_subdim_weight,
    euclidean_sum,
};

/// Per-coordinate distance contribution.
pub type Kernel = fn(Coordinate, Coordinate) -> f64;
/// Aggregation of weighted contributions.
pub type Sum = fn(&[f64]) -> f64;
/// Weight of one subdimension given the number of subdimensions.
pub type SubdimWeight = fn(usize) -> f64;

/// The three pieces a metric is composed of. See [`distance`].
///
/// A `kernel` should stay within `[0, extent]` and a `sum` should scale
/// linearly with its inputs. Results outside `[0, extent]` are clamped.
#[derive(Debug, Clone, Copy)]
pub struct MetricComponents {
    pub kernel: Kernel,
    pub sum: Sum,
    pub subdim_weight: SubdimWeight,
}

impl PartialEq for MetricComponents {
    fn eq(&self, other: &Self) -> bool {
        self.kernel as usize == other.kernel as usize
            && self.sum as usize == other.sum as usize
            && self.subdim_weight as usize == other.subdim_weight as usize
    }
}

/// Optional parameters shared by all metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricParams<'a> {
    /// Space to measure in; defaults to the space of the first position.
    pub space: Option<&'a MatchingSpace>,
    /// Skip dimensions with a missing coordinate on either side instead of
    /// failing.
    pub allow_missing: bool,
}

impl<'a> MetricParams<'a> {
    pub fn in_space(mut self, space: &'a MatchingSpace) -> Self {
        self.space = Some(space);
        self
    }

    pub fn allow_missing(mut self, allow: bool) -> Self {
        self.allow_missing = allow;
        self
    }
}

/// Available distance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Sum of the distances in each dimension. The most common metric in VAAs.
    #[default]
    Manhattan,
    /// Sum of products of signed deviations from neutral. Treats a neutral
    /// answer as uncertainty; see [`directional_kernel`](crate::directional_kernel).
    Directional,
    /// Square root of the sum of squared distances.
    Euclidean,
    /// A caller-supplied composition. Not serializable.
    #[serde(skip)]
    Custom(MetricComponents),
}

impl DistanceMetric {
    /// The built-in metrics.
    pub const BUILTIN: [DistanceMetric; 3] = [
        DistanceMetric::Manhattan,
        DistanceMetric::Directional,
        DistanceMetric::Euclidean,
    ];

    pub fn components(&self) -> MetricComponents {
        match self {
            DistanceMetric::Manhattan => MetricComponents {
                kernel: absolute_kernel,
                sum: basic_sum,
                subdim_weight: basic_division,
            },
            DistanceMetric::Directional => MetricComponents {
                kernel: directional_kernel,
                sum: basic_sum,
                subdim_weight: basic_division,
            },
            DistanceMetric::Euclidean => MetricComponents {
                kernel: absolute_kernel,
                sum: euclidean_sum,
                subdim_weight: euclidean_subdim_weight,
            },
            DistanceMetric::Custom(components) => *components,
        }
    }

    /// Measure the distance between `a` and `b` with this metric.
    pub fn measure(
        &self,
        a: &Position,
        b: &Position,
        params: MetricParams<'_>,
    ) -> Result<NormalizedDistance, DistanceError> {
        distance(a, b, &self.components(), params)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Directional => "directional",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn manhattan_distance(
    a: &Position,
    b: &Position,
    params: MetricParams<'_>,
) -> Result<NormalizedDistance, DistanceError> {
    DistanceMetric::Manhattan.measure(a, b, params)
}

pub fn directional_distance(
    a: &Position,
    b: &Position,
    params: MetricParams<'_>,
) -> Result<NormalizedDistance, DistanceError> {
    DistanceMetric::Directional.measure(a, b, params)
}

pub fn euclidean_distance(
    a: &Position,
    b: &Position,
    params: MetricParams<'_>,
) -> Result<NormalizedDistance, DistanceError> {
    DistanceMetric::Euclidean.measure(a, b, params)
}

/// Compose a metric from `components` and measure the distance between `a`
/// and `b`.
///
/// Steps:
/// 1. Resolve the space (`params.space` or `a`'s space); both positions must
///    be shape-compatible with it.
/// 2. Expand the top-level weights to one weight per flattened coordinate,
///    multiplying by `subdim_weight(n)` for dimensions with `n > 1`
///    subdimensions. Weights are first divided by the largest weight so
///    the sums cannot overflow.
/// 3. For every coordinate pair, accumulate `weight * kernel(a, b)` and
///    `weight * extent` as the maximum possible contribution. Pairs with a
///    missing side are skipped when `params.allow_missing` is set and
///    rejected otherwise.
/// 4. Return `extent * sum(distances) / sum(maxima)`.
///
/// When the included maxima sum to zero (everything missing or zero-weighted)
/// the result is exactly `extent / 2`. A non-finite ratio, only possible
/// with a custom kernel or sum, is reported as `extent`.
pub fn distance(
    a: &Position,
    b: &Position,
    components: &MetricComponents,
    params: MetricParams<'_>,
) -> Result<NormalizedDistance, DistanceError> {
    let space: &MatchingSpace = match params.space {
        Some(space) => space,
        None => a.space().as_ref(),
    };
    if !space.is_compatible(a) || !space.is_compatible(b) {
        return Err(DistanceError::ShapeMismatch(format!(
            "space {} vs positions {} and {}",
            space.shape(),
            a.shape(),
            b.shape()
        )));
    }

    let weights = effective_weights(space, components.subdim_weight);
    let (a_flat, b_flat) = (a.flat(), b.flat());

    let mut distances = Vec::with_capacity(weights.len());
    let mut maxima = Vec::with_capacity(weights.len());
    for (index, &weight) in weights.iter().enumerate() {
        match (a_flat[index], b_flat[index]) {
            (Some(x), Some(y)) => {
                distances.push(weight * (components.kernel)(x, y));
                maxima.push(weight * COORDINATE.extent);
            }
            _ if params.allow_missing => continue,
            _ => return Err(DistanceError::DisallowedMissingValue { index }),
        }
    }

    let total = (components.sum)(&distances);
    let maximum = (components.sum)(&maxima);
    if maximum == 0.0 {
        return Ok(COORDINATE.extent / 2.0);
    }
    let ratio = COORDINATE.extent * total / maximum;
    if !ratio.is_finite() {
        return Ok(COORDINATE.extent);
    }
    Ok(ratio.clamp(0.0, COORDINATE.extent))
}

fn effective_weights(space: &MatchingSpace, subdim_weight: SubdimWeight) -> Vec<f64> {
    let largest = space.weights().iter().copied().fold(0.0_f64, f64::max);
    let scale = if largest > 0.0 { largest } else { 1.0 };
    let mut weights = Vec::with_capacity(space.shape().total());
    for (&d, &w) in space.shape().iter().zip(space.weights()) {
        let w = w / scale;
        if d == 1 {
            weights.push(w);
        } else {
            weights.extend(std::iter::repeat(w * subdim_weight(d)).take(d));
        }
    }
    weights
}
