//! Building blocks for distance metrics.
//!
//! Reference for the directional kernel: Fernando Mendez (2017), "Modeling
//! proximity and directional decisional logic: What can we learn from
//! applying statistical learning techniques to VAA-generated data?",
//! Journal of Elections, Public Opinion and Parties 27:1, 31-55,
//! doi:10.1080/17457289.2016.1269113.

use vaa_core::{Coordinate, COORDINATE};

/// `|a - b|`.
#[inline]
pub fn absolute_kernel(a: Coordinate, b: Coordinate) -> f64 {
    (a - b).abs()
}

/// Directional kernel, adapted from Mendez (2017, p. 51).
///
/// The neutral point is read as "unsure": if either side is exactly neutral
/// the contribution is half the extent regardless of the other side.
/// Agreement is total only when both sides sit at the same extreme, so two
/// identical non-extreme answers do **not** yield zero. For example, two
/// "somewhat agree" answers on a 5-point scale contribute `0.375` of the
/// extent. This is intended behavior of the metric.
#[inline]
pub fn directional_kernel(a: Coordinate, b: Coordinate) -> f64 {
    0.5 * COORDINATE.extent
        - (2.0 * (a - COORDINATE.neutral) * (b - COORDINATE.neutral)) / COORDINATE.extent
}

/// Arithmetic sum.
pub fn basic_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// `sqrt(sum(v^2))`.
pub fn euclidean_sum(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// `1 / n`, so that `n` subdimensions sum to one scalar dimension.
pub fn basic_division(num_dimensions: usize) -> f64 {
    1.0 / num_dimensions as f64
}

/// `1 / sqrt(n)`, so that the Euclidean sum of `n` subdimensions matches one
/// scalar dimension. With this, spaces shaped `[1, 1]` and `[1, 3]` have the
/// same maximum distance.
pub fn euclidean_subdim_weight(num_dimensions: usize) -> f64 {
    1.0 / (num_dimensions as f64).sqrt()
}
