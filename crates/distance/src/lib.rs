//! Distance measurement between positions in a matching space.
//!
//! ## Metrics
//!
//! A metric is a fixed composition of three pieces (see [`MetricComponents`]):
//!
//! - a **kernel** giving the distance contribution of one coordinate pair,
//! - a **sum** aggregating the weighted contributions,
//! - a **subdimension weight** scaling dimensions that expand into several
//!   coordinates so they stay comparable to scalar ones.
//!
//! [`DistanceMetric`] names the three built-in compositions (Manhattan,
//! Directional, Euclidean) and carries custom ones.
//!
//! ## Missing values
//!
//! [`impute_missing_position`] fills a target's missing coordinates relative
//! to a reference before measurement. Whatever remains missing afterwards is
//! either skipped or rejected depending on the `allow_missing` flag.
//!
//! ## Measurement
//!
//! [`measure_distance`] and [`measure_distance_in_subspaces`] tie imputation
//! and metric evaluation together; the latter reuses one imputation for the
//! global space and any number of subspaces.
//!
//! Every function here is pure: no I/O, no shared state, no panics on bad
//! input.

mod error;
mod kernel;
mod measure;
mod metric;
mod missing;

pub use crate::error::DistanceError;
pub use crate::kernel::{
    absolute_kernel, basic_division, basic_sum, directional_kernel, euclidean_subdim_weight,
    euclidean_sum,
};
pub use crate::measure::{
    measure_distance, measure_distance_in_subspaces, DistanceMeasurementOptions,
    GlobalAndSubspaceDistances,
};
pub use crate::metric::{
    directional_distance, distance, euclidean_distance, manhattan_distance, DistanceMetric,
    MetricComponents, MetricParams,
};
pub use crate::missing::{
    impute_missing_position, impute_missing_value, MissingValueBias, MissingValueMethod,
    MissingValueOptions,
};
