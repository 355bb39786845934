//! Workspace umbrella crate for VAA matching.
//!
//! Re-exports the pieces most callers need from the `vaa_core`, `space`,
//! `distance` and `matcher` crates, and adds YAML configuration loading and
//! the JSON dataset format used by the `vaa-match` binary.

pub mod config;
pub mod dataset;

pub use vaa_core::{
    AnswerDict, AnswerValue, COORDINATE, Coordinate, CoordinateOrMissing, Entity, HasAnswers,
    MISSING_VALUE, MatchableQuestion, NormalizedDistance, NormalizedValue, QuestionError,
};
pub use space::{MatchingSpace, Position, Shape, SpaceError, create_subspace, flatten, reshape};
pub use distance::{
    DistanceError, DistanceMeasurementOptions, DistanceMetric, GlobalAndSubspaceDistances,
    MetricComponents, MetricParams, MissingValueBias, MissingValueMethod, MissingValueOptions,
    directional_distance, euclidean_distance, impute_missing_position, manhattan_distance,
    measure_distance, measure_distance_in_subspaces,
};
pub use matcher::{
    BooleanQuestion, CategoricalQuestion, Match, MatchError, MatchMetrics, MatchSummary,
    MatchableQuestionGroup, MatchingAlgorithm, MatchingConfig, MatchingOptions,
    MatchingSpaceProjector, OrdinalChoice, OrdinalQuestion, Question, QuestionGroup, SubMatch,
    set_match_metrics, sort_matches,
};

pub use crate::config::{ConfigLoadError, VaaConfig};
pub use crate::dataset::{Dataset, TargetMatch};
