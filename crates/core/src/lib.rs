//! Shared contracts for VAA matching.
//!
//! Every other crate in the workspace speaks in terms of the types defined
//! here:
//!
//! - [`COORDINATE`]: the fixed scale every normalized answer lives on.
//! - [`CoordinateOrMissing`] / [`NormalizedValue`]: a single coordinate (or
//!   the missing marker) and the nested per-question form produced by
//!   question normalization.
//! - [`AnswerValue`] / [`HasAnswers`]: raw answers as handed in by callers.
//! - [`MatchableQuestion`]: the capability a question must expose to be
//!   projected into a matching space.
//!
//! Nothing in this crate performs I/O or holds mutable state.

mod answer;
mod coordinate;
mod error;
mod question;

pub use crate::answer::{AnswerDict, AnswerValue, Entity, HasAnswers};
pub use crate::coordinate::{
    is_missing, is_valid_coordinate, Coordinate, CoordinateOrMissing, CoordinateScale,
    NormalizedDistance, NormalizedValue, COORDINATE, MISSING_VALUE,
};
pub use crate::error::QuestionError;
pub use crate::question::MatchableQuestion;
