//! # VAA Matcher (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` sits on top of the space (`space`) and distance (`distance`)
//! layers. It turns raw answers to a list of questions into positions in a
//! normalized matching space and measures how far each target (e.g. a
//! candidate) is from a reference (e.g. a voter), overall and per question
//! group.
//!
//! ## Core Types
//!
//! - [`Question`]: closed set of built-in question types:
//!   - [`OrdinalQuestion`]: ordered choices, e.g. Likert scales.
//!   - [`CategoricalQuestion`]: unordered choices, one-hot encoded.
//!   - [`BooleanQuestion`]: yes/no.
//! - [`MatchingConfig`]: metric, missing-value policy, reference-gap policy
//!   and the parallelism switch.
//! - [`MatchingOptions`]: per-run question weights and question groups.
//! - [`Match`] / [`SubMatch`]: distances borrowing the caller's targets and
//!   groups, with a [`MatchSummary`] owned form for serialization.
//! - [`MatchingAlgorithm`]: runs the projection and measurement.
//!
//! Any type implementing [`vaa_core::MatchableQuestion`] can be matched on;
//! [`Question`] is merely the set this crate ships.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{MatchingAlgorithm, MatchingConfig, OrdinalQuestion};
//! use vaa_core::Entity;
//!
//! let questions = vec![
//!     OrdinalQuestion::from_likert("q1", 5).unwrap(),
//!     OrdinalQuestion::from_likert("q2", 5).unwrap(),
//! ];
//! let voter = Entity::new("voter")
//!     .with_answer("q1", "choice_1")
//!     .with_answer("q2", "choice_5");
//! let candidates = vec![
//!     Entity::new("a").with_answer("q1", "choice_1").with_answer("q2", "choice_4"),
//!     Entity::new("b").with_answer("q1", "choice_5"),
//! ];
//!
//! let algorithm = MatchingAlgorithm::new(MatchingConfig::default()).unwrap();
//! let matches = algorithm.match_targets(&questions, &voter, &candidates).unwrap();
//! assert_eq!(matches.len(), 2);
//! assert!(matches[0].distance < matches[1].distance);
//! ```
//!
//! ## Observability
//!
//! Every run executes inside a `matcher.match` tracing span and reports to
//! the optional global [`MatchMetrics`] recorder installed with
//! [`set_match_metrics`].

mod engine;
mod metrics;
mod projector;
mod question;
mod types;

pub use crate::engine::MatchingAlgorithm;
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::projector::MatchingSpaceProjector;
pub use crate::question::{
    BooleanQuestion, CategoricalQuestion, OrdinalChoice, OrdinalQuestion, Question,
};
pub use crate::types::{
    sort_matches, Match, MatchError, MatchSummary, MatchableQuestionGroup, MatchingConfig,
    MatchingOptions, QuestionGroup, SubMatch, SubMatchSummary,
};
