use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use distance::{DistanceError, DistanceMetric, MissingValueOptions};
use serde::{Deserialize, Serialize};
use space::SpaceError;
use thiserror::Error;
use vaa_core::{NormalizedDistance, QuestionError, COORDINATE};

/// Configuration for a [`MatchingAlgorithm`](crate::MatchingAlgorithm).
///
/// `MatchingConfig` is cheap to clone and serde-friendly so it can be
/// embedded in higher-level configs (see the root crate's YAML loader).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchingConfig {
    /// Configuration schema version.
    #[serde(default = "MatchingConfig::default_version")]
    pub version: String,
    #[serde(default)]
    pub distance_metric: DistanceMetric,
    /// How to impute answers missing from targets.
    #[serde(default)]
    pub missing_value: MissingValueOptions,
    /// Skip dimensions the reference has not answered instead of failing
    /// the whole run.
    #[serde(default)]
    pub allow_missing_reference: bool,
    /// Project and measure targets on the rayon thread pool.
    #[serde(default)]
    pub use_parallel: bool,
}

impl MatchingConfig {
    pub(crate) fn default_version() -> String {
        "1.0".to_string()
    }

    pub fn new(distance_metric: DistanceMetric, missing_value: MissingValueOptions) -> Self {
        Self {
            version: Self::default_version(),
            distance_metric,
            missing_value,
            allow_missing_reference: false,
            use_parallel: false,
        }
    }

    pub fn with_allow_missing_reference(mut self, allow: bool) -> Self {
        self.allow_missing_reference = allow;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    pub fn validate(&self) -> Result<(), MatchError> {
        if !matches!(self.version.as_str(), "1" | "1.0") {
            return Err(MatchError::InvalidConfig(format!(
                "unsupported config.version {:?}",
                self.version
            )));
        }
        if let DistanceMetric::Custom(components) = self.distance_metric {
            if !(components.subdim_weight)(1).is_finite() {
                return Err(MatchError::InvalidConfig(
                    "custom metric must give a finite weight to scalar dimensions".into(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self::new(DistanceMetric::default(), MissingValueOptions::default())
    }
}

/// Errors surfaced by a matching run. Every variant aborts the whole run.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("duplicate question id: {0}")]
    DuplicateQuestion(String),
    #[error("questions must not be empty")]
    NoQuestions,
    #[error("targets must not be empty")]
    NoTargets,
    #[error("reference has no answers to the questions")]
    NoReferenceAnswers,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("question error: {0}")]
    Question(#[from] QuestionError),
    #[error("space error: {0}")]
    Space(#[from] SpaceError),
    #[error("distance error: {0}")]
    Distance(#[from] DistanceError),
    #[error("projection failed: {0}")]
    Projection(String),
}

/// A set of questions to compute a separate sub-distance for, e.g. a
/// category of questions.
pub trait MatchableQuestionGroup {
    fn question_ids(&self) -> Vec<&str>;

    /// Optional human-readable name, carried into [`MatchSummary`].
    fn label(&self) -> Option<&str> {
        None
    }
}

impl<G: MatchableQuestionGroup + ?Sized> MatchableQuestionGroup for &G {
    fn question_ids(&self) -> Vec<&str> {
        (**self).question_ids()
    }

    fn label(&self) -> Option<&str> {
        (**self).label()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuestionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub question_ids: Vec<String>,
}

impl QuestionGroup {
    pub fn new<I, S>(question_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: None,
            label: None,
            question_ids: question_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl MatchableQuestionGroup for QuestionGroup {
    fn question_ids(&self) -> Vec<&str> {
        self.question_ids.iter().map(String::as_str).collect()
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref().or(self.id.as_deref())
    }
}

/// Per-run options.
///
/// `question_groups: None` yields matches without sub-matches; `Some` yields
/// one sub-match per group, even when the list is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingOptions<G = QuestionGroup> {
    /// Weight per question id; questions not listed weigh `1`.
    #[serde(default)]
    pub question_weights: HashMap<String, f64>,
    #[serde(default)]
    pub question_groups: Option<Vec<G>>,
}

impl<G> Default for MatchingOptions<G> {
    fn default() -> Self {
        Self {
            question_weights: HashMap::new(),
            question_groups: None,
        }
    }
}

impl<G> MatchingOptions<G> {
    pub fn with_weights(mut self, question_weights: HashMap<String, f64>) -> Self {
        self.question_weights = question_weights;
        self
    }

    pub fn with_groups(mut self, question_groups: Vec<G>) -> Self {
        self.question_groups = Some(question_groups);
        self
    }
}

fn score_of(distance: NormalizedDistance) -> f64 {
    (1.0 - distance / COORDINATE.extent).clamp(0.0, 1.0)
}

/// The result of matching the reference against one target.
///
/// Holds the caller's own target and group objects by reference.
#[derive(Debug)]
pub struct Match<'a, T, G = QuestionGroup> {
    pub target: &'a T,
    pub distance: NormalizedDistance,
    pub sub_matches: Option<Vec<SubMatch<'a, G>>>,
}

impl<'a, T, G> Match<'a, T, G> {
    /// Agreement in `[0, 1]`, i.e. `1 - distance / extent`.
    pub fn score(&self) -> f64 {
        score_of(self.distance)
    }

    /// Owned, serializable form of this match.
    pub fn summary(&self, target_index: usize) -> MatchSummary
    where
        G: MatchableQuestionGroup,
    {
        MatchSummary {
            target_index,
            distance: self.distance,
            score: self.score(),
            sub_matches: self.sub_matches.as_ref().map(|subs| {
                subs.iter()
                    .enumerate()
                    .map(|(group_index, s)| SubMatchSummary {
                        group_index,
                        label: s.question_group.label().map(str::to_string),
                        distance: s.distance,
                        score: s.score(),
                    })
                    .collect()
            }),
        }
    }
}

impl<T, G> Clone for Match<'_, T, G> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            distance: self.distance,
            sub_matches: self.sub_matches.clone(),
        }
    }
}

impl<T, G> fmt::Display for Match<'_, T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.score() * 100.0)
    }
}

/// Distance within a single question group.
#[derive(Debug)]
pub struct SubMatch<'a, G> {
    pub question_group: &'a G,
    pub distance: NormalizedDistance,
}

impl<G> SubMatch<'_, G> {
    pub fn score(&self) -> f64 {
        score_of(self.distance)
    }
}

impl<G> Clone for SubMatch<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for SubMatch<'_, G> {}

impl<G> fmt::Display for SubMatch<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.score() * 100.0)
    }
}

/// Sort matches by ascending distance. Ties keep their input order.
pub fn sort_matches<T, G>(matches: &mut [Match<'_, T, G>]) {
    matches.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub target_index: usize,
    pub distance: NormalizedDistance,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_matches: Option<Vec<SubMatchSummary>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubMatchSummary {
    pub group_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub distance: NormalizedDistance,
    pub score: f64,
}
