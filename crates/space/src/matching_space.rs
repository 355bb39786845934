use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use vaa_core::MatchableQuestion;

use crate::error::SpaceError;
use crate::shape::{Shape, Shaped};

/// A space wherein matching distances are measured.
///
/// Each top-level dimension usually corresponds to one question and may
/// expand into several subdimensions (see [`Shape`]). Weights apply to
/// top-level dimensions only; subdimension weighting is left to the metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingSpace {
    shape: Shape,
    weights: Vec<f64>,
}

impl MatchingSpace {
    /// A space with uniform weights of `1`.
    ///
    /// `shape` may be a full [`Shape`] or a plain `usize` for that many
    /// scalar dimensions.
    pub fn new(shape: impl Into<Shape>) -> Result<Self, SpaceError> {
        let shape = shape.into();
        let weights = vec![1.0; shape.len()];
        Self::with_weights(shape, weights)
    }

    /// A space with explicit per-dimension weights.
    pub fn with_weights(shape: impl Into<Shape>, weights: Vec<f64>) -> Result<Self, SpaceError> {
        let shape = shape.into();
        if let Some(index) = shape.iter().position(|&d| d == 0) {
            return Err(SpaceError::InvalidShape(format!(
                "dimension {index} has no subdimensions"
            )));
        }
        if shape.len() != weights.len() {
            return Err(SpaceError::IncompatibleWeights {
                shape: shape.len(),
                weights: weights.len(),
            });
        }
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(SpaceError::InvalidWeight { index, weight });
        }
        Ok(Self { shape, weights })
    }

    /// Build a space with one dimension per question, in order.
    ///
    /// Questions absent from `question_weights` (or all of them, when it is
    /// `None`) get a weight of `1`. Subdimension weights cannot be given.
    pub fn from_questions<Q: MatchableQuestion>(
        questions: &[Q],
        question_weights: Option<&HashMap<String, f64>>,
    ) -> Result<Self, SpaceError> {
        let shape: Vec<usize> = questions.iter().map(|q| q.normalized_dimensions()).collect();
        let weights = questions
            .iter()
            .map(|q| {
                question_weights
                    .and_then(|w| w.get(q.id()).copied())
                    .unwrap_or(1.0)
            })
            .collect();
        Self::with_weights(shape, weights)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of top-level dimensions.
    pub fn len(&self) -> usize {
        self.shape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    /// Whether `other` has the same shape; weights may differ.
    pub fn is_compatible<S: Shaped + ?Sized>(&self, other: &S) -> bool {
        *other.shape() == self.shape
    }

    /// Derive a subspace with the same shape, keeping the weights of the
    /// dimensions for which `keep` returns `true` and zeroing the rest.
    pub fn subspace_where(&self, mut keep: impl FnMut(usize) -> bool) -> MatchingSpace {
        let weights = self
            .weights
            .iter()
            .enumerate()
            .map(|(i, &w)| if keep(i) { w } else { 0.0 })
            .collect();
        MatchingSpace {
            shape: self.shape.clone(),
            weights,
        }
    }

    /// Derive a subspace covering only the questions whose ids are in `subset`.
    ///
    /// `questions` must be the list this space was built from. Ids in
    /// `subset` that match no question are ignored.
    pub fn subspace<Q: MatchableQuestion>(
        &self,
        questions: &[Q],
        subset: &[&str],
    ) -> Result<MatchingSpace, SpaceError> {
        let found: Shape = questions.iter().map(|q| q.normalized_dimensions()).collect::<Vec<_>>().into();
        if found != self.shape {
            return Err(SpaceError::ShapeMismatch {
                expected: self.shape.clone(),
                found,
            });
        }
        let ids: HashSet<&str> = subset.iter().copied().collect();
        Ok(self.subspace_where(|i| ids.contains(questions[i].id())))
    }
}

impl Shaped for MatchingSpace {
    fn shape(&self) -> Cow<'_, Shape> {
        Cow::Borrowed(&self.shape)
    }
}

/// Build an unweighted space from `questions` and zero the weights of every
/// question not in `subset`.
pub fn create_subspace<Q: MatchableQuestion>(
    questions: &[Q],
    subset: &[&str],
) -> Result<MatchingSpace, SpaceError> {
    MatchingSpace::from_questions(questions, None)?.subspace(questions, subset)
}
