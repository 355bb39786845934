//! JSON datasets for the `vaa-match` binary.
//!
//! ```json
//! {
//!   "questions": [{"type": "ordinal", "id": "q1", "choices": [...]}],
//!   "question_weights": {"q1": 2.0},
//!   "question_groups": [{"label": "economy", "question_ids": ["q1"]}],
//!   "reference": {"id": "voter", "answers": {"q1": "choice_2"}},
//!   "targets": [{"id": "alice", "answers": {"q1": "choice_5"}}]
//! }
//! ```

use std::cmp::Ordering;

use matcher::{MatchError, MatchSummary, MatchingAlgorithm, MatchingOptions, Question};
use serde::{Deserialize, Serialize};
use tracing::debug;
use vaa_core::Entity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub questions: Vec<Question>,
    #[serde(flatten)]
    pub options: MatchingOptions,
    pub reference: Entity,
    pub targets: Vec<Entity>,
}

/// A match summary labelled with the target's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMatch {
    pub target_id: String,
    #[serde(flatten)]
    pub summary: MatchSummary,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Match the reference against every target.
    ///
    /// Results are in target order unless `sorted` is set, in which case they
    /// are ordered by ascending distance.
    pub fn run(
        &self,
        algorithm: &MatchingAlgorithm,
        sorted: bool,
    ) -> Result<Vec<TargetMatch>, MatchError> {
        let matches = algorithm.match_targets_with_options(
            &self.questions,
            &self.reference,
            &self.targets,
            &self.options,
        )?;
        let mut results: Vec<TargetMatch> = matches
            .iter()
            .enumerate()
            .map(|(i, m)| TargetMatch {
                target_id: m.target.id.clone(),
                summary: m.summary(i),
            })
            .collect();
        debug!(
            reference = %self.reference.id,
            results = results.len(),
            "dataset_run"
        );
        if sorted {
            results.sort_by(|a, b| {
                a.summary
                    .distance
                    .partial_cmp(&b.summary.distance)
                    .unwrap_or(Ordering::Equal)
            });
        }
        Ok(results)
    }
}
