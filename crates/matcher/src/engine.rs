use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use distance::{measure_distance, measure_distance_in_subspaces, DistanceMeasurementOptions};
use rayon::prelude::*;
use space::{MatchingSpace, Position};
use tracing::{debug, info, span, warn, Level};
use vaa_core::{HasAnswers, MatchableQuestion};

use crate::metrics::metrics_recorder;
use crate::projector::MatchingSpaceProjector;
use crate::types::{
    Match, MatchError, MatchableQuestionGroup, MatchingConfig, MatchingOptions, QuestionGroup,
    SubMatch,
};

#[cfg(test)]
mod tests;

/// Matches a reference entity (e.g. a voter) against targets (e.g.
/// candidates).
///
/// A run proceeds in three steps:
/// 1. project every entity's answers into a normalized [`MatchingSpace`]
///    built from the questions and their weights,
/// 2. optionally re-project all positions with a [`MatchingSpaceProjector`],
/// 3. measure the distance from the reference to each target, globally and
///    within each question group.
///
/// Results come back in target order; use
/// [`sort_matches`](crate::sort_matches) to rank them.
pub struct MatchingAlgorithm {
    config: MatchingConfig,
    projector: Option<Arc<dyn MatchingSpaceProjector>>,
}

impl MatchingAlgorithm {
    pub fn new(config: MatchingConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            config,
            projector: None,
        })
    }

    pub fn with_projector(mut self, projector: Arc<dyn MatchingSpaceProjector>) -> Self {
        self.projector = Some(projector);
        self
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Match without question weights or groups.
    pub fn match_targets<'a, Q, R, T>(
        &self,
        questions: &[Q],
        reference: &R,
        targets: &'a [T],
    ) -> Result<Vec<Match<'a, T>>, MatchError>
    where
        Q: MatchableQuestion + Sync,
        R: HasAnswers + ?Sized,
        T: HasAnswers + Sync,
    {
        self.run(questions, reference, targets, None, None::<&[QuestionGroup]>)
    }

    /// Match with per-question weights and optional question groups. Each
    /// [`SubMatch`] borrows its group from `options`.
    pub fn match_targets_with_options<'a, Q, R, T, G>(
        &self,
        questions: &[Q],
        reference: &R,
        targets: &'a [T],
        options: &'a MatchingOptions<G>,
    ) -> Result<Vec<Match<'a, T, G>>, MatchError>
    where
        Q: MatchableQuestion + Sync,
        R: HasAnswers + ?Sized,
        T: HasAnswers + Sync,
        G: MatchableQuestionGroup + Sync,
    {
        self.run(
            questions,
            reference,
            targets,
            Some(&options.question_weights),
            options.question_groups.as_deref(),
        )
    }

    /// Project entities into the normalized space defined by `questions`.
    ///
    /// Unanswered questions become missing coordinates.
    pub fn project_to_normalized_space<Q, E>(
        &self,
        questions: &[Q],
        entities: &[E],
        question_weights: Option<&HashMap<String, f64>>,
    ) -> Result<Vec<Position>, MatchError>
    where
        Q: MatchableQuestion + Sync,
        E: HasAnswers + Sync,
    {
        if questions.is_empty() {
            return Err(MatchError::NoQuestions);
        }
        if entities.is_empty() {
            return Err(MatchError::NoTargets);
        }
        let space = Arc::new(MatchingSpace::from_questions(questions, question_weights)?);
        self.project_all(questions, entities, &space)
    }

    fn run<'a, Q, R, T, G>(
        &self,
        questions: &[Q],
        reference: &R,
        targets: &'a [T],
        question_weights: Option<&HashMap<String, f64>>,
        groups: Option<&'a [G]>,
    ) -> Result<Vec<Match<'a, T, G>>, MatchError>
    where
        Q: MatchableQuestion + Sync,
        R: HasAnswers + ?Sized,
        T: HasAnswers + Sync,
        G: MatchableQuestionGroup + Sync,
    {
        let span = span!(
            Level::INFO,
            "matcher.match",
            questions = questions.len(),
            targets = targets.len(),
            groups = groups.map_or(0, <[G]>::len),
            metric = %self.config.distance_metric
        );
        let _guard = span.enter();
        let start = Instant::now();

        let result = self.compute_matches(questions, reference, targets, question_weights, groups);
        let latency = start.elapsed();

        match &result {
            Ok(matches) => info!(
                matches = matches.len(),
                elapsed_micros = latency.as_micros() as u64,
                "match_success"
            ),
            Err(err) => warn!(
                error = %err,
                elapsed_micros = latency.as_micros() as u64,
                "match_failure"
            ),
        }

        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(
                &self.config.distance_metric,
                latency,
                targets.len(),
                result.is_ok(),
            );
        }

        result
    }

    fn compute_matches<'a, Q, R, T, G>(
        &self,
        questions: &[Q],
        reference: &R,
        targets: &'a [T],
        question_weights: Option<&HashMap<String, f64>>,
        groups: Option<&'a [G]>,
    ) -> Result<Vec<Match<'a, T, G>>, MatchError>
    where
        Q: MatchableQuestion + Sync,
        R: HasAnswers + ?Sized,
        T: HasAnswers + Sync,
        G: MatchableQuestionGroup + Sync,
    {
        if questions.is_empty() {
            return Err(MatchError::NoQuestions);
        }
        if targets.is_empty() {
            return Err(MatchError::NoTargets);
        }
        ensure_unique_ids(questions)?;

        let space = Arc::new(MatchingSpace::from_questions(questions, question_weights)?);
        let mut reference_position = project_entity(questions, reference, &space)?;
        if reference_position.flat().iter().all(Option::is_none) {
            return Err(MatchError::NoReferenceAnswers);
        }
        let mut target_positions = self.project_all(questions, targets, &space)?;
        debug!(
            dimensions = space.shape().total(),
            "projected_to_normalized_space"
        );

        if let Some(projector) = &self.projector {
            let (reference_projected, targets_projected) =
                reproject(projector.as_ref(), reference_position, target_positions)?;
            reference_position = reference_projected;
            target_positions = targets_projected;
            debug!(
                dimensions = reference_position.shape().total(),
                "reprojected_positions"
            );
        }

        // Group subspaces derive from the run's weighted space.
        let subspaces = groups
            .map(|groups| {
                groups
                    .iter()
                    .map(|g| space.subspace(questions, &g.question_ids()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;
        if let Some(subspaces) = &subspaces {
            debug!(subspaces = subspaces.len(), "built_group_subspaces");
        }
        let grouped = groups.zip(subspaces.as_deref());

        let options = DistanceMeasurementOptions {
            metric: self.config.distance_metric,
            missing_value_options: self.config.missing_value,
            allow_missing_reference: self.config.allow_missing_reference,
        };

        if self.config.use_parallel {
            targets
                .par_iter()
                .zip(target_positions.par_iter())
                .map(|(target, position)| {
                    measure_target(target, &reference_position, position, &options, grouped)
                })
                .collect()
        } else {
            targets
                .iter()
                .zip(&target_positions)
                .map(|(target, position)| {
                    measure_target(target, &reference_position, position, &options, grouped)
                })
                .collect()
        }
    }

    fn project_all<Q, E>(
        &self,
        questions: &[Q],
        entities: &[E],
        space: &Arc<MatchingSpace>,
    ) -> Result<Vec<Position>, MatchError>
    where
        Q: MatchableQuestion + Sync,
        E: HasAnswers + Sync,
    {
        if self.config.use_parallel {
            entities
                .par_iter()
                .map(|entity| project_entity(questions, entity, space))
                .collect()
        } else {
            entities
                .iter()
                .map(|entity| project_entity(questions, entity, space))
                .collect()
        }
    }
}

fn ensure_unique_ids<Q: MatchableQuestion>(questions: &[Q]) -> Result<(), MatchError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for q in questions {
        if !seen.insert(q.id()) {
            return Err(MatchError::DuplicateQuestion(q.id().to_string()));
        }
    }
    Ok(())
}

fn project_entity<Q, E>(
    questions: &[Q],
    entity: &E,
    space: &Arc<MatchingSpace>,
) -> Result<Position, MatchError>
where
    Q: MatchableQuestion,
    E: HasAnswers + ?Sized,
{
    let coordinates = questions
        .iter()
        .map(|q| q.normalize_value(entity.answer_value(q.id())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Position::new(&coordinates, space.clone())?)
}

fn reproject(
    projector: &dyn MatchingSpaceProjector,
    reference: Position,
    targets: Vec<Position>,
) -> Result<(Position, Vec<Position>), MatchError> {
    let expected = targets.len() + 1;
    let mut positions = Vec::with_capacity(expected);
    positions.push(reference);
    positions.extend(targets);

    let mut projected = projector.project(positions)?;
    if projected.len() != expected {
        return Err(MatchError::Projection(format!(
            "expected {expected} positions, got {}",
            projected.len()
        )));
    }
    let targets = projected.split_off(1);
    let reference = projected
        .pop()
        .ok_or_else(|| MatchError::Projection("no reference position".into()))?;
    Ok((reference, targets))
}

fn measure_target<'a, T, G>(
    target: &'a T,
    reference: &Position,
    position: &Position,
    options: &DistanceMeasurementOptions,
    grouped: Option<(&'a [G], &[MatchingSpace])>,
) -> Result<Match<'a, T, G>, MatchError> {
    let Some((groups, subspaces)) = grouped else {
        return Ok(Match {
            target,
            distance: measure_distance(reference, position, options)?,
            sub_matches: None,
        });
    };
    let distances = measure_distance_in_subspaces(reference, position, options, subspaces)?;
    let sub_matches = groups
        .iter()
        .zip(distances.subspaces)
        .map(|(question_group, distance)| SubMatch {
            question_group,
            distance,
        })
        .collect();
    Ok(Match {
        target,
        distance: distances.global,
        sub_matches: Some(sub_matches),
    })
}
