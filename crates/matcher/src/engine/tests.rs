use super::*;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use distance::{DistanceError, DistanceMetric, MissingValueMethod, MissingValueOptions};
use vaa_core::{AnswerValue, Entity, COORDINATE};

use crate::metrics::{set_match_metrics, MatchMetrics};
use crate::question::{BooleanQuestion, CategoricalQuestion, OrdinalQuestion, Question};
use crate::types::sort_matches;

const MIN: f64 = COORDINATE.min;
const MAX: f64 = COORDINATE.max;
const HALF: f64 = COORDINATE.extent / 2.0;
const FULL: f64 = COORDINATE.extent;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn likert_questions(count: usize, scale: usize) -> Vec<OrdinalQuestion> {
    (0..count)
        .map(|i| OrdinalQuestion::from_likert(format!("qst{i}"), scale).expect("valid scale"))
        .collect()
}

/// Answers given as 1-based positions on each question's scale.
fn likert_entity(id: &str, questions: &[OrdinalQuestion], values: &[Option<usize>]) -> Entity {
    questions
        .iter()
        .zip(values)
        .fold(Entity::new(id), |entity, (q, value)| match value {
            Some(v) => entity.with_answer(q.id.clone(), format!("choice_{v}")),
            None => entity,
        })
}

fn all(values: &[usize]) -> Vec<Option<usize>> {
    values.iter().copied().map(Some).collect()
}

fn algorithm(metric: DistanceMetric, method: MissingValueMethod) -> MatchingAlgorithm {
    MatchingAlgorithm::new(MatchingConfig::new(metric, MissingValueOptions::new(method)))
        .expect("valid config")
}

fn manhattan_neutral() -> MatchingAlgorithm {
    algorithm(DistanceMetric::Manhattan, MissingValueMethod::Neutral)
}

#[test]
fn projects_answers_to_normalized_space() -> Result<(), MatchError> {
    let questions = likert_questions(3, 5);
    let candidates = vec![
        likert_entity("a", &questions, &all(&[1, 3, 5])),
        likert_entity("b", &questions, &[Some(2), None, Some(4)]),
    ];
    let positions = manhattan_neutral().project_to_normalized_space(&questions, &candidates, None)?;
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0].flat(), &[Some(MIN), Some(0.0), Some(MAX)]);
    assert_eq!(positions[1].flat(), &[Some(-0.25), None, Some(0.25)]);

    let subset = manhattan_neutral().project_to_normalized_space(&questions[1..], &candidates, None)?;
    assert_eq!(subset[0].flat(), &[Some(0.0), Some(MAX)]);
    Ok(())
}

#[test]
fn duplicate_question_ids_fail() {
    let mut questions = likert_questions(3, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 3, 5]));
    let candidates = vec![likert_entity("a", &questions, &all(&[1, 3, 5]))];
    questions.push(OrdinalQuestion::from_likert("qst0", 5).expect("valid scale"));

    let result = manhattan_neutral().match_targets(&questions, &voter, &candidates);
    assert!(matches!(result, Err(MatchError::DuplicateQuestion(id)) if id == "qst0"));
}

#[test]
fn empty_inputs_fail() {
    let questions = likert_questions(2, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 2]));
    let none: Vec<Entity> = Vec::new();
    assert!(matches!(
        manhattan_neutral().match_targets(&questions, &voter, &none),
        Err(MatchError::NoTargets)
    ));
    let no_questions: Vec<OrdinalQuestion> = Vec::new();
    assert!(matches!(
        manhattan_neutral().match_targets(&no_questions, &voter, &[voter.clone()]),
        Err(MatchError::NoQuestions)
    ));
}

#[test]
fn unknown_answers_fail() {
    let questions = likert_questions(2, 5);
    let voter = Entity::new("voter")
        .with_answer("qst0", "choice_1")
        .with_answer("qst1", "not_a_choice");
    let candidates = vec![likert_entity("a", &questions, &all(&[1, 2]))];
    assert!(matches!(
        manhattan_neutral().match_targets(&questions, &voter, &candidates),
        Err(MatchError::Question(_))
    ));
}

#[test]
fn missing_reference_answers_need_permission() -> Result<(), MatchError> {
    let questions = likert_questions(3, 5);
    let voter = likert_entity("voter", &questions, &[None, Some(5), Some(5)]);
    let candidates = vec![likert_entity("a", &questions, &all(&[1, 3, 5]))];

    let strict = manhattan_neutral();
    assert!(matches!(
        strict.match_targets(&questions, &voter, &candidates),
        Err(MatchError::Distance(DistanceError::DisallowedMissingValue { index: 0 }))
    ));

    let lenient = MatchingAlgorithm::new(MatchingConfig::default().with_allow_missing_reference(true))?;
    let matches = lenient.match_targets(&questions, &voter, &candidates)?;
    // [3-5, 5-5]
    assert_close(matches[0].distance, (HALF + 0.0) / 2.0);
    Ok(())
}

#[test]
fn reference_without_answers_fails() {
    let questions = likert_questions(3, 5);
    let voter = Entity::new("voter");
    let candidates = vec![
        likert_entity("a", &questions, &all(&[1, 1, 1])),
        likert_entity("b", &questions, &all(&[5, 5, 5])),
    ];
    for config in [
        MatchingConfig::default(),
        MatchingConfig::default().with_allow_missing_reference(true),
        MatchingConfig::default()
            .with_allow_missing_reference(true)
            .with_parallel(true),
    ] {
        let algorithm = MatchingAlgorithm::new(config).expect("valid config");
        assert!(matches!(
            algorithm.match_targets(&questions, &voter, &candidates),
            Err(MatchError::NoReferenceAnswers)
        ));
    }

    // Answers to questions outside the list do not count.
    let off_topic = Entity::new("voter").with_answer("elsewhere", "choice_1");
    let lenient = MatchingAlgorithm::new(MatchingConfig::default().with_allow_missing_reference(true))
        .expect("valid config");
    assert!(matches!(
        lenient.match_targets(&questions, &off_topic, &candidates),
        Err(MatchError::NoReferenceAnswers)
    ));
}

#[test]
fn missing_target_answers_are_imputed() -> Result<(), MatchError> {
    let questions = likert_questions(3, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 3, 5]));
    let candidates = vec![likert_entity("a", &questions, &[None, None, None])];

    let neutral = manhattan_neutral().match_targets(&questions, &voter, &candidates)?;
    // [1-3, 3-3, 5-3]
    assert_close(neutral[0].distance, (HALF + 0.0 + HALF) / 3.0);

    let relative = algorithm(DistanceMetric::Manhattan, MissingValueMethod::RelativeMaximum)
        .match_targets(&questions, &voter, &candidates)?;
    // [1-5, 3-5, 5-1]
    assert_close(relative[0].distance, (FULL + HALF + FULL) / 3.0);
    Ok(())
}

#[test]
fn directional_metric() -> Result<(), MatchError> {
    let questions = likert_questions(5, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 2, 3, 4, 2]));
    let candidates = vec![likert_entity("a", &questions, &all(&[1, 5, 5, 2, 3]))];
    let matches = algorithm(DistanceMetric::Directional, MissingValueMethod::Neutral)
        .match_targets(&questions, &voter, &candidates)?;
    let expected = (0.0 // 1-1
        + 0.75 * FULL // 2-5
        + HALF // 3-5
        + 0.625 * FULL // 4-2
        + HALF) // 2-3
        / 5.0;
    assert_close(matches[0].distance, expected);
    Ok(())
}

#[test]
fn categorical_questions() -> Result<(), MatchError> {
    let questions = vec![
        CategoricalQuestion::new("categorical2", ["no", "yes"]).expect("valid question"),
        CategoricalQuestion::new("categorical4", ["a", "b", "c", "d"]).expect("valid question"),
    ];
    let answers = |values: [Option<&str>; 2]| {
        questions
            .iter()
            .zip(values)
            .fold(Entity::new("e"), |e, (q, v)| match v {
                Some(v) => e.with_answer(q.id.clone(), v),
                None => e,
            })
    };
    let voter = answers([Some("no"), Some("a")]);
    let candidates = vec![
        answers([Some("yes"), Some("c")]),
        answers([None, None]),
        answers([Some("no"), Some("a")]),
    ];
    let matches = algorithm(DistanceMetric::Manhattan, MissingValueMethod::RelativeMaximum)
        .match_targets(&questions, &voter, &candidates)?;

    // Binary disagreement, then 4-choice disagreement bounded at 2/4.
    assert_close(matches[0].distance, (FULL + FULL * 2.0 / 4.0) / 2.0);
    assert_close(matches[1].distance, FULL);
    assert_close(matches[2].distance, 0.0);
    Ok(())
}

#[test]
fn mixed_question_types() -> Result<(), MatchError> {
    let likert5 = OrdinalQuestion::from_likert("likert5", 5).expect("valid scale");
    let likert7 = OrdinalQuestion::from_likert("likert7", 7).expect("valid scale");
    let questions: Vec<Question> = vec![
        likert5.clone().into(),
        likert7.clone().into(),
        CategoricalQuestion::new("categorical2", ["no", "yes"])
            .expect("valid question")
            .into(),
        CategoricalQuestion::new("categorical4", ["a", "b", "c", "d"])
            .expect("valid question")
            .into(),
    ];
    let voter = Entity::new("voter")
        .with_answer("likert5", likert5.choices[0].id.as_str())
        .with_answer("likert7", likert7.choices[5].id.as_str())
        .with_answer("categorical2", "no")
        .with_answer("categorical4", "c");
    let candidates = vec![
        Entity::new("a")
            .with_answer("likert7", likert7.choices[1].id.as_str())
            .with_answer("categorical2", "yes")
            .with_answer("categorical4", "c"),
        Entity::new("b")
            .with_answer("likert5", likert5.choices[3].id.as_str())
            .with_answer("likert7", likert7.choices[6].id.as_str())
            .with_answer("categorical2", "no")
            .with_answer("categorical4", "a"),
    ];
    let matches = algorithm(DistanceMetric::Manhattan, MissingValueMethod::RelativeMaximum)
        .match_targets(&questions, &voter, &candidates)?;

    let expected_a = (FULL // likert5: 1 vs missing => 5
        + (4.0 / 6.0) * FULL // likert7: 6-2
        + FULL // categorical2: no-yes
        + 0.0) // categorical4: c-c
        / 4.0;
    let expected_b = (0.75 * FULL // likert5: 1-4
        + (1.0 / 6.0) * FULL // likert7: 6-7
        + 0.0 // categorical2: no-no
        + 0.5 * FULL) // categorical4: c-a
        / 4.0;
    assert_close(matches[0].distance, expected_a);
    assert_close(matches[1].distance, expected_b);
    Ok(())
}

#[test]
fn sub_matches_follow_question_groups() -> Result<(), MatchError> {
    let questions = likert_questions(5, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 1, 1, 1, 3]));
    let candidates = vec![likert_entity("a", &questions, &all(&[1, 1, 5, 4, 5]))];
    let options = MatchingOptions::default().with_groups(vec![
        QuestionGroup::new(["qst0"]),
        QuestionGroup::new(["qst2"]),
        QuestionGroup::new(["qst0", "qst1", "qst2", "qst3"]),
    ]);

    let matches =
        manhattan_neutral().match_targets_with_options(&questions, &voter, &candidates, &options)?;
    let m = &matches[0];
    assert_close(m.distance, (0.0 + 0.0 + FULL + 0.75 * FULL + HALF) / 5.0);

    let subs = m.sub_matches.as_ref().expect("groups were given");
    let groups = options.question_groups.as_ref().expect("groups were given");
    assert_eq!(subs.len(), groups.len());
    for (sub, group) in subs.iter().zip(groups) {
        assert!(std::ptr::eq(sub.question_group, group));
    }
    assert_close(subs[0].distance, 0.0);
    assert_close(subs[1].distance, FULL);
    assert_close(subs[2].distance, (0.0 + 0.0 + FULL + 0.75 * FULL) / 4.0);
    Ok(())
}

#[test]
fn sub_matches_absent_without_groups_and_empty_for_empty_groups() -> Result<(), MatchError> {
    let questions = likert_questions(2, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 5]));
    let candidates = vec![likert_entity("a", &questions, &all(&[5, 5]))];

    let plain = manhattan_neutral().match_targets(&questions, &voter, &candidates)?;
    assert!(plain[0].sub_matches.is_none());

    let options: MatchingOptions = MatchingOptions::default().with_groups(Vec::new());
    let grouped =
        manhattan_neutral().match_targets_with_options(&questions, &voter, &candidates, &options)?;
    assert_eq!(grouped[0].sub_matches.as_ref().map(Vec::len), Some(0));
    assert_close(grouped[0].distance, plain[0].distance);
    Ok(())
}

#[test]
fn group_without_matched_questions_is_half_extent() -> Result<(), MatchError> {
    let questions = likert_questions(3, 5);
    let voter = likert_entity("voter", &questions, &[None, Some(1), Some(1)]);
    let candidates = vec![likert_entity("a", &questions, &all(&[1, 3, 5]))];
    let options = MatchingOptions::default().with_groups(vec![QuestionGroup::new(["qst0"])]);

    // The group's only question is left out of the run.
    let matches = algorithm(DistanceMetric::Manhattan, MissingValueMethod::RelativeMaximum)
        .match_targets_with_options(&questions[1..], &voter, &candidates, &options)?;
    let sub = matches[0].sub_matches.as_ref().expect("groups were given")[0];
    assert_close(sub.distance, HALF);

    // Or included but unanswered by the reference.
    let lenient = MatchingAlgorithm::new(
        MatchingConfig::new(
            DistanceMetric::Manhattan,
            MissingValueOptions::new(MissingValueMethod::RelativeMaximum),
        )
        .with_allow_missing_reference(true),
    )?;
    let matches = lenient.match_targets_with_options(&questions, &voter, &candidates, &options)?;
    let sub = matches[0].sub_matches.as_ref().expect("groups were given")[0];
    assert_close(sub.distance, HALF);
    Ok(())
}

#[test]
fn question_weights() -> Result<(), MatchError> {
    let questions = likert_questions(3, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 3, 5]));
    let candidates = vec![likert_entity("a", &questions, &all(&[1, 1, 1]))];
    let weights = [0.54234, 4.131231, 97.1134];
    let options = MatchingOptions::<QuestionGroup>::default().with_weights(
        questions
            .iter()
            .zip(weights)
            .map(|(q, w)| (q.id.clone(), w))
            .collect(),
    );

    let matches =
        manhattan_neutral().match_targets_with_options(&questions, &voter, &candidates, &options)?;
    let expected =
        (weights[0] * 0.0 + weights[1] * HALF + weights[2] * FULL) / weights.iter().sum::<f64>();
    assert_close(matches[0].distance, expected);
    Ok(())
}

#[test]
fn group_subspaces_keep_question_weights() -> Result<(), MatchError> {
    let questions = likert_questions(3, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 1, 1]));
    let candidates = vec![likert_entity("a", &questions, &all(&[1, 3, 5]))];
    let options = MatchingOptions::default()
        .with_weights([("qst1".to_string(), 3.0)].into_iter().collect())
        .with_groups(vec![QuestionGroup::new(["qst1", "qst2"])]);

    let matches =
        manhattan_neutral().match_targets_with_options(&questions, &voter, &candidates, &options)?;
    let sub = matches[0].sub_matches.as_ref().expect("groups were given")[0];
    assert_close(sub.distance, (3.0 * HALF + FULL) / 4.0);
    Ok(())
}

#[test]
fn results_keep_target_order() -> Result<(), MatchError> {
    let questions = likert_questions(2, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 1]));
    let candidates = vec![
        likert_entity("far", &questions, &all(&[5, 5])),
        likert_entity("near", &questions, &all(&[1, 1])),
        likert_entity("mid", &questions, &all(&[3, 3])),
    ];
    let mut matches = manhattan_neutral().match_targets(&questions, &voter, &candidates)?;
    let ids: Vec<&str> = matches.iter().map(|m| m.target.id.as_str()).collect();
    assert_eq!(ids, vec!["far", "near", "mid"]);

    sort_matches(&mut matches);
    let ids: Vec<&str> = matches.iter().map(|m| m.target.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "mid", "far"]);
    Ok(())
}

#[test]
fn parallel_matches_sequential() -> Result<(), MatchError> {
    let questions = likert_questions(4, 5);
    let voter = likert_entity("voter", &questions, &[Some(1), Some(2), None, Some(5)]);
    let candidates: Vec<Entity> = (0..64)
        .map(|i| {
            let values: Vec<Option<usize>> = (0..4)
                .map(|q| if (i + q) % 7 == 0 { None } else { Some((i * (q + 1)) % 5 + 1) })
                .collect();
            likert_entity(&format!("c{i}"), &questions, &values)
        })
        .collect();
    let options = MatchingOptions::default().with_groups(vec![QuestionGroup::new(["qst0", "qst3"])]);
    let base = MatchingConfig::new(
        DistanceMetric::Euclidean,
        MissingValueOptions::new(MissingValueMethod::RelativeMaximum),
    )
    .with_allow_missing_reference(true);

    let sequential = MatchingAlgorithm::new(base.clone())?
        .match_targets_with_options(&questions, &voter, &candidates, &options)?;
    let parallel = MatchingAlgorithm::new(base.with_parallel(true))?
        .match_targets_with_options(&questions, &voter, &candidates, &options)?;

    assert_eq!(sequential.len(), parallel.len());
    for (s, p) in sequential.iter().zip(&parallel) {
        assert!(std::ptr::eq(s.target, p.target));
        assert_eq!(s.distance, p.distance);
        let s_sub = s.sub_matches.as_ref().expect("groups were given");
        let p_sub = p.sub_matches.as_ref().expect("groups were given");
        assert_eq!(s_sub[0].distance, p_sub[0].distance);
    }
    Ok(())
}

/// Keeps only the first coordinate of every position.
struct FirstDimension;

impl MatchingSpaceProjector for FirstDimension {
    fn project(&self, positions: Vec<Position>) -> Result<Vec<Position>, MatchError> {
        let space = Arc::new(MatchingSpace::new(1)?);
        positions
            .iter()
            .map(|p| Position::from_flat(vec![p.flat()[0]], space.clone()).map_err(MatchError::from))
            .collect()
    }
}

/// Drops every position.
struct Lossy;

impl MatchingSpaceProjector for Lossy {
    fn project(&self, _positions: Vec<Position>) -> Result<Vec<Position>, MatchError> {
        Ok(Vec::new())
    }
}

#[test]
fn projector_reprojects_before_measuring() -> Result<(), MatchError> {
    let questions = likert_questions(3, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 1, 1]));
    let candidates = vec![
        likert_entity("a", &questions, &all(&[3, 5, 5])),
        likert_entity("b", &questions, &all(&[5, 1, 1])),
    ];
    let matches = manhattan_neutral()
        .with_projector(Arc::new(FirstDimension))
        .match_targets(&questions, &voter, &candidates)?;
    assert_close(matches[0].distance, HALF);
    assert_close(matches[1].distance, FULL);

    let failed = manhattan_neutral()
        .with_projector(Arc::new(Lossy))
        .match_targets(&questions, &voter, &candidates);
    assert!(matches!(failed, Err(MatchError::Projection(_))));
    Ok(())
}

#[test]
fn boolean_question_rejects_choice_answers() {
    let questions: Vec<Question> = vec![BooleanQuestion::new("b").into()];
    let voter = Entity::new("voter").with_answer("b", "yes");
    let candidates = vec![Entity::new("a").with_answer("b", AnswerValue::Boolean(true))];
    assert!(matches!(
        manhattan_neutral().match_targets(&questions, &voter, &candidates),
        Err(MatchError::Question(_))
    ));
}

struct RecordingMetrics {
    events: Arc<RwLock<Vec<(DistanceMetric, usize, bool)>>>,
}

impl RecordingMetrics {
    fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn snapshot(&self) -> Vec<(DistanceMetric, usize, bool)> {
        self.events.read().unwrap().clone()
    }
}

impl MatchMetrics for RecordingMetrics {
    fn record_match(
        &self,
        metric: &DistanceMetric,
        _latency: Duration,
        target_count: usize,
        success: bool,
    ) {
        self.events
            .write()
            .unwrap()
            .push((*metric, target_count, success));
    }
}

#[test]
fn metrics_recorder_observes_matches() -> Result<(), MatchError> {
    let questions = likert_questions(2, 5);
    let voter = likert_entity("voter", &questions, &all(&[1, 2]));
    let candidates = vec![
        likert_entity("a", &questions, &all(&[2, 2])),
        likert_entity("b", &questions, &all(&[3, 2])),
        likert_entity("c", &questions, &all(&[4, 2])),
    ];
    let metrics = Arc::new(RecordingMetrics::new());
    set_match_metrics(Some(metrics.clone()));

    let algorithm = algorithm(DistanceMetric::Directional, MissingValueMethod::Neutral);
    algorithm.match_targets(&questions, &voter, &candidates)?;
    let empty: Vec<Entity> = Vec::new();
    assert!(algorithm.match_targets(&questions, &voter, &empty).is_err());

    let events = metrics.snapshot();
    // Other tests may record concurrently; assert on our own events only.
    assert!(events.contains(&(DistanceMetric::Directional, 3, true)));
    assert!(events.contains(&(DistanceMetric::Directional, 0, false)));

    set_match_metrics(None);
    Ok(())
}
