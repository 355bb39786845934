use serde::{Deserialize, Serialize};
use vaa_core::{AnswerValue, MatchableQuestion, NormalizedValue, QuestionError, COORDINATE};

use super::expect_choice;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalChoice {
    pub id: String,
    pub value: f64,
}

impl OrdinalChoice {
    pub fn new(id: impl Into<String>, value: f64) -> Self {
        Self { id: id.into(), value }
    }
}

/// A question whose choices lie on an ordered numeric scale, e.g. a Likert
/// scale.
///
/// Answers are mapped linearly so that the lowest choice value lands on
/// `COORDINATE.min` and the highest on `COORDINATE.max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdinalQuestion {
    pub id: String,
    pub choices: Vec<OrdinalChoice>,
}

impl OrdinalQuestion {
    /// Requires at least two choices with finite values that are not all
    /// equal.
    pub fn new(id: impl Into<String>, choices: Vec<OrdinalChoice>) -> Result<Self, QuestionError> {
        let question = Self {
            id: id.into(),
            choices,
        };
        question.value_range()?;
        Ok(question)
    }

    /// A Likert question with choices `choice_1..choice_{scale}` valued
    /// `1..=scale`.
    pub fn from_likert(id: impl Into<String>, scale: usize) -> Result<Self, QuestionError> {
        let choices = (1..=scale)
            .map(|i| OrdinalChoice::new(format!("choice_{i}"), i as f64))
            .collect();
        Self::new(id, choices)
    }

    fn value_range(&self) -> Result<(f64, f64), QuestionError> {
        let invalid = |reason: &str| QuestionError::InvalidDefinition {
            question_id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.choices.len() < 2 {
            return Err(invalid("an ordinal question needs at least 2 choices"));
        }
        if self.choices.iter().any(|c| !c.value.is_finite()) {
            return Err(invalid("choice values must be finite"));
        }
        let min = self.choices.iter().map(|c| c.value).fold(f64::INFINITY, f64::min);
        let max = self.choices.iter().map(|c| c.value).fold(f64::NEG_INFINITY, f64::max);
        if max <= min {
            return Err(invalid("choice values must not all be equal"));
        }
        Ok((min, max))
    }
}

impl MatchableQuestion for OrdinalQuestion {
    fn id(&self) -> &str {
        &self.id
    }

    fn normalize_value(&self, value: Option<&AnswerValue>) -> Result<NormalizedValue, QuestionError> {
        let Some(value) = value else {
            return Ok(NormalizedValue::Scalar(None));
        };
        let choice_id = expect_choice(&self.id, value)?;
        let choice = self
            .choices
            .iter()
            .find(|c| c.id == choice_id)
            .ok_or_else(|| QuestionError::UnknownChoice {
                question_id: self.id.clone(),
                choice_id: choice_id.to_string(),
            })?;
        let (min, max) = self.value_range()?;
        let relative = (choice.value - min) / (max - min);
        Ok(NormalizedValue::from(COORDINATE.min + relative * COORDINATE.extent))
    }
}
