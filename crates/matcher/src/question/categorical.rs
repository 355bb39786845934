use serde::{Deserialize, Serialize};
use vaa_core::{AnswerValue, MatchableQuestion, NormalizedValue, QuestionError, COORDINATE};

use super::expect_choice;

/// A question whose choices cannot be ordered, e.g. "favourite colour".
///
/// With `n > 2` choices an answer becomes `n` subdimensions: the selected
/// choice at `max`, every other at `min`. Disagreement on such a question is
/// therefore bounded by `2 / n` of the extent. Exactly two choices collapse
/// into a single dimension, the first at `min` and the second at `max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalQuestion {
    pub id: String,
    pub choices: Vec<String>,
}

impl CategoricalQuestion {
    pub fn new<I, S>(id: impl Into<String>, choices: I) -> Result<Self, QuestionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let question = Self {
            id: id.into(),
            choices: choices.into_iter().map(Into::into).collect(),
        };
        question.check()?;
        Ok(question)
    }

    fn is_binary(&self) -> bool {
        self.choices.len() == 2
    }

    fn check(&self) -> Result<(), QuestionError> {
        if self.choices.len() < 2 {
            return Err(QuestionError::InvalidDefinition {
                question_id: self.id.clone(),
                reason: "a categorical question needs at least 2 choices".into(),
            });
        }
        Ok(())
    }
}

impl MatchableQuestion for CategoricalQuestion {
    fn id(&self) -> &str {
        &self.id
    }

    fn normalized_dimensions(&self) -> usize {
        if self.is_binary() {
            1
        } else {
            self.choices.len()
        }
    }

    fn normalize_value(&self, value: Option<&AnswerValue>) -> Result<NormalizedValue, QuestionError> {
        self.check()?;
        let Some(value) = value else {
            return Ok(NormalizedValue::missing(self.normalized_dimensions()));
        };
        let choice_id = expect_choice(&self.id, value)?;
        let selected = self
            .choices
            .iter()
            .position(|c| c == choice_id)
            .ok_or_else(|| QuestionError::UnknownChoice {
                question_id: self.id.clone(),
                choice_id: choice_id.to_string(),
            })?;
        if self.is_binary() {
            let coordinate = if selected == 0 { COORDINATE.min } else { COORDINATE.max };
            return Ok(NormalizedValue::from(coordinate));
        }
        Ok(NormalizedValue::from(
            (0..self.choices.len())
                .map(|i| if i == selected { COORDINATE.max } else { COORDINATE.min })
                .collect::<Vec<f64>>(),
        ))
    }
}
