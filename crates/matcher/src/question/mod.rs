//! Concrete question types.
//!
//! The engine only ever talks to [`MatchableQuestion`]; [`Question`] is the
//! closed set of variants this crate ships, tagged by `type` when
//! (de)serialized.

mod boolean;
mod categorical;
mod ordinal;

use serde::{Deserialize, Serialize};
use vaa_core::{AnswerValue, MatchableQuestion, NormalizedValue, QuestionError};

pub use self::boolean::BooleanQuestion;
pub use self::categorical::CategoricalQuestion;
pub use self::ordinal::{OrdinalChoice, OrdinalQuestion};

/// Any of the built-in question types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
    Ordinal(OrdinalQuestion),
    Categorical(CategoricalQuestion),
    Boolean(BooleanQuestion),
}

impl Question {
    fn inner(&self) -> &dyn MatchableQuestion {
        match self {
            Question::Ordinal(q) => q,
            Question::Categorical(q) => q,
            Question::Boolean(q) => q,
        }
    }
}

impl MatchableQuestion for Question {
    fn id(&self) -> &str {
        self.inner().id()
    }

    fn normalized_dimensions(&self) -> usize {
        self.inner().normalized_dimensions()
    }

    fn normalize_value(&self, value: Option<&AnswerValue>) -> Result<NormalizedValue, QuestionError> {
        self.inner().normalize_value(value)
    }
}

impl From<OrdinalQuestion> for Question {
    fn from(q: OrdinalQuestion) -> Self {
        Question::Ordinal(q)
    }
}

impl From<CategoricalQuestion> for Question {
    fn from(q: CategoricalQuestion) -> Self {
        Question::Categorical(q)
    }
}

impl From<BooleanQuestion> for Question {
    fn from(q: BooleanQuestion) -> Self {
        Question::Boolean(q)
    }
}

/// Resolve a choice answer, rejecting other answer kinds.
pub(crate) fn expect_choice<'a>(question_id: &str, value: &'a AnswerValue) -> Result<&'a str, QuestionError> {
    match value {
        AnswerValue::Choice(id) => Ok(id),
        other => Err(QuestionError::InvalidAnswerType {
            question_id: question_id.to_string(),
            expected: "choice",
            found: other.kind(),
        }),
    }
}
