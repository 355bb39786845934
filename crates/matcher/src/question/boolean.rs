use serde::{Deserialize, Serialize};
use vaa_core::{AnswerValue, MatchableQuestion, NormalizedValue, QuestionError, COORDINATE};

/// A yes/no question: `false` maps to `min`, `true` to `max`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanQuestion {
    pub id: String,
}

impl BooleanQuestion {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl MatchableQuestion for BooleanQuestion {
    fn id(&self) -> &str {
        &self.id
    }

    fn normalize_value(&self, value: Option<&AnswerValue>) -> Result<NormalizedValue, QuestionError> {
        match value {
            None => Ok(NormalizedValue::Scalar(None)),
            Some(AnswerValue::Boolean(b)) => Ok(NormalizedValue::from(if *b {
                COORDINATE.max
            } else {
                COORDINATE.min
            })),
            Some(other) => Err(QuestionError::InvalidAnswerType {
                question_id: self.id.clone(),
                expected: "boolean",
                found: other.kind(),
            }),
        }
    }
}
