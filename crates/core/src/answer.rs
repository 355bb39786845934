use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A raw answer value as supplied by the caller.
///
/// Choice questions are answered with the id of the selected choice;
/// boolean questions with a boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Boolean(bool),
    Choice(String),
}

impl AnswerValue {
    pub fn choice(id: impl Into<String>) -> Self {
        AnswerValue::Choice(id.into())
    }

    /// Short name of the answer kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerValue::Boolean(_) => "boolean",
            AnswerValue::Choice(_) => "choice",
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Boolean(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Choice(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Choice(value)
    }
}

/// Answers keyed by question id.
pub type AnswerDict = HashMap<String, AnswerValue>;

/// Anything that carries answers to questions, e.g. a voter or a candidate.
///
/// A question without an answer is treated as missing, never as an error.
pub trait HasAnswers {
    fn answer_value(&self, question_id: &str) -> Option<&AnswerValue>;
}

impl HasAnswers for HashMap<String, AnswerValue> {
    fn answer_value(&self, question_id: &str) -> Option<&AnswerValue> {
        self.get(question_id)
    }
}

impl HasAnswers for BTreeMap<String, AnswerValue> {
    fn answer_value(&self, question_id: &str) -> Option<&AnswerValue> {
        self.get(question_id)
    }
}

impl<T: HasAnswers + ?Sized> HasAnswers for &T {
    fn answer_value(&self, question_id: &str) -> Option<&AnswerValue> {
        (**self).answer_value(question_id)
    }
}

/// A minimal answering entity with an identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default)]
    pub answers: AnswerDict,
}

impl Entity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            answers: AnswerDict::new(),
        }
    }

    /// Builder-style helper to record an answer.
    pub fn with_answer(mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.answers.insert(question_id.into(), value.into());
        self
    }
}

impl HasAnswers for Entity {
    fn answer_value(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }
}
