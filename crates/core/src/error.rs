use thiserror::Error;

/// Errors raised while defining questions or normalizing answers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionError {
    #[error("invalid question definition for {question_id}: {reason}")]
    InvalidDefinition { question_id: String, reason: String },
    #[error("question {question_id} has no choice with id {choice_id}")]
    UnknownChoice {
        question_id: String,
        choice_id: String,
    },
    #[error("question {question_id} expects a {expected} answer, got {found}")]
    InvalidAnswerType {
        question_id: String,
        expected: &'static str,
        found: &'static str,
    },
}
