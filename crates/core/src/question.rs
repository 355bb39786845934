use crate::answer::AnswerValue;
use crate::coordinate::NormalizedValue;
use crate::error::QuestionError;

/// The capability a question needs to take part in matching.
///
/// The matching engine never inspects concrete question types; it only asks
/// for a stable id, the number of flattened dimensions, and a way to turn a
/// raw answer into coordinates.
pub trait MatchableQuestion {
    /// Stable identifier, unique within one matching run.
    fn id(&self) -> &str;

    /// Number of flattened coordinates an answer to this question expands to.
    fn normalized_dimensions(&self) -> usize {
        1
    }

    /// Map a raw answer onto the coordinate scale.
    ///
    /// `None` means the question is unanswered and must yield a missing
    /// value of [`Self::normalized_dimensions`] width.
    fn normalize_value(&self, value: Option<&AnswerValue>) -> Result<NormalizedValue, QuestionError>;
}

impl<Q: MatchableQuestion + ?Sized> MatchableQuestion for &Q {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn normalized_dimensions(&self) -> usize {
        (**self).normalized_dimensions()
    }

    fn normalize_value(&self, value: Option<&AnswerValue>) -> Result<NormalizedValue, QuestionError> {
        (**self).normalize_value(value)
    }
}

impl<Q: MatchableQuestion + ?Sized> MatchableQuestion for Box<Q> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn normalized_dimensions(&self) -> usize {
        (**self).normalized_dimensions()
    }

    fn normalize_value(&self, value: Option<&AnswerValue>) -> Result<NormalizedValue, QuestionError> {
        (**self).normalize_value(value)
    }
}
