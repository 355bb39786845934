use space::Position;

use crate::types::MatchError;

/// Re-projects positions into another, usually lower-dimensional, matching
/// space before distances are measured.
///
/// The reference position comes first in `positions`, followed by the
/// targets in input order. Implementations must return the same number of
/// positions in the same order, all sharing one space.
pub trait MatchingSpaceProjector: Send + Sync {
    fn project(&self, positions: Vec<Position>) -> Result<Vec<Position>, MatchError>;
}
