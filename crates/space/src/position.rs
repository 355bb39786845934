use std::borrow::Cow;
use std::sync::Arc;

use vaa_core::{is_valid_coordinate, CoordinateOrMissing, NormalizedValue};

use crate::error::SpaceError;
use crate::matching_space::MatchingSpace;
use crate::shape::{coordinates_shape, split_flat, Shape, Shaped};

/// One entity's point in a [`MatchingSpace`].
///
/// Coordinates are kept flat; [`Position::coordinates`] restores the nested
/// per-question form on demand. The space is shared through an `Arc` so that
/// all positions projected in one run refer to the same space.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    flat: Vec<CoordinateOrMissing>,
    space: Arc<MatchingSpace>,
}

impl Position {
    /// Build a position from nested coordinates.
    ///
    /// Fails if the coordinates' shape differs from the space's shape or if
    /// any present coordinate lies outside the coordinate scale.
    pub fn new(coordinates: &[NormalizedValue], space: Arc<MatchingSpace>) -> Result<Self, SpaceError> {
        let found = coordinates_shape(coordinates);
        if &found != space.shape() {
            return Err(SpaceError::MalformedPosition(format!(
                "coordinates have shape {found} but the space has shape {}",
                space.shape()
            )));
        }
        Self::from_flat(crate::shape::flatten(coordinates), space)
    }

    /// Build a position from already flattened coordinates.
    pub fn from_flat(flat: Vec<CoordinateOrMissing>, space: Arc<MatchingSpace>) -> Result<Self, SpaceError> {
        let expected = space.shape().total();
        if flat.len() != expected {
            return Err(SpaceError::MalformedPosition(format!(
                "expected {expected} flattened coordinates, got {}",
                flat.len()
            )));
        }
        for (index, value) in flat.iter().enumerate() {
            if let Some(v) = *value {
                if !is_valid_coordinate(v) {
                    return Err(SpaceError::InvalidCoordinate { index, value: v });
                }
            }
        }
        Ok(Self { flat, space })
    }

    /// The coordinates in nested, per-dimension form.
    pub fn coordinates(&self) -> Vec<NormalizedValue> {
        split_flat(&self.flat, self.space.shape())
    }

    /// The coordinates in flat form, one per flattened dimension.
    pub fn flat(&self) -> &[CoordinateOrMissing] {
        &self.flat
    }

    pub fn space(&self) -> &Arc<MatchingSpace> {
        &self.space
    }

    pub fn shape(&self) -> &Shape {
        self.space.shape()
    }

    pub fn has_missing(&self) -> bool {
        self.flat.iter().any(Option::is_none)
    }
}

impl Shaped for Position {
    fn shape(&self) -> Cow<'_, Shape> {
        Cow::Borrowed(self.space.shape())
    }
}
