use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use vaa_core::{CoordinateOrMissing, NormalizedValue};

use crate::error::SpaceError;

/// Number of flattened sub-coordinates for each top-level dimension.
///
/// `[1, 1, 3]` describes two scalar dimensions followed by one dimension
/// with three subdimensions. Two shapes are equal iff they have the same
/// length and are element-wise equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(dimensions: Vec<usize>) -> Self {
        Self(dimensions)
    }

    /// A shape of `n` scalar dimensions.
    pub fn flat(n: usize) -> Self {
        Self(vec![1; n])
    }

    /// Total number of flattened coordinates.
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl From<usize> for Shape {
    fn from(n: usize) -> Self {
        Shape::flat(n)
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dimensions: Vec<usize>) -> Self {
        Shape(dimensions)
    }
}

impl From<&[usize]> for Shape {
    fn from(dimensions: &[usize]) -> Self {
        Shape(dimensions.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(dimensions: [usize; N]) -> Self {
        Shape(dimensions.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Anything whose shape can be compared against a matching space.
pub trait Shaped {
    fn shape(&self) -> Cow<'_, Shape>;
}

impl Shaped for Shape {
    fn shape(&self) -> Cow<'_, Shape> {
        Cow::Borrowed(self)
    }
}

impl Shaped for [NormalizedValue] {
    fn shape(&self) -> Cow<'_, Shape> {
        Cow::Owned(coordinates_shape(self))
    }
}

impl Shaped for Vec<NormalizedValue> {
    fn shape(&self) -> Cow<'_, Shape> {
        Cow::Owned(coordinates_shape(self))
    }
}

/// Shape of nested coordinates: one entry per value, 1 for scalars.
pub fn coordinates_shape(coordinates: &[NormalizedValue]) -> Shape {
    Shape(coordinates.iter().map(NormalizedValue::dimensions).collect())
}

/// Flatten nested coordinates into one coordinate per flattened dimension.
pub fn flatten(coordinates: &[NormalizedValue]) -> Vec<CoordinateOrMissing> {
    let mut flat = Vec::with_capacity(coordinates.iter().map(NormalizedValue::dimensions).sum());
    for value in coordinates {
        match value {
            NormalizedValue::Scalar(c) => flat.push(*c),
            NormalizedValue::Subdimensions(cs) => flat.extend_from_slice(cs),
        }
    }
    flat
}

/// Inverse of [`flatten`]: split `flat` into nested values following `shape`.
///
/// Fails if `flat.len()` differs from the shape's total.
pub fn reshape(flat: &[CoordinateOrMissing], shape: &Shape) -> Result<Vec<NormalizedValue>, SpaceError> {
    if flat.len() != shape.total() {
        return Err(SpaceError::MalformedPosition(format!(
            "cannot reshape {} coordinates into shape {} ({} coordinates)",
            flat.len(),
            shape,
            shape.total()
        )));
    }
    Ok(split_flat(flat, shape))
}

/// Split without checking lengths; callers guarantee `flat.len() == shape.total()`.
pub(crate) fn split_flat(flat: &[CoordinateOrMissing], shape: &Shape) -> Vec<NormalizedValue> {
    let mut out = Vec::with_capacity(shape.len());
    let mut offset = 0;
    for &d in shape.iter() {
        let chunk = &flat[offset..offset + d];
        out.push(if d == 1 {
            NormalizedValue::Scalar(chunk[0])
        } else {
            NormalizedValue::Subdimensions(chunk.to_vec())
        });
        offset += d;
    }
    out
}
