//! Matching spaces and the positions that live in them.
//!
//! A [`MatchingSpace`] is the geometric contract shared by every entity being
//! compared: its [`Shape`] says how many flattened coordinates each question
//! (top-level dimension) expands to, and its weights say how much each
//! question counts. A [`Position`] is one entity's point in such a space.
//!
//! ## Representation
//!
//! Positions are stored flat, one coordinate per flattened dimension, next to
//! the shape of their space. [`flatten`] and [`reshape`] are the only places
//! that convert between the flat form and the nested per-question
//! [`NormalizedValue`](vaa_core::NormalizedValue) form.
//!
//! ## Invariants
//!
//! - `space.weights.len() == space.shape.len()`
//! - every shape entry is positive
//! - a position's flat length equals `space.shape.total()` and every present
//!   coordinate lies within the global coordinate scale
//!
//! All of these are checked at construction; values are immutable afterwards.

mod error;
mod matching_space;
mod position;
mod shape;

pub use crate::error::SpaceError;
pub use crate::matching_space::{create_subspace, MatchingSpace};
pub use crate::position::Position;
pub use crate::shape::{coordinates_shape, flatten, reshape, Shape, Shaped};
