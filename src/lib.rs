//! Delaunay triangulation of 2-D point sets via the Guibas–Stolfi
//! quad-edge structure and their divide-and-conquer algorithm.
//!
//! The subdivision is stored in an arena of quad-edge groups
//! ([`data::QuadEdgeArena`]); the builder ([`algorithms::triangulate`])
//! stitches Delaunay pieces together with robust geometric predicates.

pub mod algorithms;
pub mod data;
pub mod io;
mod predicates;

pub use predicates::{Predicates, INCIRCLE_EPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  InsufficientVertices,
  /// A topological reference or index range that can only arise from a
  /// bug in the caller, never from input data.
  InvariantViolation,
}

impl std::fmt::Display for Error {
  fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::InsufficientVertices => write!(fmt, "at least two input points are required"),
      Error::InvariantViolation => write!(fmt, "subdivision invariant violated"),
    }
  }
}

impl std::error::Error for Error {}
