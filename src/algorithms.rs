pub mod triangulation;

#[doc(inline)]
pub use triangulation::delaunay::{triangulate, Cuts};
