//! Digital topology of 3×3×3 neighborhoods.
//!
//! Everything here is a pure function of an [`Occupancy`] code. The graph
//! builder uses these predicates to thin the classified skeleton and to
//! decide which cells become vertices:
//!
//! | Predicate | Meaning |
//! |-----------|---------|
//! | [`is_simple_point`] | removing the center keeps the local topology |
//! | [`is_end_point`] | the center terminates a branch |
//! | [`count_branches`] | 6-connected groups of neighbors (junction test) |
//!
//! Both predicates are invariant under the 48 [`CubeSymmetry`] maps.

mod components;
mod occupancy;
mod points;
mod symmetry;

pub use components::{
    FACE_MASK, N18_MASK, OCTANT_BITS, count_background_components, count_branches,
    count_foreground_components,
};
pub use occupancy::{CENTER_BIT, FULL_MASK, NEIGHBORHOOD_MASK, Occupancy};
pub use points::{is_end_point, is_simple_point};
pub use symmetry::CubeSymmetry;
