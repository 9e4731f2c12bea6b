//! Sparse skeleton graph: types, construction and pruning.
//!
//! ## Pipeline
//!
//! | Stage | Type | Effect on the skeleton layer |
//! |-------|------|------------------------------|
//! | build | [`GraphBuilder`] | thins cells, stamps vertex and edge ids |
//! | spur pruning | [`Pruner::prune_diagram_edges`] | clears removed spur cells |
//! | vertex pruning | [`Pruner::prune_diagram_vertices`] | demoted vertices become edge cells |

mod builder;
mod error;
mod prune;
mod types;

pub use builder::{BuildResult, GraphBuilder, skeleton_occupancy};
pub use error::GraphError;
pub use prune::Pruner;
pub use types::{EdgeId, SkeletonEdge, SkeletonVertex, SparseSkeletonGraph, VertexId, VertexKind};
