//! Graph invariant violations.

use thiserror::Error;

use crate::core::GridCoord;

use super::types::{EdgeId, VertexId};

/// Structural problem found by
/// [`SparseSkeletonGraph::check_consistency`](super::SparseSkeletonGraph::check_consistency).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// An edge references a vertex that does not exist
    #[error("edge {edge} references missing vertex {vertex}")]
    MissingEndpoint {
        /// Offending edge
        edge: EdgeId,
        /// Missing vertex
        vertex: VertexId,
    },

    /// Adjacency lists and edge endpoints disagree
    #[error("adjacency of vertex {vertex} disagrees with edge {edge}")]
    AdjacencyMismatch {
        /// Edge involved
        edge: EdgeId,
        /// Vertex involved
        vertex: VertexId,
    },

    /// Two edges claim the same interior cell
    #[error("cell {cell:?} claimed by edges {first} and {second}")]
    SharedCell {
        /// Cell claimed twice
        cell: GridCoord,
        /// First claiming edge
        first: EdgeId,
        /// Second claiming edge
        second: EdgeId,
    },
}
