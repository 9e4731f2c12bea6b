//! # Vastu-Skeleton: Sparse Skeleton Graphs from 3D Distance Fields
//!
//! Extracts the medial axis of the free space in a chunked Euclidean signed
//! distance field and reduces it to a sparse graph of vertices (junctions
//! and end points) joined by edges that follow skeleton cells.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vastu_skeleton::{DistanceField, SkeletonConfig, SkeletonGenerator};
//!
//! let esdf = DistanceField::new(16, 0.1);
//! // ... fill the field ...
//!
//! let mut generator = SkeletonGenerator::new(&esdf, SkeletonConfig::default())
//!     .expect("default config is valid");
//! let stats = generator.run();
//! println!("{} vertices, {} edges", stats.num_vertices, stats.num_edges);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Grid coordinates, world points, chunk addressing
//! - [`field`]: Chunked storage, distance and skeleton cells
//! - [`neighbors`]: 26-neighborhood offsets across chunk boundaries
//! - [`topology`]: Simple-point, end-point and branch predicates
//! - [`template`]: 3×3×3 pattern matching for spur pruning
//! - [`classify`]: Medial-axis classification from basis directions
//! - [`graph`]: Sparse graph types, construction and pruning
//! - [`skeleton`]: Flat point view of the skeleton layer
//! - [`config`]: YAML configuration
//!
//! ## Data Flow
//!
//! ```text
//!   DistanceSource ──classify──▶ SkeletonField ──thin + trace──▶ SparseSkeletonGraph
//!                                      ▲                               │
//!                                      └────── spur / vertex pruning ──┘
//! ```

#![warn(missing_docs)]

pub mod classify;
pub mod config;
pub mod core;
pub mod field;
pub mod generator;
pub mod graph;
pub mod neighbors;
pub mod skeleton;
pub mod template;
pub mod topology;

pub use classify::SkeletonClassifier;
pub use config::{ConfigError, SkeletonConfig};
pub use core::{GridCoord, WorldPoint};
pub use field::{
    Chunk, ChunkedField, DistanceCell, DistanceField, DistanceSource, SkeletonCell, SkeletonField,
};
pub use generator::{SkeletonGenerator, SkeletonStats};
pub use graph::{
    EdgeId, GraphError, SkeletonEdge, SkeletonVertex, SparseSkeletonGraph, VertexId, VertexKind,
};
pub use skeleton::{Skeleton, SkeletonPoint};
pub use template::{TemplateMatcher, VoxelTemplate};
