//! Sparse chunked voxel fields.
//!
//! The skeleton pipeline reads an ESDF ([`DistanceField`]) and writes a
//! parallel [`SkeletonField`] with the same chunk layout. Both are
//! [`ChunkedField`]s: a map from chunk index to a flat cube of cells,
//! allocated on first write.
//!
//! | Type | Role |
//! |------|------|
//! | [`DistanceCell`] | distance, observed flag, nearest-surface offset |
//! | [`SkeletonCell`] | edge flag, vertex/edge assignment, basis count |
//! | [`DistanceSource`] | read-only ESDF interface consumed by the pipeline |

mod cells;
mod chunk;
mod source;
mod storage;

pub use cells::{DistanceCell, SkeletonCell};
pub use chunk::Chunk;
pub use source::DistanceSource;
pub use storage::ChunkedField;

/// In-memory ESDF.
pub type DistanceField = ChunkedField<DistanceCell>;

/// Skeleton layer parallel to a distance field.
pub type SkeletonField = ChunkedField<SkeletonCell>;
