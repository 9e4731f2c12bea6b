//! Core types for the skeleton pipeline.
//!
//! ## Type Categories
//!
//! ### Coordinates
//! - [`GridCoord`]: Integer voxel indices (global cells, chunks, offsets)
//! - [`WorldPoint`]: Floating-point positions in field units
//!
//! ### Chunk Addressing
//! - [`ChunkIndex`] / [`CellIndex`]: aliases naming the two halves of a cell address
//! - [`global_coord`], [`split_coord`]: conversions between the two forms
//! - [`linear_index`], [`cell_from_linear`]: in-chunk linear layout

mod index;
mod point;

pub use index::{CellIndex, ChunkIndex, cell_from_linear, global_coord, linear_index, split_coord};
pub use point::{GridCoord, WorldPoint};
