//! Read-only view of a distance field.

use crate::core::{CellIndex, ChunkIndex, GridCoord, WorldPoint, split_coord};

use super::cells::DistanceCell;
use super::storage::ChunkedField;

/// What the skeleton pipeline needs from an ESDF.
///
/// Implemented by the in-memory [`ChunkedField<DistanceCell>`]; other
/// distance-field stores can plug in by implementing it.
pub trait DistanceSource {
    /// Cells per chunk edge.
    fn cells_per_side(&self) -> usize;

    /// Cell edge length in world units.
    fn voxel_size(&self) -> f32;

    /// Whether the chunk is present.
    fn has_chunk(&self, chunk: ChunkIndex) -> bool;

    /// All present chunk indices, in ascending order.
    fn chunk_indices(&self) -> Vec<ChunkIndex>;

    /// Cell value, `None` if the chunk is absent.
    fn distance_cell(&self, chunk: ChunkIndex, cell: CellIndex) -> Option<DistanceCell>;

    /// Cell value at a global coordinate.
    fn distance_at(&self, coord: GridCoord) -> Option<DistanceCell> {
        let (chunk, cell) = split_coord(coord, self.cells_per_side());
        self.distance_cell(chunk, cell)
    }

    /// World position of a cell center.
    fn cell_center(&self, coord: GridCoord) -> WorldPoint {
        let v = self.voxel_size();
        WorldPoint::new(
            (coord.x as f32 + 0.5) * v,
            (coord.y as f32 + 0.5) * v,
            (coord.z as f32 + 0.5) * v,
        )
    }
}

impl DistanceSource for ChunkedField<DistanceCell> {
    #[inline]
    fn cells_per_side(&self) -> usize {
        ChunkedField::cells_per_side(self)
    }

    #[inline]
    fn voxel_size(&self) -> f32 {
        ChunkedField::voxel_size(self)
    }

    #[inline]
    fn has_chunk(&self, chunk: ChunkIndex) -> bool {
        ChunkedField::has_chunk(self, chunk)
    }

    fn chunk_indices(&self) -> Vec<ChunkIndex> {
        ChunkedField::chunk_indices(self)
    }

    #[inline]
    fn distance_cell(&self, chunk: ChunkIndex, cell: CellIndex) -> Option<DistanceCell> {
        self.cell(chunk, cell).copied()
    }
}
