//! 26-neighborhood lookup across chunk boundaries.
//!
//! Directions are indexed `0..26` in a fixed order that every stage of the
//! pipeline iterates in:
//!
//! | Directions | Kind | Offsets |
//! |------------|------|---------|
//! | 0..6 | faces | −x, +x, −y, +y, −z, +z |
//! | 6..18 | edges | xy plane, then xz, then yz |
//! | 18..26 | corners | sign pattern `(sx, sy, sz)` ascending |
//!
//! Each direction also has a bit position in the 27-bit occupancy code,
//! `(dx+1) + 3(dy+1) + 9(dz+1)`, listed in [`NEIGHBOR_BITS`].

use crate::core::{CellIndex, ChunkIndex, GridCoord, split_coord};

/// Number of neighbors of a cell.
pub const NUM_NEIGHBORS: usize = 26;

/// Directions `0..NUM_FACE_NEIGHBORS` are the face neighbors.
pub const NUM_FACE_NEIGHBORS: usize = 6;

/// Unit offsets of the 26 neighbors, in direction order.
pub const NEIGHBOR_OFFSETS: [GridCoord; NUM_NEIGHBORS] = [
    // Faces
    GridCoord::new(-1, 0, 0),
    GridCoord::new(1, 0, 0),
    GridCoord::new(0, -1, 0),
    GridCoord::new(0, 1, 0),
    GridCoord::new(0, 0, -1),
    GridCoord::new(0, 0, 1),
    // Edges
    GridCoord::new(-1, -1, 0),
    GridCoord::new(-1, 1, 0),
    GridCoord::new(1, -1, 0),
    GridCoord::new(1, 1, 0),
    GridCoord::new(-1, 0, -1),
    GridCoord::new(-1, 0, 1),
    GridCoord::new(1, 0, -1),
    GridCoord::new(1, 0, 1),
    GridCoord::new(0, -1, -1),
    GridCoord::new(0, -1, 1),
    GridCoord::new(0, 1, -1),
    GridCoord::new(0, 1, 1),
    // Corners
    GridCoord::new(-1, -1, -1),
    GridCoord::new(-1, -1, 1),
    GridCoord::new(-1, 1, -1),
    GridCoord::new(-1, 1, 1),
    GridCoord::new(1, -1, -1),
    GridCoord::new(1, -1, 1),
    GridCoord::new(1, 1, -1),
    GridCoord::new(1, 1, 1),
];

/// Occupancy bit of an offset in `{-1, 0, 1}³`.
#[inline]
pub const fn offset_bit(offset: GridCoord) -> u32 {
    ((offset.x + 1) + 3 * (offset.y + 1) + 9 * (offset.z + 1)) as u32
}

/// Occupancy bit for each direction.
pub const NEIGHBOR_BITS: [u32; NUM_NEIGHBORS] = {
    let mut bits = [0u32; NUM_NEIGHBORS];
    let mut i = 0;
    while i < NUM_NEIGHBORS {
        bits[i] = offset_bit(NEIGHBOR_OFFSETS[i]);
        i += 1;
    }
    bits
};

/// One resolved neighbor of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Neighbor {
    /// Chunk owning the neighbor
    pub chunk: ChunkIndex,
    /// In-chunk index of the neighbor
    pub cell: CellIndex,
    /// False if the owning chunk is not allocated
    pub exists: bool,
    /// Unit offset from the query cell
    pub offset: GridCoord,
    /// Direction index into [`NEIGHBOR_OFFSETS`]
    pub direction: usize,
}

/// Global coordinate of the neighbor in `direction`.
#[inline]
pub fn neighbor_coord(coord: GridCoord, direction: usize) -> GridCoord {
    coord + NEIGHBOR_OFFSETS[direction]
}

/// Resolve all 26 neighbors of `(chunk, cell)`.
///
/// Offsets that leave the chunk wrap into the adjacent chunk; `has_chunk`
/// decides whether that chunk exists.
pub fn neighbors_of(
    chunk: ChunkIndex,
    cell: CellIndex,
    cells_per_side: usize,
    has_chunk: impl Fn(ChunkIndex) -> bool,
) -> [Neighbor; NUM_NEIGHBORS] {
    let n = cells_per_side as i32;
    let origin = GridCoord::new(chunk.x * n + cell.x, chunk.y * n + cell.y, chunk.z * n + cell.z);

    std::array::from_fn(|direction| {
        let offset = NEIGHBOR_OFFSETS[direction];
        let (neighbor_chunk, neighbor_cell) = split_coord(origin + offset, cells_per_side);
        let exists = neighbor_chunk == chunk || has_chunk(neighbor_chunk);
        Neighbor {
            chunk: neighbor_chunk,
            cell: neighbor_cell,
            exists,
            offset,
            direction,
        }
    })
}
