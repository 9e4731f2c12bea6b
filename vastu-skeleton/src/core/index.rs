//! Conversions between global cell coordinates and (chunk, cell) pairs.
//!
//! A field of chunk edge length `n` stores global cell `g` in chunk
//! `floor(g / n)` at in-chunk index `g mod n` (Euclidean, so negative
//! coordinates work). In-chunk cells are addressed linearly as
//! `x + n * (y + n * z)`.

use super::point::GridCoord;

/// Index of a chunk in the sparse field.
pub type ChunkIndex = GridCoord;

/// Index of a cell inside its chunk, each component in `0..cells_per_side`.
pub type CellIndex = GridCoord;

/// Compose a global cell coordinate from its chunk and in-chunk index.
#[inline]
pub fn global_coord(chunk: ChunkIndex, cell: CellIndex, cells_per_side: usize) -> GridCoord {
    let n = cells_per_side as i32;
    GridCoord::new(
        chunk.x * n + cell.x,
        chunk.y * n + cell.y,
        chunk.z * n + cell.z,
    )
}

/// Split a global cell coordinate into `(chunk, cell)`.
#[inline]
pub fn split_coord(coord: GridCoord, cells_per_side: usize) -> (ChunkIndex, CellIndex) {
    let n = cells_per_side as i32;
    let chunk = GridCoord::new(
        coord.x.div_euclid(n),
        coord.y.div_euclid(n),
        coord.z.div_euclid(n),
    );
    let cell = GridCoord::new(
        coord.x.rem_euclid(n),
        coord.y.rem_euclid(n),
        coord.z.rem_euclid(n),
    );
    (chunk, cell)
}

/// Linear index of an in-chunk cell.
///
/// # Panics
/// If any component lies outside `0..cells_per_side`.
#[inline]
pub fn linear_index(cell: CellIndex, cells_per_side: usize) -> usize {
    let n = cells_per_side as i32;
    assert!(
        (0..n).contains(&cell.x) && (0..n).contains(&cell.y) && (0..n).contains(&cell.z),
        "cell index {cell:?} outside chunk of side {cells_per_side}"
    );
    (cell.x + n * (cell.y + n * cell.z)) as usize
}

/// Inverse of [`linear_index`].
#[inline]
pub fn cell_from_linear(index: usize, cells_per_side: usize) -> CellIndex {
    let n = cells_per_side;
    let x = index % n;
    let y = (index / n) % n;
    let z = index / (n * n);
    GridCoord::new(x as i32, y as i32, z as i32)
}
