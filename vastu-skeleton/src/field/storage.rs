//! Sparse chunked field storage.

use std::collections::BTreeMap;

use crate::core::{CellIndex, ChunkIndex, GridCoord, WorldPoint, global_coord, split_coord};

use super::chunk::Chunk;

/// Sparse 3D field made of lazily allocated cubic chunks.
///
/// The world position of global cell `g` is its center,
/// `(g + 0.5) * voxel_size`. Chunks are kept in a `BTreeMap`, so every
/// iteration visits chunks in ascending [`ChunkIndex`] order.
#[derive(Clone, Debug)]
pub struct ChunkedField<T> {
    chunks: BTreeMap<ChunkIndex, Chunk<T>>,
    cells_per_side: usize,
    voxel_size: f32,
    /// Pre-computed 1.0 / voxel_size for world-to-grid conversion.
    inv_voxel_size: f32,
}

impl<T: Clone + Default> ChunkedField<T> {
    /// Create an empty field.
    ///
    /// # Panics
    /// If `cells_per_side` is zero or `voxel_size` is not positive.
    pub fn new(cells_per_side: usize, voxel_size: f32) -> Self {
        assert!(cells_per_side > 0, "chunk edge length must be non-zero");
        assert!(voxel_size > 0.0, "voxel size must be positive");
        Self {
            chunks: BTreeMap::new(),
            cells_per_side,
            voxel_size,
            inv_voxel_size: 1.0 / voxel_size,
        }
    }

    /// Create an empty field with the same layout as `other`.
    pub fn with_layout_of<U>(other: &ChunkedField<U>) -> Self {
        Self::new(other.cells_per_side, other.voxel_size)
    }

    /// Get the chunk, creating it (all default cells) if absent.
    pub fn allocate_chunk(&mut self, index: ChunkIndex) -> &mut Chunk<T> {
        let n = self.cells_per_side;
        self.chunks.entry(index).or_insert_with(|| Chunk::new(n))
    }

    /// Mutable cell at a global coordinate, allocating its chunk if necessary.
    pub fn cell_mut_or_allocate(&mut self, coord: GridCoord) -> &mut T {
        let (chunk, cell) = split_coord(coord, self.cells_per_side);
        self.allocate_chunk(chunk).get_mut(cell)
    }

    /// Write a cell at a global coordinate, allocating its chunk if necessary.
    pub fn set_cell(&mut self, coord: GridCoord, value: T) {
        *self.cell_mut_or_allocate(coord) = value;
    }
}

impl<T> ChunkedField<T> {
    // === Layout ===

    /// Cells per chunk edge.
    #[inline]
    pub fn cells_per_side(&self) -> usize {
        self.cells_per_side
    }

    /// Cells per chunk.
    #[inline]
    pub fn cells_per_chunk(&self) -> usize {
        self.cells_per_side * self.cells_per_side * self.cells_per_side
    }

    /// Cell edge length in world units.
    #[inline]
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// Number of allocated chunks.
    #[inline]
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// True if no chunk has been allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // === Chunk access ===

    /// Whether the chunk has been allocated.
    #[inline]
    pub fn has_chunk(&self, index: ChunkIndex) -> bool {
        self.chunks.contains_key(&index)
    }

    /// Chunk handle, if allocated.
    #[inline]
    pub fn chunk(&self, index: ChunkIndex) -> Option<&Chunk<T>> {
        self.chunks.get(&index)
    }

    /// Mutable chunk handle, if allocated.
    #[inline]
    pub fn chunk_mut(&mut self, index: ChunkIndex) -> Option<&mut Chunk<T>> {
        self.chunks.get_mut(&index)
    }

    /// Remove a chunk, returning it.
    pub fn remove_chunk(&mut self, index: ChunkIndex) -> Option<Chunk<T>> {
        self.chunks.remove(&index)
    }

    /// Drop all chunks.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Allocated chunk indices, ascending.
    pub fn chunk_indices(&self) -> Vec<ChunkIndex> {
        self.chunks.keys().copied().collect()
    }

    /// Iterate `(chunk_index, chunk)` in ascending order.
    pub fn iter_chunks(&self) -> impl Iterator<Item = (&ChunkIndex, &Chunk<T>)> {
        self.chunks.iter()
    }

    /// Iterate every allocated cell as `(global_coord, cell)`.
    ///
    /// Order: ascending chunk index, then ascending linear cell index.
    pub fn iter_cells(&self) -> impl Iterator<Item = (GridCoord, &T)> {
        let n = self.cells_per_side;
        self.chunks.iter().flat_map(move |(chunk_index, chunk)| {
            chunk
                .iter()
                .map(move |(cell, value)| (global_coord(*chunk_index, cell, n), value))
        })
    }

    /// Mutable access to every allocated cell.
    pub fn for_each_cell_mut(&mut self, mut f: impl FnMut(GridCoord, &mut T)) {
        let n = self.cells_per_side;
        for (chunk_index, chunk) in self.chunks.iter_mut() {
            for i in 0..chunk.num_cells() {
                let cell = crate::core::cell_from_linear(i, n);
                f(global_coord(*chunk_index, cell, n), chunk.get_linear_mut(i));
            }
        }
    }

    // === Cell access ===

    /// Cell by `(chunk, cell)` address, `None` if the chunk is absent.
    #[inline]
    pub fn cell(&self, chunk: ChunkIndex, cell: CellIndex) -> Option<&T> {
        self.chunks.get(&chunk).map(|c| c.get(cell))
    }

    /// Mutable cell by `(chunk, cell)` address, `None` if the chunk is absent.
    #[inline]
    pub fn cell_mut(&mut self, chunk: ChunkIndex, cell: CellIndex) -> Option<&mut T> {
        self.chunks.get_mut(&chunk).map(|c| c.get_mut(cell))
    }

    /// Cell at a global coordinate.
    #[inline]
    pub fn cell_at(&self, coord: GridCoord) -> Option<&T> {
        let (chunk, cell) = split_coord(coord, self.cells_per_side);
        self.cell(chunk, cell)
    }

    /// Mutable cell at a global coordinate.
    #[inline]
    pub fn cell_at_mut(&mut self, coord: GridCoord) -> Option<&mut T> {
        let (chunk, cell) = split_coord(coord, self.cells_per_side);
        self.cell_mut(chunk, cell)
    }

    // === Coordinate conversion ===

    /// Global coordinate of a `(chunk, cell)` pair.
    #[inline]
    pub fn global_coord(&self, chunk: ChunkIndex, cell: CellIndex) -> GridCoord {
        global_coord(chunk, cell, self.cells_per_side)
    }

    /// Split a global coordinate into `(chunk, cell)`.
    #[inline]
    pub fn split_coord(&self, coord: GridCoord) -> (ChunkIndex, CellIndex) {
        split_coord(coord, self.cells_per_side)
    }

    /// World position of a cell center.
    #[inline]
    pub fn cell_center(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            (coord.x as f32 + 0.5) * self.voxel_size,
            (coord.y as f32 + 0.5) * self.voxel_size,
            (coord.z as f32 + 0.5) * self.voxel_size,
        )
    }

    /// Global coordinate of the cell containing a world point.
    #[inline]
    pub fn world_to_coord(&self, point: WorldPoint) -> GridCoord {
        GridCoord::new(
            (point.x * self.inv_voxel_size).floor() as i32,
            (point.y * self.inv_voxel_size).floor() as i32,
            (point.z * self.inv_voxel_size).floor() as i32,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_field_creation() {
        let field: ChunkedField<u8> = ChunkedField::new(8, 0.1);
        assert_eq!(field.cells_per_side(), 8);
        assert_eq!(field.cells_per_chunk(), 512);
        assert_eq!(field.num_chunks(), 0);
        assert!(field.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_zero_chunk_size_panics() {
        let _field: ChunkedField<u8> = ChunkedField::new(0, 0.1);
    }

    #[test]
    fn test_lazy_allocation() {
        let mut field: ChunkedField<u8> = ChunkedField::new(4, 1.0);
        assert!(field.cell_at(GridCoord::new(5, 0, 0)).is_none());

        field.set_cell(GridCoord::new(5, 0, 0), 9);
        assert_eq!(field.num_chunks(), 1);
        assert!(field.has_chunk(GridCoord::new(1, 0, 0)));
        assert_eq!(field.cell_at(GridCoord::new(5, 0, 0)), Some(&9));
        assert_eq!(field.cell_at(GridCoord::new(4, 0, 0)), Some(&0));
        assert!(field.cell_at(GridCoord::new(3, 0, 0)).is_none());
    }

    #[test]
    fn test_negative_coordinates() {
        let mut field: ChunkedField<u8> = ChunkedField::new(4, 1.0);
        field.set_cell(GridCoord::new(-1, -1, -1), 1);
        assert!(field.has_chunk(GridCoord::new(-1, -1, -1)));
        assert_eq!(
            field.cell(GridCoord::new(-1, -1, -1), GridCoord::new(3, 3, 3)),
            Some(&1)
        );
    }

    #[test]
    fn test_chunk_indices_sorted() {
        let mut field: ChunkedField<u8> = ChunkedField::new(2, 1.0);
        field.set_cell(GridCoord::new(10, 0, 0), 1);
        field.set_cell(GridCoord::new(-10, 0, 0), 1);
        field.set_cell(GridCoord::new(0, 4, 0), 1);

        let indices = field.chunk_indices();
        let mut sorted = indices.clone();
        sorted.sort();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_iter_cells_global_coords() {
        let mut field: ChunkedField<u8> = ChunkedField::new(2, 1.0);
        field.set_cell(GridCoord::new(3, 2, 1), 5);

        let hits: Vec<_> = field.iter_cells().filter(|(_, v)| **v == 5).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, GridCoord::new(3, 2, 1));
    }

    #[test]
    fn test_cell_center_and_back() {
        let field: ChunkedField<u8> = ChunkedField::new(8, 0.2);
        let coord = GridCoord::new(-3, 4, 10);
        let center = field.cell_center(coord);

        assert_relative_eq!(center.x, -0.5, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.9, epsilon = 1e-6);
        assert_eq!(field.world_to_coord(center), coord);
    }
}
