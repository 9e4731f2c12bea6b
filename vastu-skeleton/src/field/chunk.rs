//! A single cubic chunk of cells.

use crate::core::{CellIndex, cell_from_linear, linear_index};

/// Flat storage for `cells_per_side³` cells.
///
/// Cells are laid out as `x + n * (y + n * z)`.
#[derive(Clone, Debug)]
pub struct Chunk<T> {
    cells: Vec<T>,
    cells_per_side: usize,
}

impl<T: Clone + Default> Chunk<T> {
    /// Create a chunk with every cell at `T::default()`.
    pub fn new(cells_per_side: usize) -> Self {
        Self {
            cells: vec![T::default(); cells_per_side * cells_per_side * cells_per_side],
            cells_per_side,
        }
    }
}

impl<T> Chunk<T> {
    /// Cells per chunk edge.
    #[inline]
    pub fn cells_per_side(&self) -> usize {
        self.cells_per_side
    }

    /// Total number of cells in the chunk.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Cell by in-chunk index.
    ///
    /// # Panics
    /// If the index lies outside the chunk.
    #[inline]
    pub fn get(&self, cell: CellIndex) -> &T {
        &self.cells[linear_index(cell, self.cells_per_side)]
    }

    /// Mutable cell by in-chunk index.
    ///
    /// # Panics
    /// If the index lies outside the chunk.
    #[inline]
    pub fn get_mut(&mut self, cell: CellIndex) -> &mut T {
        &mut self.cells[linear_index(cell, self.cells_per_side)]
    }

    /// Cell by linear index.
    #[inline]
    pub fn get_linear(&self, index: usize) -> &T {
        &self.cells[index]
    }

    /// Mutable cell by linear index.
    #[inline]
    pub fn get_linear_mut(&mut self, index: usize) -> &mut T {
        &mut self.cells[index]
    }

    /// Iterate `(cell_index, cell)` in ascending linear order.
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &T)> {
        let n = self.cells_per_side;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (cell_from_linear(i, n), c))
    }

    /// Raw cell slice.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridCoord;

    #[test]
    fn test_chunk_creation() {
        let chunk: Chunk<u8> = Chunk::new(4);
        assert_eq!(chunk.num_cells(), 64);
        assert!(chunk.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_chunk_get_set() {
        let mut chunk: Chunk<u8> = Chunk::new(4);
        *chunk.get_mut(GridCoord::new(1, 2, 3)) = 7;

        assert_eq!(*chunk.get(GridCoord::new(1, 2, 3)), 7);
        assert_eq!(*chunk.get_linear(1 + 4 * (2 + 4 * 3)), 7);
    }

    #[test]
    fn test_chunk_iter_order() {
        let chunk: Chunk<u8> = Chunk::new(2);
        let order: Vec<_> = chunk.iter().map(|(idx, _)| idx).collect();
        assert_eq!(order[0], GridCoord::new(0, 0, 0));
        assert_eq!(order[1], GridCoord::new(1, 0, 0));
        assert_eq!(order[2], GridCoord::new(0, 1, 0));
        assert_eq!(order[4], GridCoord::new(0, 0, 1));
    }
}
