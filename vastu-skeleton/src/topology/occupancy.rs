//! 27-bit occupancy code of a 3×3×3 neighborhood.

use std::fmt;

use crate::core::GridCoord;
use crate::neighbors::{NEIGHBOR_BITS, offset_bit};

/// Bit index of the center cell.
pub const CENTER_BIT: u32 = 13;

/// All 27 bits.
pub const FULL_MASK: u32 = (1 << 27) - 1;

/// The 26 neighbor bits (everything but the center).
pub const NEIGHBORHOOD_MASK: u32 = FULL_MASK & !(1 << CENTER_BIT);

/// Occupancy of a 3×3×3 block centered on a cell.
///
/// Bit `(dx+1) + 3(dy+1) + 9(dz+1)` is set if the cell at offset
/// `(dx, dy, dz)` is occupied.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Occupancy(u32);

impl Occupancy {
    /// Nothing occupied.
    pub const EMPTY: Occupancy = Occupancy(0);

    /// Only the center occupied.
    pub const CENTER: Occupancy = Occupancy(1 << CENTER_BIT);

    /// Wrap raw bits.
    ///
    /// # Panics
    /// If any bit above bit 26 is set.
    #[inline]
    pub fn new(bits: u32) -> Self {
        assert!(bits & !FULL_MASK == 0, "occupancy {bits:#x} wider than 27 bits");
        Self(bits)
    }

    /// Build from a predicate over offsets in `{-1, 0, 1}³`.
    pub fn from_fn(mut occupied: impl FnMut(GridCoord) -> bool) -> Self {
        let mut bits = 0;
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let offset = GridCoord::new(dx, dy, dz);
                    if occupied(offset) {
                        bits |= 1 << offset_bit(offset);
                    }
                }
            }
        }
        Self(bits)
    }

    /// Build from a list of occupied offsets.
    pub fn from_offsets(offsets: &[GridCoord]) -> Self {
        let mut occ = Self::EMPTY;
        for &offset in offsets {
            occ.insert(offset);
        }
        occ
    }

    /// Raw bits.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether bit `bit` is set.
    #[inline]
    pub fn is_set(self, bit: u32) -> bool {
        self.0 & (1 << bit) != 0
    }

    /// Whether the cell at `offset` is occupied.
    ///
    /// # Panics
    /// If the offset lies outside `{-1, 0, 1}³`.
    #[inline]
    pub fn contains(self, offset: GridCoord) -> bool {
        self.is_set(checked_bit(offset))
    }

    /// Mark the cell at `offset` occupied.
    #[inline]
    pub fn insert(&mut self, offset: GridCoord) {
        self.0 |= 1 << checked_bit(offset);
    }

    /// Same occupancy with the center set.
    #[inline]
    pub fn with_center(self) -> Self {
        Self(self.0 | (1 << CENTER_BIT))
    }

    /// Whether the center is occupied.
    #[inline]
    pub fn has_center(self) -> bool {
        self.is_set(CENTER_BIT)
    }

    /// Neighbor bits only (center cleared).
    #[inline]
    pub fn neighbors(self) -> u32 {
        self.0 & NEIGHBORHOOD_MASK
    }

    /// Number of occupied neighbors.
    #[inline]
    pub fn count_neighbors(self) -> u32 {
        self.neighbors().count_ones()
    }

    /// Occupied neighbor directions, ascending.
    pub fn neighbor_directions(self) -> impl Iterator<Item = usize> {
        NEIGHBOR_BITS
            .iter()
            .enumerate()
            .filter(move |&(_, &bit)| self.is_set(bit))
            .map(|(direction, _)| direction)
    }
}

fn checked_bit(offset: GridCoord) -> u32 {
    assert!(
        offset.chebyshev_distance(&GridCoord::ZERO) <= 1,
        "offset {offset:?} outside the 3x3x3 block"
    );
    offset_bit(offset)
}

impl fmt::Debug for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Occupancy({:#029b})", self.0)
    }
}
