//! The 48 rotations and reflections of the cube.

use crate::core::GridCoord;

use super::occupancy::Occupancy;

const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// A cube symmetry: output axis `i` takes `signs[i] * input[axes[i]]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeSymmetry {
    axes: [usize; 3],
    signs: [i32; 3],
}

impl CubeSymmetry {
    /// The identity map.
    pub const IDENTITY: CubeSymmetry = CubeSymmetry {
        axes: [0, 1, 2],
        signs: [1, 1, 1],
    };

    /// All 48 symmetries, identity first.
    pub fn all() -> [CubeSymmetry; 48] {
        std::array::from_fn(|i| {
            let axes = PERMUTATIONS[i / 8];
            let flips = i % 8;
            let sign = |k: usize| if flips & (1 << k) != 0 { -1 } else { 1 };
            CubeSymmetry {
                axes,
                signs: [sign(0), sign(1), sign(2)],
            }
        })
    }

    /// Map an offset.
    #[inline]
    pub fn apply_offset(&self, offset: GridCoord) -> GridCoord {
        let v = [offset.x, offset.y, offset.z];
        GridCoord::new(
            self.signs[0] * v[self.axes[0]],
            self.signs[1] * v[self.axes[1]],
            self.signs[2] * v[self.axes[2]],
        )
    }

    /// Map every occupied cell of a neighborhood.
    pub fn apply(&self, occ: Occupancy) -> Occupancy {
        // Pull each target cell from its preimage
        let inverse = self.inverse();
        Occupancy::from_fn(|offset| occ.contains(inverse.apply_offset(offset)))
    }

    /// Map a partial mask the same way as [`apply`](Self::apply); used for
    /// template don't-care masks.
    pub fn apply_bits(&self, bits: u32) -> u32 {
        self.apply(Occupancy::new(bits)).bits()
    }

    /// The inverse symmetry.
    pub fn inverse(&self) -> CubeSymmetry {
        let mut axes = [0; 3];
        let mut signs = [1; 3];
        for i in 0..3 {
            axes[self.axes[i]] = i;
            signs[self.axes[i]] = self.signs[i];
        }
        CubeSymmetry { axes, signs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_distinct() {
        let all = CubeSymmetry::all();
        assert_eq!(all[0], CubeSymmetry::IDENTITY);
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(unique.len(), 48);
    }

    #[test]
    fn test_inverse_round_trip() {
        let p = GridCoord::new(1, -1, 0);
        for s in CubeSymmetry::all() {
            assert_eq!(s.inverse().apply_offset(s.apply_offset(p)), p);
        }
    }

    #[test]
    fn test_center_fixed_and_count_preserved() {
        let occ = Occupancy::from_offsets(&[
            GridCoord::new(1, 0, 0),
            GridCoord::new(1, 1, 0),
            GridCoord::new(-1, -1, 1),
        ])
        .with_center();
        for s in CubeSymmetry::all() {
            let mapped = s.apply(occ);
            assert!(mapped.has_center());
            assert_eq!(mapped.count_neighbors(), 3);
        }
    }

    #[test]
    fn test_face_orbit() {
        let single = Occupancy::from_offsets(&[GridCoord::new(1, 0, 0)]);
        let orbit: HashSet<_> = CubeSymmetry::all().iter().map(|s| s.apply(single)).collect();
        assert_eq!(orbit.len(), 6);
    }
}
