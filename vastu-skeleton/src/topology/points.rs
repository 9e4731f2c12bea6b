//! Simple-point and end-point predicates.

use super::components::{count_background_components, count_branches, count_foreground_components};
use super::occupancy::Occupancy;

/// Whether removing the center leaves the local topology unchanged.
///
/// Requires one 26-connected foreground component among the neighbors and
/// at most one 6-connected background component touching a face of the
/// center. The center bit itself is ignored.
///
/// An isolated cell is not simple. A cell whose 18-neighborhood is fully
/// occupied is (it has no local background to split).
pub fn is_simple_point(occ: Occupancy) -> bool {
    count_foreground_components(occ) == 1 && count_background_components(occ) <= 1
}

/// Whether the center terminates a skeleton branch.
///
/// True for exactly one occupied neighbor, or for two that share a face
/// (the tip of a staircase, where the last step has a filler cell). A path
/// corner has two neighbors that only touch diagonally and does not
/// qualify; an isolated cell does not either.
pub fn is_end_point(occ: Occupancy) -> bool {
    match occ.count_neighbors() {
        1 => true,
        2 => count_branches(occ) == 1,
        _ => false,
    }
}
