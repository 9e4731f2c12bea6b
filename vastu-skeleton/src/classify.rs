//! Medial-axis classification of ESDF cells.
//!
//! A free cell lies on the medial axis when the nearest obstacle surface
//! flips direction across it. The cell and each of its free 26-neighbors
//! contribute one direction, from their own center towards their nearest
//! surface point. These are the cell's *basis points*; near a wall they all
//! agree, on the medial axis they split into two or more clusters.
//!
//! The nearest-surface point comes from the cell's `parent` offset when the
//! ESDF integrator recorded one. Otherwise it is estimated by stepping
//! `distance` against the distance gradient (central differences over the
//! face neighbors).
//!
//! ## Modes
//!
//! | Mode | Cell is skeleton iff |
//! |------|----------------------|
//! | basis (default) | two basis directions are `min_separation_angle` apart |
//! | layer neighbors | `num_neighbors_for_edge` of its neighbors pass the basis test |

use std::collections::HashMap;

use log::debug;

use crate::config::SkeletonConfig;
use crate::core::{CellIndex, ChunkIndex, GridCoord, WorldPoint, global_coord};
use crate::field::{DistanceCell, DistanceSource, SkeletonField};
use crate::neighbors::{NEIGHBOR_OFFSETS, neighbors_of};

/// Marks medial-axis cells in a skeleton layer.
#[derive(Clone, Debug)]
pub struct SkeletonClassifier {
    min_separation_angle: f32,
    min_distance: f32,
    generate_by_layer_neighbors: bool,
    num_neighbors_for_edge: usize,
}

impl SkeletonClassifier {
    /// Create from configuration.
    pub fn new(config: &SkeletonConfig) -> Self {
        Self {
            min_separation_angle: config.min_separation_angle,
            min_distance: config.min_distance,
            generate_by_layer_neighbors: config.generate_by_layer_neighbors,
            num_neighbors_for_edge: config.num_neighbors_for_edge,
        }
    }

    /// Classify every free cell of `esdf`, writing `is_edge` and
    /// `num_basis_points` into `layer`.
    ///
    /// Only cells that become skeleton are written, so chunks with no
    /// skeleton cells are never allocated. Returns the number of classified
    /// cells.
    pub fn classify<D: DistanceSource>(&self, esdf: &D, layer: &mut SkeletonField) -> usize {
        let basis_counts = self.basis_candidates(esdf);

        let classified = if self.generate_by_layer_neighbors {
            self.write_by_layer_neighbors(esdf, &basis_counts, layer)
        } else {
            for (coord, &count) in &basis_counts {
                mark(layer, *coord, count);
            }
            basis_counts.len()
        };

        debug!(
            "[Classifier] {} skeleton cells ({} basis candidates, neighbor mode: {})",
            classified,
            basis_counts.len(),
            self.generate_by_layer_neighbors
        );
        classified
    }

    /// Cells passing the basis separation test, with their basis counts.
    fn basis_candidates<D: DistanceSource>(&self, esdf: &D) -> HashMap<GridCoord, u32> {
        let mut candidates = HashMap::new();
        for_each_free_cell(esdf, self.min_distance, |address, cell| {
            let directions = self.basis_directions(esdf, address, cell);
            if let Some(count) = count_basis_points(&directions, self.min_separation_angle) {
                candidates.insert(address.coord, count);
            }
        });
        candidates
    }

    /// Neighbor mode: a cell is kept iff enough of its neighbors are basis
    /// candidates. Evaluated against the candidate snapshot, so the result
    /// does not depend on visiting order.
    fn write_by_layer_neighbors<D: DistanceSource>(
        &self,
        esdf: &D,
        candidates: &HashMap<GridCoord, u32>,
        layer: &mut SkeletonField,
    ) -> usize {
        let mut selected = Vec::new();
        for_each_free_cell(esdf, self.min_distance, |address, cell| {
            let coord = address.coord;
            let medial_neighbors = NEIGHBOR_OFFSETS
                .iter()
                .filter(|&&offset| candidates.contains_key(&(coord + offset)))
                .count();
            if medial_neighbors >= self.num_neighbors_for_edge {
                let count = match candidates.get(&coord) {
                    Some(&count) => count,
                    None => {
                        let directions = self.basis_directions(esdf, address, cell);
                        cluster_directions(&directions, self.min_separation_angle)
                    }
                };
                selected.push((coord, count));
            }
        });

        for &(coord, count) in &selected {
            mark(layer, coord, count);
        }
        selected.len()
    }

    /// Nearest-surface directions of the cell and its free neighbors.
    fn basis_directions<D: DistanceSource>(
        &self,
        esdf: &D,
        address: CellAddress,
        cell: DistanceCell,
    ) -> Vec<WorldPoint> {
        let mut directions = Vec::with_capacity(NEIGHBOR_OFFSETS.len() + 1);
        directions.extend(surface_direction(esdf, address.coord, cell));

        let neighbors = neighbors_of(address.chunk, address.cell, esdf.cells_per_side(), |c| {
            esdf.has_chunk(c)
        });
        for neighbor in neighbors.iter().filter(|nb| nb.exists) {
            let Some(neighbor_cell) = esdf.distance_cell(neighbor.chunk, neighbor.cell) else {
                continue;
            };
            if neighbor_cell.is_free(self.min_distance) {
                let coord = address.coord + neighbor.offset;
                directions.extend(surface_direction(esdf, coord, neighbor_cell));
            }
        }
        directions
    }
}

/// Both forms of a cell's address.
#[derive(Clone, Copy, Debug)]
struct CellAddress {
    chunk: ChunkIndex,
    cell: CellIndex,
    coord: GridCoord,
}

/// Visit observed cells with `distance > min_distance`, in ascending chunk
/// then linear-cell order.
fn for_each_free_cell<D: DistanceSource>(
    esdf: &D,
    min_distance: f32,
    mut visit: impl FnMut(CellAddress, DistanceCell),
) {
    let n = esdf.cells_per_side();
    let n_i32 = n as i32;
    for chunk in esdf.chunk_indices() {
        for z in 0..n_i32 {
            for y in 0..n_i32 {
                for x in 0..n_i32 {
                    let index = GridCoord::new(x, y, z);
                    let Some(cell) = esdf.distance_cell(chunk, index) else {
                        continue;
                    };
                    if cell.is_free(min_distance) {
                        let address = CellAddress {
                            chunk,
                            cell: index,
                            coord: global_coord(chunk, index, n),
                        };
                        visit(address, cell);
                    }
                }
            }
        }
    }
}

fn mark(layer: &mut SkeletonField, coord: GridCoord, num_basis_points: u32) {
    let cell = layer.cell_mut_or_allocate(coord);
    cell.is_edge = true;
    cell.num_basis_points = num_basis_points;
}

/// Unit direction from a cell center to its nearest surface point.
fn surface_direction<D: DistanceSource>(
    esdf: &D,
    coord: GridCoord,
    cell: DistanceCell,
) -> Option<WorldPoint> {
    let point = nearest_surface_point(esdf, coord, cell)?;
    (point - esdf.cell_center(coord)).normalized()
}

/// Nearest obstacle-surface point of a cell, in world units.
///
/// Uses the recorded parent offset when present, else a gradient estimate.
/// `None` if neither is available (flat field around the cell).
pub fn nearest_surface_point<D: DistanceSource>(
    esdf: &D,
    coord: GridCoord,
    cell: DistanceCell,
) -> Option<WorldPoint> {
    if let Some(parent) = cell.parent {
        return Some(esdf.cell_center(coord + parent));
    }
    let gradient = distance_gradient(esdf, coord, cell)?.normalized()?;
    Some(esdf.cell_center(coord) - gradient * cell.distance)
}

/// Central-difference distance gradient over observed face neighbors,
/// falling back to one-sided differences at the field boundary.
fn distance_gradient<D: DistanceSource>(
    esdf: &D,
    coord: GridCoord,
    cell: DistanceCell,
) -> Option<WorldPoint> {
    let voxel_size = esdf.voxel_size();
    let sample = |offset: GridCoord| {
        esdf.distance_at(coord + offset)
            .filter(|c| c.observed)
            .map(|c| c.distance)
    };

    let mut axes = [0.0f32; 3];
    let mut any = false;
    for axis in 0..3 {
        let minus = sample(NEIGHBOR_OFFSETS[2 * axis]);
        let plus = sample(NEIGHBOR_OFFSETS[2 * axis + 1]);
        axes[axis] = match (minus, plus) {
            (Some(m), Some(p)) => (p - m) / (2.0 * voxel_size),
            (Some(m), None) => (cell.distance - m) / voxel_size,
            (None, Some(p)) => (p - cell.distance) / voxel_size,
            (None, None) => continue,
        };
        any = true;
    }
    any.then(|| WorldPoint::new(axes[0], axes[1], axes[2]))
}

/// Angularly distinct basis points, if the cell passes the separation test.
///
/// `None` unless some pair of directions is at least `min_angle` apart.
pub fn count_basis_points(directions: &[WorldPoint], min_angle: f32) -> Option<u32> {
    let count = cluster_directions(directions, min_angle);
    (count >= 2).then_some(count)
}

/// Greedy clustering of unit directions.
///
/// Seeds with the most separated pair; every further direction opens a new
/// cluster iff it is at least `min_angle` from every existing seed. Returns
/// 0 for no directions and 1 when no pair is separated enough.
pub fn cluster_directions(directions: &[WorldPoint], min_angle: f32) -> u32 {
    if directions.is_empty() {
        return 0;
    }

    let mut best = (0, 0, 0.0f32);
    for i in 0..directions.len() {
        for j in (i + 1)..directions.len() {
            let angle = directions[i].angle_to(&directions[j]);
            if angle > best.2 {
                best = (i, j, angle);
            }
        }
    }
    let (a, b, widest) = best;
    if widest < min_angle {
        return 1;
    }

    let mut seeds = vec![directions[a], directions[b]];
    for (k, direction) in directions.iter().enumerate() {
        if k == a || k == b {
            continue;
        }
        if seeds.iter().all(|s| s.angle_to(direction) >= min_angle) {
            seeds.push(*direction);
        }
    }
    seeds.len() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DistanceField;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn dir(x: f32, y: f32, z: f32) -> WorldPoint {
        WorldPoint::new(x, y, z).normalized().unwrap()
    }

    /// Slab of free space between walls at x = -0.5 and x = `width` - 0.5,
    /// one chunk deep in y and z, with parent offsets.
    fn slab(width: i32) -> DistanceField {
        let mut field = DistanceField::new(8, 1.0);
        for x in 0..width {
            let left = x + 1;
            let right = width - x;
            let (distance, parent) = if left <= right {
                (left as f32, GridCoord::new(-left, 0, 0))
            } else {
                (right as f32, GridCoord::new(right, 0, 0))
            };
            for y in 0..8 {
                for z in 0..8 {
                    field.set_cell(GridCoord::new(x, y, z), DistanceCell::with_parent(distance, parent));
                }
            }
        }
        field
    }

    #[test]
    fn test_cluster_empty_and_single() {
        assert_eq!(cluster_directions(&[], 0.7), 0);
        assert_eq!(cluster_directions(&[dir(1.0, 0.0, 0.0)], 0.7), 1);
        assert_eq!(count_basis_points(&[dir(1.0, 0.0, 0.0)], 0.7), None);
    }

    #[test]
    fn test_cluster_opposite_pair() {
        let dirs = [dir(1.0, 0.0, 0.0), dir(-1.0, 0.0, 0.0), dir(1.0, 0.05, 0.0)];
        assert_eq!(cluster_directions(&dirs, 0.7), 2);
        assert_eq!(count_basis_points(&dirs, 0.7), Some(2));
    }

    #[test]
    fn test_cluster_three_way() {
        let dirs = [
            dir(1.0, 0.0, 0.0),
            dir((2.0 * PI / 3.0).cos(), (2.0 * PI / 3.0).sin(), 0.0),
            dir((4.0 * PI / 3.0).cos(), (4.0 * PI / 3.0).sin(), 0.0),
        ];
        assert_eq!(cluster_directions(&dirs, 0.7), 3);
    }

    #[test]
    fn test_cluster_below_threshold() {
        let dirs = [dir(1.0, 0.0, 0.0), dir(1.0, 0.3, 0.0)];
        assert_eq!(cluster_directions(&dirs, 0.7), 1);
    }

    #[test]
    fn test_gradient_estimate_without_parent() {
        let mut field = DistanceField::new(8, 1.0);
        // Distance grows along +x: surface lies in -x
        for x in 0..5 {
            field.set_cell(GridCoord::new(x, 2, 2), DistanceCell::observed(x as f32 + 1.0));
        }
        let cell = DistanceCell::observed(3.0);
        let point = nearest_surface_point(&field, GridCoord::new(2, 2, 2), cell).unwrap();
        assert_relative_eq!(point.x, -0.5, epsilon = 1e-5);
        assert_relative_eq!(point.y, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn test_parent_offset_used() {
        let field = DistanceField::new(8, 0.5);
        let cell = DistanceCell::with_parent(1.0, GridCoord::new(0, -2, 0));
        let point = nearest_surface_point(&field, GridCoord::new(1, 3, 1), cell).unwrap();
        assert_eq!(point, field.cell_center(GridCoord::new(1, 1, 1)));
    }

    #[test]
    fn test_slab_midplane_classified() {
        let field = slab(5);
        let mut layer = SkeletonField::with_layout_of(&field);
        let classifier = SkeletonClassifier::new(&SkeletonConfig::default());

        let count = classifier.classify(&field, &mut layer);
        assert!(count > 0);

        // The surface direction flips between x = 2 and x = 3; cells next to
        // the walls see one direction only
        let mid = layer.cell_at(GridCoord::new(2, 4, 4)).unwrap();
        assert!(mid.is_edge);
        assert!(mid.num_basis_points >= 2);
        assert!(layer.cell_at(GridCoord::new(3, 4, 4)).unwrap().is_edge);
        assert!(!layer.cell_at(GridCoord::new(1, 4, 4)).unwrap().is_edge);
        assert!(!layer.cell_at(GridCoord::new(0, 4, 4)).unwrap().is_edge);
        assert!(!layer.cell_at(GridCoord::new(4, 4, 4)).unwrap().is_edge);
    }

    #[test]
    fn test_empty_field_allocates_nothing() {
        let field = DistanceField::new(8, 1.0);
        let mut layer = SkeletonField::with_layout_of(&field);
        let classifier = SkeletonClassifier::new(&SkeletonConfig::default());
        assert_eq!(classifier.classify(&field, &mut layer), 0);
        assert_eq!(layer.num_chunks(), 0);
    }

    #[test]
    fn test_neighbor_mode_requires_medial_neighbors() {
        let field = slab(5);
        let config = SkeletonConfig::default()
            .with_generate_by_layer_neighbors(true)
            .with_num_neighbors_for_edge(26);
        let mut layer = SkeletonField::with_layout_of(&field);
        // No cell has all 26 neighbors on a single plane
        assert_eq!(SkeletonClassifier::new(&config).classify(&field, &mut layer), 0);

        let config = config.with_num_neighbors_for_edge(4);
        let mut layer = SkeletonField::with_layout_of(&field);
        let count = SkeletonClassifier::new(&config).classify(&field, &mut layer);
        assert!(count > 0);
        assert!(layer.cell_at(GridCoord::new(2, 4, 4)).unwrap().is_edge);
    }

    #[test]
    fn test_min_distance_excludes_cells() {
        let field = slab(5);
        let config = SkeletonConfig::default().with_min_distance(5.0);
        let mut layer = SkeletonField::with_layout_of(&field);
        assert_eq!(SkeletonClassifier::new(&config).classify(&field, &mut layer), 0);
    }
}
