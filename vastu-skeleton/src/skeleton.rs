//! Flat point-list view of the skeleton layer.

use serde::{Deserialize, Serialize};

use crate::core::WorldPoint;
use crate::field::{DistanceSource, SkeletonField};

/// One skeleton cell, flattened for consumers that do not need the graph.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkeletonPoint {
    /// Cell center
    pub point: WorldPoint,
    /// Distance-field value at the cell
    pub distance: f32,
    /// Angularly distinct nearest-surface points
    pub num_basis_points: u32,
    /// Whether a graph vertex sits on this cell
    pub is_vertex: bool,
}

/// All skeleton cells, in ascending chunk then linear-cell order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Skeleton {
    points: Vec<SkeletonPoint>,
}

impl Skeleton {
    /// Empty skeleton.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the skeleton layer and the distance field.
    pub fn from_layer<D: DistanceSource>(layer: &SkeletonField, esdf: &D) -> Self {
        let points = layer
            .iter_cells()
            .filter(|(_, cell)| cell.is_skeleton())
            .map(|(coord, cell)| SkeletonPoint {
                point: esdf.cell_center(coord),
                distance: esdf.distance_at(coord).map_or(0.0, |c| c.distance),
                num_basis_points: cell.num_basis_points,
                is_vertex: cell.vertex_id.is_some(),
            })
            .collect();
        Self { points }
    }

    /// All points.
    pub fn points(&self) -> &[SkeletonPoint] {
        &self.points
    }

    /// Points carrying a vertex.
    pub fn vertices(&self) -> impl Iterator<Item = &SkeletonPoint> {
        self.points.iter().filter(|p| p.is_vertex)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
