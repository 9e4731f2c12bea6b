//! Cell types stored in the distance and skeleton fields.

use serde::{Deserialize, Serialize};

use crate::core::GridCoord;

/// One cell of the Euclidean signed distance field.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct DistanceCell {
    /// Signed distance to the nearest obstacle surface (positive in free space)
    pub distance: f32,
    /// Whether the distance value was ever observed
    pub observed: bool,
    /// Offset, in cells, from this cell to the cell holding its nearest
    /// obstacle surface. `None` when the integrator did not record it.
    pub parent: Option<GridCoord>,
}

impl DistanceCell {
    /// Observed cell with a distance and no parent information
    pub fn observed(distance: f32) -> Self {
        Self {
            distance,
            observed: true,
            parent: None,
        }
    }

    /// Observed cell with a known nearest-surface offset
    pub fn with_parent(distance: f32, parent: GridCoord) -> Self {
        Self {
            distance,
            observed: true,
            parent: Some(parent),
        }
    }

    /// Observed and strictly farther from obstacles than `min_distance`
    #[inline]
    pub fn is_free(&self, min_distance: f32) -> bool {
        self.observed && self.distance > min_distance
    }
}

/// Per-cell skeleton metadata, stored in a field parallel to the ESDF.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkeletonCell {
    /// Cell lies on the discretized medial axis
    pub is_edge: bool,
    /// Graph vertex placed at this cell, if any
    pub vertex_id: Option<i64>,
    /// Graph edge whose traced path claimed this cell, if any
    pub edge_id: Option<i64>,
    /// Number of angularly distinct nearest-surface points
    pub num_basis_points: u32,
}

impl SkeletonCell {
    /// True if the cell belongs to the skeleton at all (edge or vertex)
    #[inline]
    pub fn is_skeleton(&self) -> bool {
        self.is_edge || self.vertex_id.is_some()
    }

    /// True if this is a plain edge cell not yet claimed by a traced edge
    #[inline]
    pub fn is_unconsumed_edge(&self) -> bool {
        self.is_edge && self.vertex_id.is_none() && self.edge_id.is_none()
    }

    /// Drop all graph assignments, keeping the classification.
    #[inline]
    pub fn clear_graph_marks(&mut self) {
        self.vertex_id = None;
        self.edge_id = None;
    }

    /// Remove the cell from the skeleton entirely.
    #[inline]
    pub fn clear(&mut self) {
        self.is_edge = false;
        self.vertex_id = None;
        self.edge_id = None;
    }
}
