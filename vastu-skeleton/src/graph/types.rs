//! Sparse skeleton graph.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::{GridCoord, WorldPoint};

use super::error::GraphError;

/// Vertex identifier, assigned from 0 upwards.
pub type VertexId = i64;

/// Edge identifier, assigned from 0 upwards.
pub type EdgeId = i64;

/// Why a cell became a vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// Terminates a branch
    EndPoint,
    /// Three or more branches meet
    Junction,
    /// No skeleton neighbors at all
    Isolated,
}

/// A graph vertex, anchored at one skeleton cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkeletonVertex {
    /// Unique id
    pub id: VertexId,
    /// Cell center
    pub position: WorldPoint,
    /// Global cell coordinate
    pub coord: GridCoord,
    /// Distance-field value at the cell (free-space "thickness")
    pub distance: f32,
    /// Detection rule that produced the vertex
    pub kind: VertexKind,
}

/// A graph edge summarizing one traced skeleton path.
///
/// A dead-end edge, whose trace never reached a second vertex, has
/// `vertex_b_id == vertex_a_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkeletonEdge {
    /// Unique id
    pub id: EdgeId,
    /// Start vertex
    pub vertex_a_id: VertexId,
    /// End vertex (equal to `vertex_a_id` for a dead end)
    pub vertex_b_id: VertexId,
    /// Minimum distance over both ends and every interior cell
    pub min_distance: f32,
    /// Maximum distance over both ends and every interior cell
    pub max_distance: f32,
    /// Distance at the start vertex
    pub start_distance: f32,
    /// Distance at the far end
    pub end_distance: f32,
    /// Position of the start vertex
    pub start_point: WorldPoint,
    /// Position of the far end
    pub end_point: WorldPoint,
    /// Interior cells in trace order (vertices excluded)
    pub cells: Vec<GridCoord>,
}

impl SkeletonEdge {
    /// Edge with no interior cells between two vertices; the id is assigned
    /// by [`SparseSkeletonGraph::add_edge`].
    pub fn between(a: &SkeletonVertex, b: &SkeletonVertex) -> Self {
        Self {
            id: -1,
            vertex_a_id: a.id,
            vertex_b_id: b.id,
            min_distance: a.distance.min(b.distance),
            max_distance: a.distance.max(b.distance),
            start_distance: a.distance,
            end_distance: b.distance,
            start_point: a.position,
            end_point: b.position,
            cells: Vec::new(),
        }
    }

    /// Dead-end edge starting at `a`, not yet extended.
    pub fn dead_end(a: &SkeletonVertex) -> Self {
        Self::between(a, a)
    }

    /// Append an interior cell.
    pub fn push_cell(&mut self, coord: GridCoord, distance: f32) {
        self.cells.push(coord);
        self.include_distance(distance);
    }

    /// Fold a distance into the min/max statistics.
    pub fn include_distance(&mut self, distance: f32) {
        self.min_distance = self.min_distance.min(distance);
        self.max_distance = self.max_distance.max(distance);
    }

    /// True for a dead-end marker.
    #[inline]
    pub fn is_dead_end(&self) -> bool {
        self.vertex_a_id == self.vertex_b_id
    }

    /// Whether `vertex` is one of the endpoints.
    #[inline]
    pub fn touches(&self, vertex: VertexId) -> bool {
        self.vertex_a_id == vertex || self.vertex_b_id == vertex
    }

    /// The endpoint opposite to `vertex`.
    pub fn other_end(&self, vertex: VertexId) -> Option<VertexId> {
        if self.vertex_a_id == vertex {
            Some(self.vertex_b_id)
        } else if self.vertex_b_id == vertex {
            Some(self.vertex_a_id)
        } else {
            None
        }
    }
}

/// Vertices, edges and adjacency, all keyed by id in ascending order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SparseSkeletonGraph {
    vertices: BTreeMap<VertexId, SkeletonVertex>,
    edges: BTreeMap<EdgeId, SkeletonEdge>,
    adjacency: BTreeMap<VertexId, BTreeSet<EdgeId>>,
    next_vertex_id: VertexId,
    next_edge_id: EdgeId,
}

impl SparseSkeletonGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // === Vertices ===

    /// Insert a vertex and return its id.
    pub fn add_vertex(
        &mut self,
        position: WorldPoint,
        coord: GridCoord,
        distance: f32,
        kind: VertexKind,
    ) -> VertexId {
        let id = self.next_vertex_id;
        self.next_vertex_id += 1;
        self.vertices.insert(
            id,
            SkeletonVertex {
                id,
                position,
                coord,
                distance,
                kind,
            },
        );
        self.adjacency.insert(id, BTreeSet::new());
        id
    }

    /// Remove a vertex together with every incident edge.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<SkeletonVertex> {
        let vertex = self.vertices.remove(&id)?;
        let incident = self.adjacency.remove(&id).unwrap_or_default();
        for edge_id in incident {
            self.remove_edge(edge_id);
        }
        Some(vertex)
    }

    /// Vertex by id.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> Option<&SkeletonVertex> {
        self.vertices.get(&id)
    }

    /// Mutable vertex by id.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut SkeletonVertex> {
        self.vertices.get_mut(&id)
    }

    /// Whether the vertex exists.
    #[inline]
    pub fn has_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// Vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = &SkeletonVertex> {
        self.vertices.values()
    }

    /// Vertex ids, ascending.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    // === Edges ===

    /// Insert an edge, assigning its id.
    ///
    /// Returns `None` (and inserts nothing) if either endpoint is missing.
    pub fn add_edge(&mut self, mut edge: SkeletonEdge) -> Option<EdgeId> {
        if !self.has_vertex(edge.vertex_a_id) || !self.has_vertex(edge.vertex_b_id) {
            return None;
        }
        let id = self.next_edge_id;
        self.next_edge_id += 1;
        edge.id = id;

        self.link(edge.vertex_a_id, id);
        self.link(edge.vertex_b_id, id);
        self.edges.insert(id, edge);
        Some(id)
    }

    /// Remove an edge.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<SkeletonEdge> {
        let edge = self.edges.remove(&id)?;
        self.unlink(edge.vertex_a_id, id);
        self.unlink(edge.vertex_b_id, id);
        Some(edge)
    }

    /// Move the `from` endpoint(s) of an edge to `to`, keeping the edge's
    /// endpoint positions and distances in step.
    ///
    /// Returns false if the edge, `to`, or an endpoint equal to `from` is
    /// missing.
    pub fn reattach_edge(&mut self, id: EdgeId, from: VertexId, to: VertexId) -> bool {
        let Some(target) = self.vertices.get(&to).cloned() else {
            return false;
        };
        let Some(edge) = self.edges.get_mut(&id) else {
            return false;
        };
        if !edge.touches(from) {
            return false;
        }

        if edge.vertex_a_id == from {
            edge.vertex_a_id = to;
            edge.start_point = target.position;
            edge.start_distance = target.distance;
        }
        if edge.vertex_b_id == from {
            edge.vertex_b_id = to;
            edge.end_point = target.position;
            edge.end_distance = target.distance;
        }
        edge.include_distance(target.distance);

        self.unlink(from, id);
        self.link(to, id);
        true
    }

    /// Edge by id.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&SkeletonEdge> {
        self.edges.get(&id)
    }

    /// Mutable edge by id. Endpoint ids must not be changed through this
    /// handle; use [`reattach_edge`](Self::reattach_edge).
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut SkeletonEdge> {
        self.edges.get_mut(&id)
    }

    /// Edges in ascending id order.
    pub fn edges(&self) -> impl Iterator<Item = &SkeletonEdge> {
        self.edges.values()
    }

    /// Edge ids, ascending.
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Ids of edges incident to a vertex, ascending.
    pub fn edges_of(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.adjacency
            .get(&vertex)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of incident edges (a dead-end marker counts once).
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.adjacency.get(&vertex).map_or(0, BTreeSet::len)
    }

    // === Whole graph ===

    /// True if there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Remove everything and restart id assignment.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Connected components as sorted vertex-id lists, ordered by their
    /// smallest id.
    pub fn connected_components(&self) -> Vec<Vec<VertexId>> {
        let mut seen = BTreeSet::new();
        let mut components = Vec::new();

        for &start in self.vertices.keys() {
            if !seen.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut stack = vec![start];
            while let Some(v) = stack.pop() {
                for edge_id in self.adjacency.get(&v).into_iter().flatten() {
                    let Some(other) = self.edges.get(edge_id).and_then(|e| e.other_end(v)) else {
                        continue;
                    };
                    if seen.insert(other) {
                        component.push(other);
                        stack.push(other);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        components
    }

    /// Verify the structural invariants.
    ///
    /// Every edge endpoint exists, the adjacency lists agree with the edges,
    /// and no interior cell is claimed by two edges.
    pub fn check_consistency(&self) -> Result<(), GraphError> {
        let mut claimed: BTreeMap<GridCoord, EdgeId> = BTreeMap::new();
        for edge in self.edges.values() {
            for vertex in [edge.vertex_a_id, edge.vertex_b_id] {
                if !self.has_vertex(vertex) {
                    return Err(GraphError::MissingEndpoint {
                        edge: edge.id,
                        vertex,
                    });
                }
                if !self.adjacency.get(&vertex).is_some_and(|s| s.contains(&edge.id)) {
                    return Err(GraphError::AdjacencyMismatch {
                        edge: edge.id,
                        vertex,
                    });
                }
            }
            for &cell in &edge.cells {
                if let Some(previous) = claimed.insert(cell, edge.id) {
                    return Err(GraphError::SharedCell {
                        cell,
                        first: previous,
                        second: edge.id,
                    });
                }
            }
        }
        for (&vertex, incident) in &self.adjacency {
            for &edge_id in incident {
                let touches = self.edges.get(&edge_id).is_some_and(|e| e.touches(vertex));
                if !touches {
                    return Err(GraphError::AdjacencyMismatch {
                        edge: edge_id,
                        vertex,
                    });
                }
            }
        }
        Ok(())
    }

    fn link(&mut self, vertex: VertexId, edge: EdgeId) {
        self.adjacency.entry(vertex).or_default().insert(edge);
    }

    fn unlink(&mut self, vertex: VertexId, edge: EdgeId) {
        if let Some(set) = self.adjacency.get_mut(&vertex) {
            set.remove(&edge);
        }
    }
}
