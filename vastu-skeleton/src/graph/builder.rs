//! Sparse graph construction from a classified skeleton layer.
//!
//! ## Stages
//!
//! 1. **Reset**: drop vertex/edge marks from any earlier build
//! 2. **Thinning** (optional): peel simple, non-end border cells in six
//!    directional sub-iterations until nothing changes
//! 3. **Vertices**: end points, junctions and isolated cells, in ascending
//!    chunk then linear-cell order
//! 4. **Edges**: from each vertex (ascending id) walk every unconsumed
//!    skeleton path until it reaches another vertex or runs out
//! 5. **Stitching**: leftover cells join a neighboring edge, and cells of
//!    different graph components that touch get a direct edge between
//!    their nearest vertices
//!
//! Each traced cell is stamped with the id of the edge that claimed it, so
//! no cell belongs to two edges. A 26-connected piece of skeleton holding
//! at least one vertex always ends up as one connected graph component.
//!
//! ## Junction rule
//!
//! | Mode | Junction iff |
//! |------|--------------|
//! | basis (default) | not simple and three or more branches |
//! | layer neighbors | three or more branches |

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::config::SkeletonConfig;
use crate::core::GridCoord;
use crate::field::{DistanceSource, SkeletonField};
use crate::neighbors::{NEIGHBOR_OFFSETS, NUM_FACE_NEIGHBORS};
use crate::topology::{Occupancy, count_branches, is_end_point, is_simple_point};

use super::types::{EdgeId, SkeletonEdge, SkeletonVertex, SparseSkeletonGraph, VertexId, VertexKind};

/// Output of [`GraphBuilder::build`].
#[derive(Clone, Debug, Default)]
pub struct BuildResult {
    /// The constructed graph
    pub graph: SparseSkeletonGraph,
    /// Cells removed by thinning
    pub thinned_cells: usize,
}

/// Builds a [`SparseSkeletonGraph`] from a skeleton layer.
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    thin_skeleton: bool,
    by_layer_neighbors: bool,
}

impl GraphBuilder {
    /// Create from configuration.
    pub fn new(config: &SkeletonConfig) -> Self {
        Self {
            thin_skeleton: config.thin_skeleton,
            by_layer_neighbors: config.generate_by_layer_neighbors,
        }
    }

    /// Build the graph, marking vertex and edge ids in `layer`.
    ///
    /// `esdf` supplies cell positions and distances. An empty layer yields an
    /// empty graph.
    pub fn build<D: DistanceSource>(&self, layer: &mut SkeletonField, esdf: &D) -> BuildResult {
        layer.for_each_cell_mut(|_, cell| cell.clear_graph_marks());

        let thinned_cells = if self.thin_skeleton { thin(layer) } else { 0 };

        let mut graph = SparseSkeletonGraph::new();
        self.detect_vertices(layer, esdf, &mut graph);
        follow_edges(layer, esdf, &mut graph);
        let absorbed = absorb_leftover_cells(layer, esdf, &mut graph);
        let bridges = connect_touching_components(layer, &mut graph);

        debug!(
            "[GraphBuilder] {} vertices, {} edges ({} cells thinned, {} absorbed, {} bridges)",
            graph.num_vertices(),
            graph.num_edges(),
            thinned_cells,
            absorbed,
            bridges
        );

        BuildResult {
            graph,
            thinned_cells,
        }
    }

    fn vertex_kind(&self, occ: Occupancy) -> Option<VertexKind> {
        if occ.count_neighbors() == 0 {
            return Some(VertexKind::Isolated);
        }
        if is_end_point(occ) {
            return Some(VertexKind::EndPoint);
        }
        let branching = count_branches(occ) >= 3;
        let junction = if self.by_layer_neighbors {
            branching
        } else {
            branching && !is_simple_point(occ)
        };
        junction.then_some(VertexKind::Junction)
    }

    fn detect_vertices<D: DistanceSource>(
        &self,
        layer: &mut SkeletonField,
        esdf: &D,
        graph: &mut SparseSkeletonGraph,
    ) {
        for coord in skeleton_cells(layer) {
            let Some(kind) = self.vertex_kind(skeleton_occupancy(layer, coord)) else {
                continue;
            };
            let id = graph.add_vertex(esdf.cell_center(coord), coord, distance_at(esdf, coord), kind);
            if let Some(cell) = layer.cell_at_mut(coord) {
                cell.vertex_id = Some(id);
            }
        }
    }
}

/// Occupancy of the skeleton around `coord`, center included.
///
/// Cells in absent chunks count as empty.
pub fn skeleton_occupancy(layer: &SkeletonField, coord: GridCoord) -> Occupancy {
    Occupancy::from_fn(|offset| {
        offset.is_zero() || is_skeleton(layer, coord + offset)
    })
}

#[inline]
fn is_skeleton(layer: &SkeletonField, coord: GridCoord) -> bool {
    layer.cell_at(coord).is_some_and(|c| c.is_skeleton())
}

/// Skeleton cells in ascending chunk then linear-cell order.
fn skeleton_cells(layer: &SkeletonField) -> Vec<GridCoord> {
    layer
        .iter_cells()
        .filter(|(_, cell)| cell.is_skeleton())
        .map(|(coord, _)| coord)
        .collect()
}

fn distance_at<D: DistanceSource>(esdf: &D, coord: GridCoord) -> f32 {
    esdf.distance_at(coord).map_or(0.0, |c| c.distance)
}

/// Directional thinning. Returns the number of removed cells.
fn thin(layer: &mut SkeletonField) -> usize {
    let mut total = 0;
    loop {
        let mut removed = 0;
        for direction in 0..NUM_FACE_NEIGHBORS {
            let offset = NEIGHBOR_OFFSETS[direction];
            let border: Vec<GridCoord> = skeleton_cells(layer)
                .into_iter()
                .filter(|&c| !is_skeleton(layer, c + offset))
                .collect();

            for coord in border {
                // Earlier removals in this sub-iteration may have changed it
                let occ = skeleton_occupancy(layer, coord);
                if is_simple_point(occ) && !is_end_point(occ) {
                    if let Some(cell) = layer.cell_at_mut(coord) {
                        cell.is_edge = false;
                    }
                    removed += 1;
                }
            }
        }
        if removed == 0 {
            return total;
        }
        total += removed;
    }
}

fn follow_edges<D: DistanceSource>(
    layer: &mut SkeletonField,
    esdf: &D,
    graph: &mut SparseSkeletonGraph,
) {
    for vertex_id in graph.vertex_ids() {
        let Some(start) = graph.vertex(vertex_id).cloned() else {
            continue;
        };

        for offset in NEIGHBOR_OFFSETS {
            let neighbor = start.coord + offset;
            let Some(cell) = layer.cell_at(neighbor).copied() else {
                continue;
            };

            if let Some(other) = cell.vertex_id {
                // Adjacent vertices: the lower id creates the edge
                if other > vertex_id
                    && let Some(end) = graph.vertex(other)
                {
                    let edge = SkeletonEdge::between(&start, end);
                    graph.add_edge(edge);
                }
                continue;
            }

            if cell.is_unconsumed_edge() {
                let edge = trace_edge(layer, esdf, graph, &start, neighbor);
                let cells = edge.cells.clone();
                if let Some(edge_id) = graph.add_edge(edge) {
                    stamp(layer, &cells, edge_id);
                }
            }
        }
    }
}

fn stamp(layer: &mut SkeletonField, cells: &[GridCoord], edge_id: EdgeId) {
    for &coord in cells {
        if let Some(cell) = layer.cell_at_mut(coord) {
            cell.edge_id = Some(edge_id);
        }
    }
}

/// Walk from `first` (an unconsumed cell next to `start`) until another
/// vertex is reached or no unconsumed cell remains.
///
/// A vertex that also touches `start` (the rest of a thick junction) only
/// ends the walk once the path cannot continue.
fn trace_edge<D: DistanceSource>(
    layer: &SkeletonField,
    esdf: &D,
    graph: &SparseSkeletonGraph,
    start: &SkeletonVertex,
    first: GridCoord,
) -> SkeletonEdge {
    let mut edge = SkeletonEdge::dead_end(start);
    let mut visited = HashSet::new();
    let mut current = first;

    let end_vertex: Option<VertexId> = loop {
        visited.insert(current);
        edge.push_cell(current, distance_at(esdf, current));

        let mut cluster_vertex = None;
        let mut reached = None;
        for offset in NEIGHBOR_OFFSETS {
            let Some(v) = layer.cell_at(current + offset).and_then(|c| c.vertex_id) else {
                continue;
            };
            if v == start.id {
                continue;
            }
            let near_start = graph
                .vertex(v)
                .is_some_and(|vertex| vertex.coord.chebyshev_distance(&start.coord) <= 1);
            if !near_start {
                reached = Some(v);
                break;
            }
            if cluster_vertex.is_none() {
                cluster_vertex = Some(v);
            }
        }
        if reached.is_some() {
            break reached;
        }

        let next = NEIGHBOR_OFFSETS.iter().map(|&o| current + o).find(|c| {
            !visited.contains(c) && layer.cell_at(*c).is_some_and(|cell| cell.is_unconsumed_edge())
        });
        match next {
            Some(coord) => current = coord,
            None => break cluster_vertex,
        }
    };

    match end_vertex.and_then(|v| graph.vertex(v)) {
        Some(end) => {
            edge.vertex_b_id = end.id;
            edge.end_point = end.position;
            edge.end_distance = end.distance;
            edge.include_distance(end.distance);
        }
        None => {
            // Dead end: the far end is the last traced cell
            edge.end_point = esdf.cell_center(current);
            edge.end_distance = distance_at(esdf, current);
        }
    }
    edge
}

/// Hand unclaimed skeleton cells that touch a traced edge to that edge,
/// breadth first. Returns the number of absorbed cells.
///
/// Such cells are the sides of paths thicker than one cell. Cells of a
/// piece with no vertex stay unclaimed.
fn absorb_leftover_cells<D: DistanceSource>(
    layer: &mut SkeletonField,
    esdf: &D,
    graph: &mut SparseSkeletonGraph,
) -> usize {
    let mut queue: VecDeque<(GridCoord, EdgeId)> = layer
        .iter_cells()
        .filter_map(|(coord, cell)| cell.edge_id.map(|id| (coord, id)))
        .collect();

    let mut absorbed = 0;
    while let Some((coord, edge_id)) = queue.pop_front() {
        for offset in NEIGHBOR_OFFSETS {
            let neighbor = coord + offset;
            let Some(cell) = layer.cell_at_mut(neighbor) else {
                continue;
            };
            if !cell.is_unconsumed_edge() {
                continue;
            }
            cell.edge_id = Some(edge_id);
            if let Some(edge) = graph.edge_mut(edge_id) {
                edge.push_cell(neighbor, distance_at(esdf, neighbor));
            }
            queue.push_back((neighbor, edge_id));
            absorbed += 1;
        }
    }
    absorbed
}

/// Join graph components whose cells touch in the layer. Returns the
/// number of bridge edges added.
///
/// The bridge runs between the vertices owning the two touching cells; an
/// edge cell is owned by whichever end of its edge is nearer.
fn connect_touching_components(layer: &SkeletonField, graph: &mut SparseSkeletonGraph) -> usize {
    let mut label: HashMap<VertexId, usize> = HashMap::new();
    for (index, component) in graph.connected_components().into_iter().enumerate() {
        for v in component {
            label.insert(v, index);
        }
    }
    if label.len() < 2 {
        return 0;
    }

    let mut bridges = 0;
    for coord in skeleton_cells(layer) {
        let Some(owner) = owning_vertex(layer, graph, coord) else {
            continue;
        };
        for offset in NEIGHBOR_OFFSETS {
            let Some(other) = owning_vertex(layer, graph, coord + offset) else {
                continue;
            };
            let (Some(&a), Some(&b)) = (label.get(&owner), label.get(&other)) else {
                continue;
            };
            if a == b {
                continue;
            }
            let (Some(from), Some(to)) = (graph.vertex(owner), graph.vertex(other)) else {
                continue;
            };
            let edge = SkeletonEdge::between(from, to);
            if graph.add_edge(edge).is_some() {
                for l in label.values_mut() {
                    if *l == b {
                        *l = a;
                    }
                }
                bridges += 1;
            }
        }
    }
    bridges
}

fn owning_vertex(
    layer: &SkeletonField,
    graph: &SparseSkeletonGraph,
    coord: GridCoord,
) -> Option<VertexId> {
    let cell = layer.cell_at(coord)?;
    if let Some(v) = cell.vertex_id {
        return Some(v);
    }
    let edge = graph.edge(cell.edge_id?)?;
    let gap = |v: VertexId| {
        graph.vertex(v).map_or(i32::MAX, |vertex| {
            let d = vertex.coord - coord;
            d.x * d.x + d.y * d.y + d.z * d.z
        })
    };
    if gap(edge.vertex_b_id) < gap(edge.vertex_a_id) {
        Some(edge.vertex_b_id)
    } else {
        Some(edge.vertex_a_id)
    }
}
