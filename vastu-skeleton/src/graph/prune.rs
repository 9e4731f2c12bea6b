//! Graph pruning: template-matched spur removal and vertex suppression.

use std::collections::BTreeSet;

use log::debug;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::config::SkeletonConfig;
use crate::field::SkeletonField;
use crate::template::TemplateMatcher;

use super::builder::skeleton_occupancy;
use super::types::{EdgeId, SkeletonEdge, SparseSkeletonGraph, VertexId, VertexKind};

/// A vertex position for R-tree storage.
#[derive(Clone, Copy, Debug)]
struct IndexedVertex {
    position: [f32; 3],
    id: VertexId,
}

impl RTreeObject for IndexedVertex {
    type Envelope = AABB<[f32; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedVertex {
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        let dz = self.position[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// A spur: an edge hanging off a branching vertex with one free end.
#[derive(Clone, Copy, Debug)]
struct Spur {
    /// Leaf vertex at the free end; `None` for a dead-end trace
    free_vertex: Option<VertexId>,
}

/// Removes spurious structure from a built graph.
#[derive(Clone, Debug)]
pub struct Pruner {
    matcher: TemplateMatcher,
    vertex_pruning_radius: f32,
}

impl Pruner {
    /// Pruner with the default spur-tip templates.
    pub fn new(config: &SkeletonConfig) -> Self {
        Self::with_matcher(config, TemplateMatcher::pruning_templates())
    }

    /// Pruner with a custom template set.
    pub fn with_matcher(config: &SkeletonConfig, matcher: TemplateMatcher) -> Self {
        Self {
            matcher,
            vertex_pruning_radius: config.vertex_pruning_radius,
        }
    }

    /// Templates used by [`prune_diagram_edges`](Self::prune_diagram_edges).
    pub fn matcher(&self) -> &TemplateMatcher {
        &self.matcher
    }

    /// Remove template-matched spurs. Returns the number of removed edges.
    ///
    /// One pass over the edges in ascending id order. An edge is a candidate
    /// when it has a free end (a leaf end-point vertex or a dead-end tail)
    /// and the vertex at its other end has degree 3 or more. It is removed
    /// when the skeleton occupancy of every interior cell and of the leaf
    /// vertex cell matches a template. Removal clears those cells from
    /// `layer` and deletes the leaf vertex.
    ///
    /// The default tip templates only fit cells with a single neighbor, so
    /// they remove spurs made of the leaf alone: a leaf touching its
    /// branching vertex, or a dead end of one tip cell. Interior cells of a
    /// longer spur have two or more neighbors; prune those by adding body
    /// templates through [`with_matcher`](Self::with_matcher).
    pub fn prune_diagram_edges(
        &self,
        graph: &mut SparseSkeletonGraph,
        layer: &mut SkeletonField,
    ) -> usize {
        let mut removed = 0;

        for edge_id in graph.edge_ids() {
            let Some(edge) = graph.edge(edge_id) else {
                continue;
            };
            let Some(spur) = spur_of(graph, edge) else {
                continue;
            };

            let mut tested = edge.cells.clone();
            if let Some(leaf) = spur.free_vertex.and_then(|v| graph.vertex(v)) {
                tested.push(leaf.coord);
            }
            if tested.is_empty() {
                continue;
            }
            let all_match = tested
                .iter()
                .all(|&coord| self.matcher.matches(skeleton_occupancy(layer, coord)));
            if !all_match {
                continue;
            }

            for coord in tested {
                if let Some(cell) = layer.cell_at_mut(coord) {
                    cell.clear();
                }
            }
            graph.remove_edge(edge_id);
            if let Some(leaf) = spur.free_vertex {
                graph.remove_vertex(leaf);
            }
            removed += 1;
        }

        debug!("[Pruner] removed {} spur edges", removed);
        removed
    }

    /// Merge vertices closer than the pruning radius into the strongest one.
    ///
    /// Vertices are visited by descending distance (ties: ascending id); each
    /// one still alive demotes every live vertex within the radius. A demoted
    /// vertex's cell stays an edge cell. Its edges move to the survivor,
    /// except edges that would join the survivor to itself, which are
    /// dropped. Returns the number of demoted vertices.
    pub fn prune_diagram_vertices(
        &self,
        graph: &mut SparseSkeletonGraph,
        layer: &mut SkeletonField,
    ) -> usize {
        let mut order: Vec<(f32, VertexId)> = graph.vertices().map(|v| (v.distance, v.id)).collect();
        order.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

        let tree = RTree::bulk_load(
            graph
                .vertices()
                .map(|v| IndexedVertex {
                    position: v.position.to_array(),
                    id: v.id,
                })
                .collect(),
        );
        let radius_2 = self.vertex_pruning_radius * self.vertex_pruning_radius;

        let mut demoted: BTreeSet<VertexId> = BTreeSet::new();
        let mut survivors: BTreeSet<VertexId> = BTreeSet::new();

        for (_, survivor_id) in order {
            if demoted.contains(&survivor_id) {
                continue;
            }
            survivors.insert(survivor_id);
            let Some(survivor) = graph.vertex(survivor_id) else {
                continue;
            };

            let nearby: BTreeSet<VertexId> = tree
                .locate_within_distance(survivor.position.to_array(), radius_2)
                .map(|iv| iv.id)
                .filter(|id| !survivors.contains(id) && !demoted.contains(id))
                .collect();

            for victim in nearby {
                merge_into(graph, layer, victim, survivor_id);
                demoted.insert(victim);
            }
        }

        debug!(
            "[Pruner] demoted {} vertices, {} remain",
            demoted.len(),
            graph.num_vertices()
        );
        demoted.len()
    }
}

/// Detect the free end of a spur.
fn spur_of(graph: &SparseSkeletonGraph, edge: &SkeletonEdge) -> Option<Spur> {
    let branching = |v: VertexId| graph.degree(v) >= 3;
    let leaf = |v: VertexId| {
        graph.degree(v) == 1
            && graph
                .vertex(v)
                .is_some_and(|vertex| vertex.kind == VertexKind::EndPoint)
    };

    if edge.is_dead_end() {
        return branching(edge.vertex_a_id).then_some(Spur { free_vertex: None });
    }
    if leaf(edge.vertex_b_id) && branching(edge.vertex_a_id) {
        return Some(Spur {
            free_vertex: Some(edge.vertex_b_id),
        });
    }
    if leaf(edge.vertex_a_id) && branching(edge.vertex_b_id) {
        return Some(Spur {
            free_vertex: Some(edge.vertex_a_id),
        });
    }
    None
}

/// Demote `victim`, handing its edges to `survivor`.
fn merge_into(
    graph: &mut SparseSkeletonGraph,
    layer: &mut SkeletonField,
    victim: VertexId,
    survivor: VertexId,
) {
    let Some(victim_vertex) = graph.vertex(victim).cloned() else {
        return;
    };

    for edge_id in graph.edges_of(victim) {
        let Some(edge) = graph.edge(edge_id) else {
            continue;
        };
        let collapses = !edge.is_dead_end() && edge.other_end(victim) == Some(survivor);
        if collapses {
            drop_edge(graph, layer, edge_id);
            continue;
        }
        graph.reattach_edge(edge_id, victim, survivor);
        if let Some(edge) = graph.edge_mut(edge_id) {
            edge.include_distance(victim_vertex.distance);
        }
    }

    graph.remove_vertex(victim);
    if let Some(cell) = layer.cell_at_mut(victim_vertex.coord) {
        cell.vertex_id = None;
        cell.is_edge = true;
    }
}

fn drop_edge(graph: &mut SparseSkeletonGraph, layer: &mut SkeletonField, edge_id: EdgeId) {
    if let Some(edge) = graph.remove_edge(edge_id) {
        for coord in edge.cells {
            if let Some(cell) = layer.cell_at_mut(coord) {
                cell.edge_id = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GridCoord, WorldPoint};
    use crate::field::SkeletonCell;

    fn config(radius: f32) -> SkeletonConfig {
        SkeletonConfig::default().with_vertex_pruning_radius(radius)
    }

    fn add(graph: &mut SparseSkeletonGraph, x: f32, distance: f32) -> VertexId {
        graph.add_vertex(
            WorldPoint::new(x, 0.0, 0.0),
            GridCoord::new((x * 10.0) as i32, 0, 0),
            distance,
            VertexKind::Junction,
        )
    }

    fn connect(graph: &mut SparseSkeletonGraph, a: VertexId, b: VertexId) -> EdgeId {
        let edge = SkeletonEdge::between(graph.vertex(a).unwrap(), graph.vertex(b).unwrap());
        graph.add_edge(edge).unwrap()
    }

    #[test]
    fn test_two_close_vertices_merge() {
        let mut graph = SparseSkeletonGraph::new();
        let mut layer = SkeletonField::new(8, 0.1);
        let weak = add(&mut graph, 0.0, 1.0);
        let strong = add(&mut graph, 0.1, 2.0);

        let demoted = Pruner::new(&config(1.0)).prune_diagram_vertices(&mut graph, &mut layer);
        assert_eq!(demoted, 1);
        assert_eq!(graph.num_vertices(), 1);
        assert!(graph.has_vertex(strong));
        assert!(!graph.has_vertex(weak));
    }

    #[test]
    fn test_tie_keeps_smallest_id() {
        let mut graph = SparseSkeletonGraph::new();
        let mut layer = SkeletonField::new(8, 0.1);
        let first = add(&mut graph, 0.0, 1.0);
        add(&mut graph, 0.1, 1.0);

        Pruner::new(&config(1.0)).prune_diagram_vertices(&mut graph, &mut layer);
        assert_eq!(graph.vertex_ids(), vec![first]);
    }

    #[test]
    fn test_far_vertices_untouched() {
        let mut graph = SparseSkeletonGraph::new();
        let mut layer = SkeletonField::new(8, 0.1);
        add(&mut graph, 0.0, 1.0);
        add(&mut graph, 5.0, 2.0);

        let demoted = Pruner::new(&config(1.0)).prune_diagram_vertices(&mut graph, &mut layer);
        assert_eq!(demoted, 0);
        assert_eq!(graph.num_vertices(), 2);
    }

    #[test]
    fn test_edges_reattached_and_self_loops_dropped() {
        let mut graph = SparseSkeletonGraph::new();
        let mut layer = SkeletonField::new(8, 0.1);
        let far = add(&mut graph, 5.0, 0.5);
        let strong = add(&mut graph, 0.0, 3.0);
        let weak = add(&mut graph, 0.2, 1.0);

        let between = connect(&mut graph, strong, weak);
        let outer = connect(&mut graph, weak, far);
        graph.edge_mut(between).unwrap().cells.push(GridCoord::new(1, 0, 0));
        layer.set_cell(
            GridCoord::new(1, 0, 0),
            SkeletonCell {
                is_edge: true,
                edge_id: Some(between),
                ..Default::default()
            },
        );
        layer.set_cell(
            GridCoord::new(2, 0, 0),
            SkeletonCell {
                is_edge: true,
                vertex_id: Some(weak),
                ..Default::default()
            },
        );

        let demoted = Pruner::new(&config(0.5)).prune_diagram_vertices(&mut graph, &mut layer);
        assert_eq!(demoted, 1);

        // strong-weak collapsed to a self-loop: dropped, cell released
        assert!(graph.edge(between).is_none());
        assert_eq!(layer.cell_at(GridCoord::new(1, 0, 0)).unwrap().edge_id, None);

        // weak-far now runs strong-far
        let edge = graph.edge(outer).unwrap();
        assert!(edge.touches(strong) && edge.touches(far));
        assert_eq!(edge.max_distance, 3.0);

        // Demoted cell rejoins as a plain edge cell
        let cell = layer.cell_at(GridCoord::new(2, 0, 0)).unwrap();
        assert!(cell.is_edge);
        assert_eq!(cell.vertex_id, None);
        assert!(graph.check_consistency().is_ok());
    }

    #[test]
    fn test_dead_end_marker_moves() {
        let mut graph = SparseSkeletonGraph::new();
        let mut layer = SkeletonField::new(8, 0.1);
        let strong = add(&mut graph, 0.0, 3.0);
        let weak = add(&mut graph, 0.1, 1.0);
        let tail = SkeletonEdge::dead_end(graph.vertex(weak).unwrap());
        let marker = graph.add_edge(tail).unwrap();

        Pruner::new(&config(0.5)).prune_diagram_vertices(&mut graph, &mut layer);
        let edge = graph.edge(marker).unwrap();
        assert!(edge.is_dead_end());
        assert_eq!(edge.vertex_a_id, strong);
    }

    #[test]
    fn test_zero_radius_keeps_everything() {
        let mut graph = SparseSkeletonGraph::new();
        let mut layer = SkeletonField::new(8, 0.1);
        add(&mut graph, 0.0, 1.0);
        add(&mut graph, 0.1, 2.0);
        let demoted = Pruner::new(&config(0.0)).prune_diagram_vertices(&mut graph, &mut layer);
        assert_eq!(demoted, 0);
    }

    #[test]
    fn test_empty_matcher_prunes_nothing() {
        let mut graph = SparseSkeletonGraph::new();
        let mut layer = SkeletonField::new(8, 0.1);
        let hub = add(&mut graph, 0.0, 1.0);
        for i in 1..=3 {
            let leaf = graph.add_vertex(
                WorldPoint::new(i as f32, 0.0, 0.0),
                GridCoord::new(i, 0, 0),
                1.0,
                VertexKind::EndPoint,
            );
            connect(&mut graph, hub, leaf);
        }
        let pruner = Pruner::with_matcher(&config(0.0), TemplateMatcher::new());
        assert_eq!(pruner.prune_diagram_edges(&mut graph, &mut layer), 0);
        assert_eq!(graph.num_edges(), 3);
    }
}
