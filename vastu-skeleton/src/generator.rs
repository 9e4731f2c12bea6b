//! Skeleton generation front-end.
//!
//! [`SkeletonGenerator`] owns the skeleton layer, the sparse graph and the
//! flat skeleton view for one distance field, and runs the stages in order:
//!
//! ```rust,ignore
//! use vastu_skeleton::{SkeletonConfig, SkeletonGenerator};
//!
//! let mut generator = SkeletonGenerator::new(&esdf, SkeletonConfig::default())?;
//! let stats = generator.run();
//! for edge in generator.sparse_graph().edges() {
//!     println!("{} -> {}", edge.vertex_a_id, edge.vertex_b_id);
//! }
//! ```
//!
//! The stages can also be called one at a time; each call rebuilds what it
//! produces from the previous stage's output.

use std::time::Instant;

use log::{debug, info};
use serde::Serialize;

use crate::classify::SkeletonClassifier;
use crate::config::{ConfigError, SkeletonConfig};
use crate::field::{DistanceSource, SkeletonField};
use crate::graph::{GraphBuilder, Pruner, SparseSkeletonGraph};
use crate::skeleton::Skeleton;
use crate::template::TemplateMatcher;

/// Per-stage counts of a [`SkeletonGenerator::run`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SkeletonStats {
    /// Cells marked by the classifier
    pub classified_cells: usize,
    /// Cells removed by thinning
    pub thinned_cells: usize,
    /// Spur edges removed by template pruning
    pub pruned_edges: usize,
    /// Vertices demoted by radius suppression
    pub demoted_vertices: usize,
    /// Vertices in the final graph
    pub num_vertices: usize,
    /// Edges in the final graph
    pub num_edges: usize,
}

/// Extracts a sparse skeleton graph from a distance field.
pub struct SkeletonGenerator<'a, D: DistanceSource> {
    esdf: &'a D,
    config: SkeletonConfig,
    classifier: SkeletonClassifier,
    builder: GraphBuilder,
    pruner: Pruner,
    skeleton_layer: SkeletonField,
    graph: SparseSkeletonGraph,
    skeleton: Skeleton,
}

impl<'a, D: DistanceSource> SkeletonGenerator<'a, D> {
    /// Create a generator for `esdf`.
    ///
    /// Fails if the configuration does not validate.
    pub fn new(esdf: &'a D, config: SkeletonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            esdf,
            classifier: SkeletonClassifier::new(&config),
            builder: GraphBuilder::new(&config),
            pruner: Pruner::new(&config),
            skeleton_layer: empty_layer(esdf),
            graph: SparseSkeletonGraph::new(),
            skeleton: Skeleton::new(),
            config,
        })
    }

    /// Replace the spur-pruning templates.
    pub fn with_pruning_templates(mut self, matcher: TemplateMatcher) -> Self {
        self.pruner = Pruner::with_matcher(&self.config, matcher);
        self
    }

    // === Stages ===

    /// Classify medial-axis cells into a fresh skeleton layer.
    ///
    /// Discards any previous graph. Returns the number of classified cells.
    pub fn generate_skeleton(&mut self) -> usize {
        self.skeleton_layer = empty_layer(self.esdf);
        self.graph.clear();

        let classified = self.classifier.classify(self.esdf, &mut self.skeleton_layer);
        self.refresh_skeleton();
        classified
    }

    /// Build the sparse graph from the current skeleton layer.
    ///
    /// Returns the number of cells removed by thinning.
    pub fn generate_sparse_graph(&mut self) -> usize {
        let result = self.builder.build(&mut self.skeleton_layer, self.esdf);
        self.graph = result.graph;
        self.refresh_skeleton();
        result.thinned_cells
    }

    /// Remove template-matched spur edges. Returns the removed count.
    pub fn prune_diagram_edges(&mut self) -> usize {
        let removed = self
            .pruner
            .prune_diagram_edges(&mut self.graph, &mut self.skeleton_layer);
        self.refresh_skeleton();
        removed
    }

    /// Merge vertices within the pruning radius. Returns the demoted count.
    pub fn prune_diagram_vertices(&mut self) -> usize {
        let demoted = self
            .pruner
            .prune_diagram_vertices(&mut self.graph, &mut self.skeleton_layer);
        self.refresh_skeleton();
        demoted
    }

    /// Run every stage in order.
    pub fn run(&mut self) -> SkeletonStats {
        let start = Instant::now();

        let classified_cells = self.generate_skeleton();
        let thinned_cells = self.generate_sparse_graph();
        let pruned_edges = self.prune_diagram_edges();
        let demoted_vertices = self.prune_diagram_vertices();

        let stats = SkeletonStats {
            classified_cells,
            thinned_cells,
            pruned_edges,
            demoted_vertices,
            num_vertices: self.graph.num_vertices(),
            num_edges: self.graph.num_edges(),
        };

        debug!("[Skeleton] {:?}", stats);
        info!(
            "[Skeleton] {} vertices, {} edges from {} cells in {:.1}ms",
            stats.num_vertices,
            stats.num_edges,
            stats.classified_cells,
            start.elapsed().as_secs_f64() * 1000.0
        );
        stats
    }

    fn refresh_skeleton(&mut self) {
        self.skeleton = Skeleton::from_layer(&self.skeleton_layer, self.esdf);
    }

    // === Accessors ===

    /// Flat skeleton points.
    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Skeleton layer parallel to the distance field.
    pub fn skeleton_layer(&self) -> &SkeletonField {
        &self.skeleton_layer
    }

    /// The sparse graph.
    pub fn sparse_graph(&self) -> &SparseSkeletonGraph {
        &self.graph
    }

    /// Mutable sparse graph.
    pub fn sparse_graph_mut(&mut self) -> &mut SparseSkeletonGraph {
        &mut self.graph
    }

    /// Active configuration.
    pub fn config(&self) -> &SkeletonConfig {
        &self.config
    }

    /// Basis separation threshold (radians).
    pub fn min_separation_angle(&self) -> f32 {
        self.config.min_separation_angle
    }

    /// Whether neighbor-count classification is on.
    pub fn generate_by_layer_neighbors(&self) -> bool {
        self.config.generate_by_layer_neighbors
    }

    /// Neighbor-mode threshold.
    pub fn num_neighbors_for_edge(&self) -> usize {
        self.config.num_neighbors_for_edge
    }

    /// Vertex suppression radius.
    pub fn vertex_pruning_radius(&self) -> f32 {
        self.config.vertex_pruning_radius
    }
}

fn empty_layer<D: DistanceSource>(esdf: &D) -> SkeletonField {
    SkeletonField::new(esdf.cells_per_side(), esdf.voxel_size())
}
