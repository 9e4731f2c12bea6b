//! Configuration for the skeleton generator.
//!
//! Loaded from a single YAML file; every key is optional and falls back to
//! the defaults below.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vastu_skeleton::config::SkeletonConfig;
//!
//! // Load from default path (configs/skeleton.yaml), or defaults if absent
//! let config = SkeletonConfig::load_default()?;
//!
//! // Or build in code
//! let config = SkeletonConfig::default()
//!     .with_min_separation_angle(0.8)
//!     .with_vertex_pruning_radius(0.3);
//! ```
//!
//! ## Keys
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `min_separation_angle` | 0.7 | Basis-direction separation (radians) |
//! | `generate_by_layer_neighbors` | false | Classify by skeleton-neighbor count |
//! | `num_neighbors_for_edge` | 3 | Neighbor-mode threshold (1..=26) |
//! | `vertex_pruning_radius` | 0.25 | Vertex suppression radius (field units) |
//! | `min_distance` | 0.0 | Cells at or below this distance are never skeleton |
//! | `thin_skeleton` | true | Thin to one-cell width before building the graph |
//!
//! ## Example YAML
//!
//! ```yaml
//! min_separation_angle: 0.7
//! generate_by_layer_neighbors: false
//! vertex_pruning_radius: 0.25
//! ```

mod defaults;
mod error;
mod skeleton;

pub use error::ConfigError;
pub use skeleton::SkeletonConfig;
