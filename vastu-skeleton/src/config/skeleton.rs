//! Skeleton generator settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::defaults;
use super::error::ConfigError;

/// Skeleton generation settings loaded from YAML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkeletonConfig {
    /// Minimum angle (radians) between two nearest-surface directions for a
    /// cell to lie on the medial axis
    #[serde(default = "defaults::min_separation_angle")]
    pub min_separation_angle: f32,

    /// Classify by the number of neighboring medial-axis cells instead of by
    /// basis-point separation. Also detects junctions by branch count alone.
    #[serde(default = "defaults::generate_by_layer_neighbors")]
    pub generate_by_layer_neighbors: bool,

    /// Medial-axis neighbors required in neighbor mode
    #[serde(default = "defaults::num_neighbors_for_edge")]
    pub num_neighbors_for_edge: usize,

    /// Vertices closer than this (field units) to a stronger vertex are
    /// demoted
    #[serde(default = "defaults::vertex_pruning_radius")]
    pub vertex_pruning_radius: f32,

    /// Cells with distance at or below this are never skeleton
    #[serde(default = "defaults::min_distance")]
    pub min_distance: f32,

    /// Thin the classified cells to one-cell width before graph building
    #[serde(default = "defaults::thin_skeleton")]
    pub thin_skeleton: bool,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            min_separation_angle: defaults::min_separation_angle(),
            generate_by_layer_neighbors: defaults::generate_by_layer_neighbors(),
            num_neighbors_for_edge: defaults::num_neighbors_for_edge(),
            vertex_pruning_radius: defaults::vertex_pruning_radius(),
            min_distance: defaults::min_distance(),
            thin_skeleton: defaults::thin_skeleton(),
        }
    }
}

impl SkeletonConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/skeleton.yaml)
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new("configs/skeleton.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_separation_angle.is_finite()
            || self.min_separation_angle <= 0.0
            || self.min_separation_angle > std::f32::consts::PI
        {
            return Err(ConfigError::Invalid(format!(
                "min_separation_angle must be in (0, pi], got {}",
                self.min_separation_angle
            )));
        }
        if !(1..=26).contains(&self.num_neighbors_for_edge) {
            return Err(ConfigError::Invalid(format!(
                "num_neighbors_for_edge must be in 1..=26, got {}",
                self.num_neighbors_for_edge
            )));
        }
        if !self.vertex_pruning_radius.is_finite() || self.vertex_pruning_radius < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "vertex_pruning_radius must be non-negative, got {}",
                self.vertex_pruning_radius
            )));
        }
        if !self.min_distance.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "min_distance must be finite, got {}",
                self.min_distance
            )));
        }
        Ok(())
    }

    // === Builder ===

    /// Set the basis separation angle (radians)
    pub fn with_min_separation_angle(mut self, angle: f32) -> Self {
        self.min_separation_angle = angle;
        self
    }

    /// Enable or disable neighbor-count classification
    pub fn with_generate_by_layer_neighbors(mut self, enabled: bool) -> Self {
        self.generate_by_layer_neighbors = enabled;
        self
    }

    /// Set the neighbor-mode threshold
    pub fn with_num_neighbors_for_edge(mut self, count: usize) -> Self {
        self.num_neighbors_for_edge = count;
        self
    }

    /// Set the vertex suppression radius
    pub fn with_vertex_pruning_radius(mut self, radius: f32) -> Self {
        self.vertex_pruning_radius = radius;
        self
    }

    /// Set the minimum free-space distance
    pub fn with_min_distance(mut self, distance: f32) -> Self {
        self.min_distance = distance;
        self
    }

    /// Enable or disable thinning
    pub fn with_thin_skeleton(mut self, enabled: bool) -> Self {
        self.thin_skeleton = enabled;
        self
    }
}
