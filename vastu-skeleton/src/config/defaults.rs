//! Default value functions for serde deserialization.

pub fn min_separation_angle() -> f32 {
    0.7
}

pub fn generate_by_layer_neighbors() -> bool {
    false
}

pub fn num_neighbors_for_edge() -> usize {
    3
}

pub fn vertex_pruning_radius() -> f32 {
    0.25
}

pub fn min_distance() -> f32 {
    0.0
}

pub fn thin_skeleton() -> bool {
    true
}
