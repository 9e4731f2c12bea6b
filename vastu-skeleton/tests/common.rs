//! Test fixtures for the skeleton pipeline.
//!
//! Distance fields are computed by brute force over an explicit obstacle
//! set, with parent offsets, so classification sees exact nearest-surface
//! directions.

#![allow(dead_code)]

use vastu_skeleton::{DistanceCell, DistanceField, GridCoord, SkeletonCell, SkeletonField};

/// Cells of the axis-aligned box `[min, max]`, inclusive, in `(x, y, z)` order.
pub fn box_cells(min: GridCoord, max: GridCoord) -> Vec<GridCoord> {
    let mut cells = Vec::new();
    for x in min.x..=max.x {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                cells.push(GridCoord::new(x, y, z));
            }
        }
    }
    cells
}

/// Brute-force ESDF over the box `[min, max]`.
///
/// Obstacle cells get a negative distance. Every other cell gets the
/// center-to-center distance to its nearest obstacle cell, ties going to
/// the first obstacle in `(x, y, z)` order.
pub fn brute_force_esdf(
    cells_per_side: usize,
    voxel_size: f32,
    min: GridCoord,
    max: GridCoord,
    is_obstacle: impl Fn(GridCoord) -> bool,
) -> DistanceField {
    let cells = box_cells(min, max);
    let obstacles: Vec<GridCoord> = cells.iter().copied().filter(|&c| is_obstacle(c)).collect();

    let mut field = DistanceField::new(cells_per_side, voxel_size);
    for &coord in &cells {
        if is_obstacle(coord) {
            field.set_cell(coord, DistanceCell::observed(-0.5 * voxel_size));
            continue;
        }
        let mut best: Option<(i32, GridCoord)> = None;
        for &obstacle in &obstacles {
            let d = obstacle - coord;
            let d2 = d.x * d.x + d.y * d.y + d.z * d.z;
            if best.is_none_or(|(b, _)| d2 < b) {
                best = Some((d2, d));
            }
        }
        let cell = match best {
            Some((d2, parent)) => DistanceCell::with_parent((d2 as f32).sqrt() * voxel_size, parent),
            None => DistanceCell::observed(f32::MAX),
        };
        field.set_cell(coord, cell);
    }
    field
}

/// Flat channel along x and y between walls at `z = -3` and `z = 4`.
///
/// Free cells span `z = -2..=3`, so the medial sheet is the two planes
/// `z = 0` and `z = 1`, each with a unique nearest wall.
pub fn channel(nx: i32, ny: i32) -> DistanceField {
    brute_force_esdf(
        8,
        0.1,
        GridCoord::new(0, 0, -3),
        GridCoord::new(nx - 1, ny - 1, 4),
        |c| c.z == -3 || c.z == 4,
    )
}

/// Square tunnel along x with walls at `|y| == half_width` or
/// `|z| == half_width`.
pub fn tunnel(length: i32, half_width: i32) -> DistanceField {
    brute_force_esdf(
        8,
        0.1,
        GridCoord::new(0, -half_width, -half_width),
        GridCoord::new(length - 1, half_width, half_width),
        |c| c.y.abs() == half_width || c.z.abs() == half_width,
    )
}

/// Distance field and skeleton layer with `cells` pre-classified as
/// skeleton, distances given by `distance`.
pub fn skeleton_fixture(
    cells: &[GridCoord],
    distance: impl Fn(GridCoord) -> f32,
) -> (DistanceField, SkeletonField) {
    let mut esdf = DistanceField::new(8, 1.0);
    let mut layer = SkeletonField::with_layout_of(&esdf);
    for &coord in cells {
        esdf.set_cell(coord, DistanceCell::observed(distance(coord)));
        layer.set_cell(
            coord,
            SkeletonCell {
                is_edge: true,
                num_basis_points: 2,
                ..Default::default()
            },
        );
    }
    (esdf, layer)
}

/// Shorthand for a list of coordinates.
pub fn coords(list: &[(i32, i32, i32)]) -> Vec<GridCoord> {
    list.iter().map(|&(x, y, z)| GridCoord::new(x, y, z)).collect()
}
