//! Skeleton of a synthetic tunnel crossing.
//!
//! Builds a brute-force ESDF of two square tunnels crossing at right angles
//! (optionally with random pillars), runs the skeleton generator and prints
//! the resulting graph.
//!
//! Usage:
//!   cargo run --example tunnel_skeleton
//!   cargo run --example tunnel_skeleton -- --length 32 --pillars 4 --output graph.yaml
//!   RUST_LOG=debug cargo run --example tunnel_skeleton -- --config configs/skeleton.yaml

use std::path::PathBuf;

use clap::Parser;
use rand::prelude::*;
use vastu_skeleton::{DistanceCell, DistanceField, GridCoord, SkeletonConfig, SkeletonGenerator};

/// Tunnel crossing skeleton example
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Skeleton configuration file (defaults are used if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tunnel length in cells
    #[arg(short, long, default_value_t = 24)]
    length: i32,

    /// Half-width of the tunnel cross-section in cells
    #[arg(long, default_value_t = 3)]
    half_width: i32,

    /// Number of random pillars placed in the tunnels
    #[arg(short, long, default_value_t = 0)]
    pillars: usize,

    /// Voxel size in meters
    #[arg(long, default_value_t = 0.1)]
    voxel_size: f32,

    /// Random seed for pillar placement
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write the sparse graph as YAML
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Obstacle test for two tunnels crossing at the middle of the map.
fn crossing(length: i32, half_width: i32, pillars: &[GridCoord]) -> impl Fn(GridCoord) -> bool {
    let center = length / 2;
    let pillars = pillars.to_vec();
    move |c: GridCoord| {
        let in_x_tunnel = (c.y - center).abs() < half_width;
        let in_y_tunnel = (c.x - center).abs() < half_width;
        let in_height = c.z.abs() < half_width;
        let pillar = pillars.iter().any(|p| p.x == c.x && p.y == c.y);
        !(in_height && (in_x_tunnel || in_y_tunnel)) || pillar
    }
}

/// Brute-force ESDF with parent offsets over `[0, length)² × [-h, h]`.
fn build_esdf(args: &Args, is_obstacle: impl Fn(GridCoord) -> bool) -> DistanceField {
    let h = args.half_width;
    let mut cells = Vec::new();
    for x in 0..args.length {
        for y in 0..args.length {
            for z in -h..=h {
                cells.push(GridCoord::new(x, y, z));
            }
        }
    }
    let near_free = |coord: GridCoord| {
        (-1..=1).any(|dx| {
            (-1..=1).any(|dy| (-1..=1).any(|dz| !is_obstacle(coord + GridCoord::new(dx, dy, dz))))
        })
    };
    // Only obstacle cells bordering free space can be nearest to a free cell
    let surface: Vec<GridCoord> = cells
        .iter()
        .copied()
        .filter(|&c| is_obstacle(c) && near_free(c))
        .collect();

    let mut field = DistanceField::new(8, args.voxel_size);
    for &coord in &cells {
        if is_obstacle(coord) {
            if near_free(coord) {
                field.set_cell(coord, DistanceCell::observed(-0.5 * args.voxel_size));
            }
            continue;
        }
        let nearest = surface
            .iter()
            .map(|&o| o - coord)
            .min_by_key(|d| d.x * d.x + d.y * d.y + d.z * d.z);
        if let Some(parent) = nearest {
            let d2 = (parent.x * parent.x + parent.y * parent.y + parent.z * parent.z) as f32;
            field.set_cell(coord, DistanceCell::with_parent(d2.sqrt() * args.voxel_size, parent));
        }
    }
    field
}

fn random_pillars(args: &Args) -> Vec<GridCoord> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let center = args.length / 2;
    (0..args.pillars)
        .map(|_| {
            let along = rng.gen_range(0..args.length);
            let across = center + rng.gen_range(-(args.half_width - 1)..args.half_width);
            if rng.gen_bool(0.5) {
                GridCoord::new(along, across, 0)
            } else {
                GridCoord::new(across, along, 0)
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SkeletonConfig::load(path)?,
        None => SkeletonConfig::default(),
    };

    let pillars = random_pillars(&args);
    log::info!(
        "Building {}x{} crossing, half-width {}, {} pillars",
        args.length,
        args.length,
        args.half_width,
        pillars.len()
    );
    let esdf = build_esdf(&args, crossing(args.length, args.half_width, &pillars));

    let mut generator = SkeletonGenerator::new(&esdf, config)?;
    let stats = generator.run();

    println!("Classified cells: {}", stats.classified_cells);
    println!("Thinned cells:    {}", stats.thinned_cells);
    println!("Pruned edges:     {}", stats.pruned_edges);
    println!("Demoted vertices: {}", stats.demoted_vertices);
    println!("Graph: {} vertices, {} edges", stats.num_vertices, stats.num_edges);

    let graph = generator.sparse_graph();
    for vertex in graph.vertices() {
        println!(
            "  v{:<4} {:?} at ({:.2}, {:.2}, {:.2}) d={:.2} degree={}",
            vertex.id,
            vertex.kind,
            vertex.position.x,
            vertex.position.y,
            vertex.position.z,
            vertex.distance,
            graph.degree(vertex.id)
        );
    }
    for edge in graph.edges() {
        println!(
            "  e{:<4} v{} -> v{} cells={} d=[{:.2}, {:.2}]",
            edge.id,
            edge.vertex_a_id,
            edge.vertex_b_id,
            edge.cells.len(),
            edge.min_distance,
            edge.max_distance
        );
    }

    if let Err(e) = graph.check_consistency() {
        log::warn!("Graph inconsistency: {}", e);
    }

    if let Some(path) = &args.output {
        std::fs::write(path, serde_yaml::to_string(graph)?)?;
        log::info!("Graph written to {}", path.display());
    }

    Ok(())
}
