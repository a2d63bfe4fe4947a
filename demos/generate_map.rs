//! Example: Generate a Voronoi island map
//!
//! Demonstrates the generation pipeline, debug render modes and region
//! highlighting. Run with `RUST_LOG=debug` to see relaxation and build timings.

use voronoi_terrain::*;

fn main() {
    env_logger::init();

    println!("Voronoi Terrain Generation Example");
    println!("==================================\n");

    let config = TerrainConfigBuilder::new()
        .seed(42)
        .site_count(2000)
        .lloyd_iterations(2)
        .unwrap()
        .build()
        .unwrap();

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Sites: {}", config.site_count);
    println!("  Lloyd Iterations: {}", config.lloyd_iterations);
    println!("  Elevation Scale: {}", config.elevation_scale);
    println!("  Sea Floor: {:.3}", config.sea_floor());
    println!();

    println!("Generating map...");
    let mut map = VoronoiMap::generate(config).expect("Failed to generate map");
    let surface = map.surface();
    println!(
        "Generated {} cells, {} vertices, {} triangles\n",
        map.cell_count(),
        surface.vertex_count(),
        surface.face_count()
    );

    // Land and biome statistics
    let water = map.cells().iter().filter(|c| c.is_water()).count();
    let peak = map.cells().iter().map(|c| c.height).fold(0.0_f32, f32::max);
    let avg_neighbors =
        map.cells().iter().map(|c| c.neighbor_count()).sum::<usize>() as f32 / map.cell_count().max(1) as f32;

    println!("Statistics:");
    println!("  Water cells: {} ({:.1}%)", water, 100.0 * water as f32 / map.cell_count().max(1) as f32);
    println!("  Highest cell: {:.3}", peak);
    println!("  Average neighbors per cell: {:.2}", avg_neighbors);
    println!();

    println!("Sample cells:");
    for cell in map.cells().iter().take(5) {
        let sample = map.classifier().sample(cell.height, cell.site.x, cell.site.y);
        println!(
            "  Cell {}: site=({:.2}, {:.2}), height={:.3}, biome={:?}, neighbors={}",
            cell.id,
            cell.site.x,
            cell.site.y,
            cell.height,
            map.classifier().biome(sample),
            cell.neighbor_count()
        );
    }

    // Flood the region around the center
    let region = map.highlight_at(0.5, 0.5, 0.15).expect("Failed to highlight");
    println!("\nHighlighted {} cells around the center", region.len());

    map.set_render_mode(RenderMode::Humidity);
    map.set_flat(true);
    println!("Switched to {:?} view, flat = {}", map.render_mode(), map.is_flat());

    println!("\nGeneration complete!");
}
