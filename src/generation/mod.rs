//! Site placement and tessellation
//!
//! Generates random sites, relaxes them with Lloyd's algorithm and builds the
//! bounded Voronoi diagram the mesh is made from.

pub mod boundary;
mod delaunay;
mod lloyd;
mod sites;
mod voronoi;

pub use boundary::{border_edges, cell_boundary, cell_boundary_indices, cell_neighbors, directed_half_edge, vertex_centroid};
pub use lloyd::{lloyd_relaxation, lloyd_relaxation_with_options, LloydOptions};
pub use sites::generate_sites;
pub use voronoi::{BoundedVoronoi, Diagram, DiagramCell, DiagramEdge, Site, Tessellator};

use glam::Vec2;

use crate::config::TerrainConfig;
use crate::error::Result;

/// Random sites for a configuration, relaxed as configured
///
/// The convergence threshold is a fraction of the region's larger side.
pub fn relaxed_sites<T>(config: &TerrainConfig, tessellator: &T) -> Result<Vec<Vec2>>
where
    T: Tessellator + ?Sized,
{
    // Step 1: Uniform random sites
    let points = generate_sites(config.site_count, &config.bounds, config.seed);

    // Step 2: Lloyd passes
    if config.lloyd_iterations == 0 {
        return Ok(points);
    }
    let options = LloydOptions {
        max_iterations: config.lloyd_iterations,
        convergence_threshold: config.lloyd_convergence * config.bounds.size().max_element(),
    };
    lloyd_relaxation_with_options(points, tessellator, options)
}

/// Generate the final diagram for a configuration
pub fn generate_diagram<T>(config: &TerrainConfig, tessellator: &T) -> Result<Diagram>
where
    T: Tessellator + ?Sized,
{
    let points = relaxed_sites(config, tessellator)?;
    tessellator.tessellate(&points)
}
