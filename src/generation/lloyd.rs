//! Lloyd's Relaxation for even site spacing
//!
//! Each pass tessellates the current sites and moves every site to the
//! centroid of its cell's boundary vertices. One pass already removes the
//! clumping of uniform random points; more passes approach a centroidal
//! tessellation.

use glam::Vec2;
use std::time::Instant;

use crate::error::{Result, TerrainError};
use crate::generation::boundary::{cell_boundary, vertex_centroid};
use crate::generation::voronoi::{Diagram, Tessellator};

/// Options for Lloyd's relaxation algorithm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LloydOptions {
    /// Maximum number of passes to run
    pub max_iterations: usize,
    /// Stop when the largest site displacement of a pass is below this
    /// distance. 0.0 disables early termination.
    pub convergence_threshold: f32,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1,
            convergence_threshold: 0.0,
        }
    }
}

/// Apply `iterations` passes of Lloyd's relaxation
///
/// # Arguments
///
/// * `points` - Initial sites
/// * `tessellator` - Oracle used to build each pass's diagram
/// * `iterations` - Number of passes (1 is the usual choice)
///
/// # Errors
///
/// Propagates tessellation errors, and returns `MalformedCell` if a cell has
/// no usable boundary.
pub fn lloyd_relaxation<T>(points: Vec<Vec2>, tessellator: &T, iterations: usize) -> Result<Vec<Vec2>>
where
    T: Tessellator + ?Sized,
{
    let options = LloydOptions {
        max_iterations: iterations,
        ..Default::default()
    };
    lloyd_relaxation_with_options(points, tessellator, options)
}

/// Apply Lloyd's relaxation with custom options
pub fn lloyd_relaxation_with_options<T>(
    mut points: Vec<Vec2>,
    tessellator: &T,
    options: LloydOptions,
) -> Result<Vec<Vec2>>
where
    T: Tessellator + ?Sized,
{
    if points.is_empty() {
        return Ok(points);
    }

    let total_start = Instant::now();
    let mut iterations_run = 0;
    let mut converged = false;

    for iteration in 0..options.max_iterations {
        let iter_start = Instant::now();

        let diagram = tessellator.tessellate(&points)?;
        let (new_points, max_displacement) = compute_new_points(&diagram, &points)?;

        points = new_points;
        iterations_run = iteration + 1;

        log::debug!(
            "lloyd pass {}: {} sites, max_disp={:.5}, took {:?}",
            iteration + 1,
            points.len(),
            max_displacement,
            iter_start.elapsed()
        );

        if options.convergence_threshold > 0.0 && max_displacement < options.convergence_threshold {
            converged = true;
            break;
        }
    }

    log::debug!(
        "lloyd finished: {} of max {} passes, converged={}, total={:?}",
        iterations_run,
        options.max_iterations,
        converged,
        total_start.elapsed()
    );

    Ok(points)
}

/// Centroid of every cell and the largest distance a site moved
fn compute_new_points(diagram: &Diagram, old: &[Vec2]) -> Result<(Vec<Vec2>, f32)> {
    let mut max_displacement: f32 = 0.0;
    let mut new_points = Vec::with_capacity(old.len());

    for (site, &old_pos) in old.iter().enumerate() {
        let boundary = cell_boundary(diagram, site)?;
        let centroid = vertex_centroid(&boundary).ok_or_else(|| TerrainError::MalformedCell {
            cell: site,
            reason: "empty boundary".to_string(),
        })?;

        max_displacement = max_displacement.max(centroid.distance(old_pos));
        new_points.push(centroid);
    }

    Ok((new_points, max_displacement))
}
