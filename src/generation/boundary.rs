//! Cell boundaries from half-edges
//!
//! Cells list their edges in no particular order, and each edge is stored
//! once with a fixed direction. The functions here orient every half-edge
//! from the owning site's side and chain them into one closed loop, and
//! enumerate each undirected edge once for border drawing.

use glam::Vec2;
use std::collections::HashMap;

use crate::error::{Result, TerrainError};
use crate::generation::voronoi::Diagram;

fn malformed(cell: usize, reason: impl Into<String>) -> TerrainError {
    TerrainError::MalformedCell {
        cell,
        reason: reason.into(),
    }
}

/// Directed `(start, end)` vertex pair of an edge as seen from `site`'s cell
///
/// The left site walks the edge as stored, the right site walks it reversed.
///
/// # Errors
///
/// Returns `MalformedCell` if the edge does not touch `site`.
pub fn directed_half_edge(diagram: &Diagram, site: usize, edge_index: usize) -> Result<(usize, usize)> {
    let edge = diagram
        .edges()
        .get(edge_index)
        .ok_or_else(|| malformed(site, format!("missing edge {}", edge_index)))?;

    if edge.left == Some(site) {
        Ok((edge.start, edge.end))
    } else if edge.right == Some(site) {
        Ok((edge.end, edge.start))
    } else {
        Err(malformed(site, format!("edge {} does not border this cell", edge_index)))
    }
}

/// Ordered vertex indices around a cell
///
/// The loop starts at the smallest vertex index so the result does not depend
/// on the order the half-edges were listed in.
///
/// # Errors
///
/// Returns `MalformedCell` for fewer than three half-edges, a vertex with two
/// outgoing half-edges, or half-edges that do not form one closed loop.
pub fn cell_boundary_indices(diagram: &Diagram, site: usize) -> Result<Vec<usize>> {
    let cell = diagram
        .cell(site)
        .ok_or(TerrainError::CellNotFound(site))?;

    if cell.half_edges.len() < 3 {
        return Err(malformed(
            site,
            format!("only {} boundary edges", cell.half_edges.len()),
        ));
    }

    let mut next: HashMap<usize, usize> = HashMap::with_capacity(cell.half_edges.len());
    for &e in &cell.half_edges {
        let (start, end) = directed_half_edge(diagram, site, e)?;
        if next.insert(start, end).is_some() {
            return Err(malformed(site, format!("vertex {} starts two half-edges", start)));
        }
    }

    let first = next.keys().copied().min().unwrap_or_default();
    let mut ordered = Vec::with_capacity(next.len());
    let mut current = first;
    loop {
        ordered.push(current);
        current = *next
            .get(&current)
            .ok_or_else(|| malformed(site, format!("boundary breaks at vertex {}", current)))?;
        if current == first {
            break;
        }
        if ordered.len() > next.len() {
            return Err(malformed(site, "boundary does not close"));
        }
    }

    if ordered.len() != next.len() {
        return Err(malformed(
            site,
            format!("{} of {} half-edges form the loop", ordered.len(), next.len()),
        ));
    }

    Ok(ordered)
}

/// Ordered boundary positions of a cell
pub fn cell_boundary(diagram: &Diagram, site: usize) -> Result<Vec<Vec2>> {
    let vertices = diagram.vertices();
    Ok(cell_boundary_indices(diagram, site)?
        .into_iter()
        .map(|v| vertices[v])
        .collect())
}

/// Sites across each edge of a cell, sorted, without the region boundary
pub fn cell_neighbors(diagram: &Diagram, site: usize) -> Vec<usize> {
    let mut neighbors: Vec<usize> = diagram
        .cell(site)
        .map(|cell| {
            cell.half_edges
                .iter()
                .filter_map(|&e| diagram.edges().get(e)?.other_side(site))
                .collect()
        })
        .unwrap_or_default();
    neighbors.sort_unstable();
    neighbors.dedup();
    neighbors
}

/// Every undirected edge of the diagram exactly once
///
/// # Errors
///
/// Returns `MalformedEdge` for an edge with neither a left nor a right site.
pub fn border_edges(diagram: &Diagram) -> Result<Vec<[Vec2; 2]>> {
    diagram
        .edges()
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            if edge.left.is_none() && edge.right.is_none() {
                return Err(TerrainError::MalformedEdge(i));
            }
            let (a, b) = diagram.edge_endpoints(edge);
            Ok([a, b])
        })
        .collect()
}

/// Arithmetic mean of a boundary's vertices
///
/// `None` for an empty boundary.
pub fn vertex_centroid(boundary: &[Vec2]) -> Option<Vec2> {
    if boundary.is_empty() {
        return None;
    }
    let sum: Vec2 = boundary.iter().copied().sum();
    Some(sum / boundary.len() as f32)
}
