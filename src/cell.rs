//! Terrain Cell Structure
//!
//! Represents one Voronoi cell of the built terrain: its site, derived height
//! and color, neighbor connectivity and the surface faces it owns.

use glam::Vec2;
use std::ops::Range;

use crate::mesh::TerrainColor;

/// A single cell of the terrain mesh
///
/// Cells live in an arena indexed by site index. The derived fields (`height`,
/// `color`) are written by the terrain builder and afterwards only by
/// recoloring or region highlighting.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainCell {
    /// Site index of this cell
    pub id: usize,

    /// Planar site position
    pub site: Vec2,

    /// Elevation at the site, 0 for water
    pub height: f32,

    /// Color shared by all faces of the cell
    pub color: TerrainColor,

    /// Cells across each of this cell's edges (sorted)
    ///
    /// The region boundary contributes no neighbor.
    pub neighbors: Vec<usize>,

    /// Range of face indices in the surface buffer belonging to this cell
    pub faces: Range<usize>,

    /// Range of surface vertices belonging to this cell
    pub vertices: Range<usize>,
}

impl TerrainCell {
    /// Create a new cell
    ///
    /// This is typically called by the terrain builder, not by user code.
    pub fn new(
        id: usize,
        site: Vec2,
        height: f32,
        color: TerrainColor,
        neighbors: Vec<usize>,
        faces: Range<usize>,
        vertices: Range<usize>,
    ) -> Self {
        Self {
            id,
            site,
            height,
            color,
            neighbors,
            faces,
            vertices,
        }
    }

    /// Get the number of neighboring cells
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if this cell is a neighbor of another cell
    #[inline]
    pub fn is_neighbor_of(&self, other_cell_id: usize) -> bool {
        self.neighbors.binary_search(&other_cell_id).is_ok()
    }

    /// Number of surface triangles of this cell
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check whether the cell is below sea level
    #[inline]
    pub fn is_water(&self) -> bool {
        self.height <= 0.0
    }

    /// Straight-line distance between the two sites
    #[inline]
    pub fn distance_to(&self, other: &TerrainCell) -> f32 {
        self.site.distance(other.site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_creation() {
        let cell = TerrainCell::new(0, Vec2::new(0.5, 0.5), 0.1, [1.0; 4], vec![1, 2, 3], 4..9, 10..17);

        assert_eq!(cell.id, 0);
        assert_eq!(cell.neighbor_count(), 3);
        assert_eq!(cell.face_count(), 5);
        assert!(cell.is_neighbor_of(2));
        assert!(!cell.is_neighbor_of(99));
        assert!(!cell.is_water());
    }

    #[test]
    fn test_water_and_distance() {
        let a = TerrainCell::new(0, Vec2::new(0.0, 0.0), 0.0, [0.0; 4], vec![], 0..0, 0..0);
        let b = TerrainCell::new(1, Vec2::new(0.3, 0.4), 0.2, [0.0; 4], vec![], 0..0, 0..0);

        assert!(a.is_water());
        assert!((a.distance_to(&b) - 0.5).abs() < 1e-6);
    }
}
