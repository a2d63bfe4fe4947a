//! Spatial indexing for fast point-to-site lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;
#[cfg(feature = "spatial-index")]
use glam::Vec2;

/// Wrapper around KD-tree for nearest-site queries
///
/// The nearest site to a point is the site whose Voronoi cell contains it, so
/// this answers "which cell was clicked" in O(log n).
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f32, usize, 2, 32>>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from site positions
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_terrain::*;
    ///
    /// let sites = vec![Vec2::new(0.2, 0.2), Vec2::new(0.8, 0.8)];
    /// let index = SpatialIndex::new(&sites);
    /// assert_eq!(index.find_nearest(Vec2::new(0.7, 0.9)), Some(1));
    /// ```
    pub fn new(sites: &[Vec2]) -> Self {
        if sites.is_empty() {
            return Self { tree: None };
        }

        let points: Vec<[f32; 2]> = sites.iter().map(|s| [s.x, s.y]).collect();

        Self {
            tree: Some(ImmutableKdTree::new_from_slice(&points)),
        }
    }

    /// Index of the site nearest to `position`, `None` when there are no sites
    pub fn find_nearest(&self, position: Vec2) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&[position.x, position.y]);
        Some(result.item as usize)
    }
}
