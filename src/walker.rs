//! Budgeted region flood fill
//!
//! Starting from one cell, the walk spreads to neighbors while the summed
//! site-to-site distance stays within a budget, and paints every reached
//! cell.

use crate::cell::TerrainCell;
use crate::error::{Result, TerrainError};
use crate::mesh::{TerrainColor, TerrainMesh};

/// Color used by region highlighting
pub const HIGHLIGHT_COLOR: TerrainColor = [0.9, 0.15, 0.15, 1.0];

/// Geodesic flood fill over cell adjacency
///
/// The walk uses an explicit work stack, so region size never limits call
/// depth.
///
/// # Example
///
/// ```rust
/// use voronoi_terrain::*;
///
/// let config = TerrainConfigBuilder::new().seed(7).site_count(200).build().unwrap();
/// let map = VoronoiMap::generate(config).unwrap();
///
/// let region = RegionWalker::reach(map.mesh().cells(), 0, 0.0).unwrap();
/// assert_eq!(region, vec![0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionWalker;

impl RegionWalker {
    /// Cells reachable from `start` within `budget`, sorted
    ///
    /// A neighbor is entered when the distance between the two sites fits in
    /// the remaining budget. Each cell keeps the best remaining budget it was
    /// reached with; a revisit that brings no more budget is skipped, which
    /// also bounds an infinite budget.
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` for an unknown start and `InvalidConfig` for a
    /// negative or NaN budget.
    pub fn reach(cells: &[TerrainCell], start: usize, budget: f32) -> Result<Vec<usize>> {
        if budget.is_nan() || budget < 0.0 {
            return Err(TerrainError::InvalidConfig(format!(
                "walk budget must be non-negative, got {}",
                budget
            )));
        }
        if start >= cells.len() {
            return Err(TerrainError::CellNotFound(start));
        }

        let mut best = vec![f32::NEG_INFINITY; cells.len()];
        best[start] = budget;
        let mut stack = vec![(start, budget)];

        while let Some((id, remaining)) = stack.pop() {
            if remaining < best[id] {
                continue; // superseded by a better entry
            }
            let cell = &cells[id];
            for &neighbor in &cell.neighbors {
                let Some(other) = cells.get(neighbor) else {
                    continue;
                };
                let step = cell.distance_to(other);
                if step > remaining {
                    continue;
                }
                let left = remaining - step;
                if left > best[neighbor] {
                    best[neighbor] = left;
                    stack.push((neighbor, left));
                }
            }
        }

        Ok(best
            .iter()
            .enumerate()
            .filter(|(_, &b)| b > f32::NEG_INFINITY)
            .map(|(id, _)| id)
            .collect())
    }

    /// Paint every cell reachable from `start` within `budget`
    ///
    /// Returns the painted cells, sorted.
    pub fn walk(mesh: &mut TerrainMesh, start: usize, budget: f32, color: TerrainColor) -> Result<Vec<usize>> {
        let region = Self::reach(mesh.cells(), start, budget)?;
        for &id in &region {
            mesh.set_cell_color(id, color)?;
        }

        log::debug!("walk from cell {} with budget {} reached {} cells", start, budget, region.len());
        Ok(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Five cells on a line, 0.1 apart
    fn chain() -> Vec<TerrainCell> {
        (0..5)
            .map(|i| {
                let mut neighbors = Vec::new();
                if i > 0 {
                    neighbors.push(i - 1);
                }
                if i < 4 {
                    neighbors.push(i + 1);
                }
                TerrainCell::new(i, Vec2::new(0.1 * i as f32, 0.5), 0.0, [0.0; 4], neighbors, 0..0, 0..0)
            })
            .collect()
    }

    #[test]
    fn test_zero_budget_is_start_only() {
        assert_eq!(RegionWalker::reach(&chain(), 2, 0.0).unwrap(), vec![2]);
    }

    #[test]
    fn test_budget_limits_reach() {
        let cells = chain();
        assert_eq!(RegionWalker::reach(&cells, 0, 0.15).unwrap(), vec![0, 1]);
        assert_eq!(RegionWalker::reach(&cells, 2, 0.15).unwrap(), vec![1, 2, 3]);
        assert_eq!(RegionWalker::reach(&cells, 2, 0.25).unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(RegionWalker::reach(&cells, 0, 0.45).unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_infinite_budget_terminates() {
        assert_eq!(RegionWalker::reach(&chain(), 3, f32::INFINITY).unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_better_budget_revisits() {
        // cell 2 is first reached through the detour 0 -> 1, which leaves too
        // little budget for 3; the later short path 0 -> 4 -> 2 must win
        let cell = |id, x, y, neighbors| TerrainCell::new(id, Vec2::new(x, y), 0.0, [0.0; 4], neighbors, 0..0, 0..0);
        let cells = vec![
            cell(0, 0.0, 0.0, vec![4, 1]),
            cell(1, 0.1, 0.2, vec![0, 2]),
            cell(2, 0.2, 0.0, vec![1, 3, 4]),
            cell(3, 0.3, 0.0, vec![2]),
            cell(4, 0.1, 0.0, vec![0, 2]),
        ];
        assert_eq!(RegionWalker::reach(&cells, 0, 0.5).unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_missing_neighbors_are_skipped() {
        let cells = vec![TerrainCell::new(0, Vec2::ZERO, 0.0, [0.0; 4], vec![7], 0..0, 0..0)];
        assert_eq!(RegionWalker::reach(&cells, 0, 1.0).unwrap(), vec![0]);
    }

    #[test]
    fn test_invalid_inputs() {
        let cells = chain();
        assert_eq!(RegionWalker::reach(&cells, 9, 1.0), Err(TerrainError::CellNotFound(9)));
        assert!(matches!(
            RegionWalker::reach(&cells, 0, -0.1),
            Err(TerrainError::InvalidConfig(_))
        ));
        assert!(matches!(
            RegionWalker::reach(&cells, 0, f32::NAN),
            Err(TerrainError::InvalidConfig(_))
        ));
    }
}
