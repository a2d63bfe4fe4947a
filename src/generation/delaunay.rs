//! Delaunay neighbor candidates
//!
//! Two sites can only share a Voronoi edge if they are joined in the Delaunay
//! triangulation, so the triangulation's half-edges give the candidate
//! neighbor lists used when clipping cells. This module is a thin wrapper
//! around `delaunator`.

use glam::Vec2;

/// Neighbor candidates of every site, sorted and deduplicated
///
/// Falls back to "every other site" when no triangulation exists (fewer
/// than three sites, or all sites collinear); for such tiny inputs the
/// quadratic candidate set is harmless. Sites must be distinct.
pub fn neighbor_candidates(points: &[Vec2]) -> Vec<Vec<usize>> {
    let n = points.len();
    let delaunay_points: Vec<delaunator::Point> = points
        .iter()
        .map(|p| delaunator::Point {
            x: p.x as f64,
            y: p.y as f64,
        })
        .collect();

    let triangulation = delaunator::triangulate(&delaunay_points);

    if triangulation.triangles.is_empty() {
        return (0..n)
            .map(|i| (0..n).filter(|&j| j != i).collect())
            .collect();
    }

    let mut candidates = vec![Vec::new(); n];
    for (he, &start) in triangulation.triangles.iter().enumerate() {
        let end = triangulation.triangles[next_halfedge(he)];
        candidates[start].push(end);
        candidates[end].push(start);
    }

    for list in &mut candidates {
        list.sort_unstable();
        list.dedup();
    }

    candidates
}

/// Next half-edge within the same triangle
#[inline]
fn next_halfedge(he: usize) -> usize {
    if he % 3 == 2 {
        he - 2
    } else {
        he + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_with_center() {
        let points = vec![
            Vec2::new(0.1, 0.1),
            Vec2::new(0.9, 0.15),
            Vec2::new(0.85, 0.9),
            Vec2::new(0.12, 0.88),
            Vec2::new(0.5, 0.52),
        ];

        let candidates = neighbor_candidates(&points);

        assert_eq!(candidates.len(), 5);
        // center touches every corner
        assert_eq!(candidates[4], vec![0, 1, 2, 3]);
        // relation is symmetric
        for (i, list) in candidates.iter().enumerate() {
            for &j in list {
                assert!(candidates[j].contains(&i));
            }
        }
    }

    #[test]
    fn test_small_inputs_fall_back_to_all_pairs() {
        assert!(neighbor_candidates(&[]).is_empty());
        assert_eq!(neighbor_candidates(&[Vec2::new(0.5, 0.5)]), vec![Vec::<usize>::new()]);

        let two = neighbor_candidates(&[Vec2::new(0.2, 0.5), Vec2::new(0.8, 0.5)]);
        assert_eq!(two, vec![vec![1], vec![0]]);

        let collinear = neighbor_candidates(&[
            Vec2::new(0.1, 0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.9, 0.5),
        ]);
        assert_eq!(collinear[0], vec![1, 2]);
    }
}
