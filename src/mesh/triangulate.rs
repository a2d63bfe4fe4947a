//! Ear-clipping triangulation of simple polygons

use glam::Vec2;

const EPSILON: f32 = 1e-12;

/// Twice the signed area, positive for counter-clockwise loops
pub(crate) fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    (0..n)
        .map(|i| polygon[i].perp_dot(polygon[(i + 1) % n]))
        .sum()
}

/// Triangulate a simple polygon into counter-clockwise triangles
///
/// Works for convex and non-convex loops in either orientation. Indices refer
/// to `polygon`. Degenerate leftovers (collinear runs) are fanned.
pub(crate) fn ear_clip(polygon: &[Vec2]) -> Vec<[usize; 3]> {
    let n = polygon.len();
    if n < 3 {
        return Vec::new();
    }

    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area(polygon) < 0.0 {
        remaining.reverse();
    }

    let mut triangles = Vec::with_capacity(n - 2);
    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let prev = remaining[(i + m - 1) % m];
            let next = remaining[(i + 1) % m];
            is_ear(polygon, &remaining, prev, remaining[i], next)
        });

        match ear {
            Some(i) => {
                let prev = remaining[(i + m - 1) % m];
                let next = remaining[(i + 1) % m];
                triangles.push([prev, remaining[i], next]);
                remaining.remove(i);
            }
            None => {
                for k in 1..m - 1 {
                    triangles.push([remaining[0], remaining[k], remaining[k + 1]]);
                }
                return triangles;
            }
        }
    }

    triangles.push([remaining[0], remaining[1], remaining[2]]);
    triangles
}

fn is_ear(polygon: &[Vec2], remaining: &[usize], a: usize, b: usize, c: usize) -> bool {
    let (pa, pb, pc) = (polygon[a], polygon[b], polygon[c]);
    if (pb - pa).perp_dot(pc - pb) <= EPSILON {
        return false;
    }

    remaining
        .iter()
        .filter(|&&v| v != a && v != b && v != c)
        .all(|&v| !in_triangle(polygon[v], pa, pb, pc))
}

/// Inside or on the boundary of the counter-clockwise triangle `abc`
fn in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    (b - a).perp_dot(p - a) >= 0.0 && (c - b).perp_dot(p - b) >= 0.0 && (a - c).perp_dot(p - c) >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(polygon: &[Vec2], triangles: &[[usize; 3]]) -> f32 {
        triangles
            .iter()
            .map(|t| signed_area(&[polygon[t[0]], polygon[t[1]], polygon[t[2]]]) * 0.5)
            .sum()
    }

    #[test]
    fn test_convex_square() {
        let square = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let triangles = ear_clip(&square);

        assert_eq!(triangles.len(), 2);
        assert!((area(&square, &triangles) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clockwise_input_yields_ccw_triangles() {
        let square = [Vec2::ZERO, Vec2::Y, Vec2::ONE, Vec2::X];
        let triangles = ear_clip(&square);

        for t in &triangles {
            assert!(signed_area(&[square[t[0]], square[t[1]], square[t[2]]]) > 0.0);
        }
        assert!((area(&square, &triangles) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_convex_polygon() {
        // L shape, area 3
        let shape = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let triangles = ear_clip(&shape);

        assert_eq!(triangles.len(), 4);
        assert!((area(&shape, &triangles) - 3.0).abs() < 1e-5);
        for t in &triangles {
            assert!(signed_area(&[shape[t[0]], shape[t[1]], shape[t[2]]]) > 0.0);
        }
    }

    #[test]
    fn test_too_few_vertices() {
        assert!(ear_clip(&[Vec2::ZERO, Vec2::X]).is_empty());
    }
}
