//! Random site placement
//!
//! Sites are drawn uniformly inside the region from a seeded ChaCha stream,
//! so a seed always reproduces the same initial point set.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::Bounds;

/// Generate `count` uniformly distributed sites inside `bounds`
///
/// # Example
///
/// ```rust
/// use voronoi_terrain::generation::generate_sites;
/// use voronoi_terrain::Bounds;
///
/// let sites = generate_sites(100, &Bounds::UNIT, 42);
/// assert_eq!(sites.len(), 100);
/// ```
pub fn generate_sites(count: usize, bounds: &Bounds, seed: u32) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);

    (0..count)
        .map(|_| {
            Vec2::new(
                rng.gen_range(bounds.min.x..bounds.max.x),
                rng.gen_range(bounds.min.y..bounds.max.y),
            )
        })
        .collect()
}
