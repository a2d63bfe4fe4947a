//! Elevation model
//!
//! Elevation is noise attenuated toward the region edges and shifted down by
//! the sea floor, so land forms islands that never touch the boundary.

use glam::Vec2;

use crate::config::{Bounds, TerrainConfig};
use crate::terrain::noise::{NoiseConfig, NoiseField};

/// Trait for sampling elevation at a planar position
pub trait HeightModel {
    /// Non-negative elevation at `(x, y)`
    fn height(&self, x: f32, y: f32) -> f32;

    /// Convenience wrapper over `height`
    #[inline]
    fn height_at(&self, point: Vec2) -> f32 {
        self.height(point.x, point.y)
    }
}

/// Height model that is zero everywhere
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatHeightModel;

impl HeightModel for FlatHeightModel {
    fn height(&self, _x: f32, _y: f32) -> f32 {
        0.0
    }
}

/// Default height model: noise × edge falloff − sea floor, clamped at zero
#[derive(Debug, Clone)]
pub struct IslandHeightModel {
    noise: NoiseField,
    bounds: Bounds,
    falloff_margin: f32,
    sea_floor: f32,
}

impl IslandHeightModel {
    /// Build the model from a terrain configuration
    ///
    /// The noise amplitude spans `[0, elevation_scale]`.
    pub fn new(config: &TerrainConfig) -> Self {
        let noise = NoiseField::new(NoiseConfig::from_terrain(config));

        Self::with_noise(noise, config.bounds, config.falloff_margin, config.sea_floor())
    }

    /// Build the model around an existing noise field
    pub fn with_noise(noise: NoiseField, bounds: Bounds, falloff_margin: f32, sea_floor: f32) -> Self {
        Self {
            noise,
            bounds,
            falloff_margin,
            sea_floor,
        }
    }

    /// Noise field used for elevation
    #[inline]
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Elevation at or below which height reports zero
    #[inline]
    pub fn sea_floor(&self) -> f32 {
        self.sea_floor
    }

    /// Multiplicative edge mask in `[0, 1]`
    ///
    /// The smallest of the four linear ramps measured from each region edge,
    /// each reaching 1 at `falloff_margin` from its edge.
    pub fn falloff(&self, x: f32, y: f32) -> f32 {
        let distance = self.bounds.edge_distance(Vec2::new(x, y));
        (distance / self.falloff_margin).clamp(0.0, 1.0)
    }
}

impl HeightModel for IslandHeightModel {
    fn height(&self, x: f32, y: f32) -> f32 {
        let elevation = self.noise.sample(x, y) * self.falloff(x, y);
        (elevation - self.sea_floor).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainConfigBuilder;

    fn config(sea_level: f32) -> TerrainConfig {
        TerrainConfigBuilder::new()
            .seed(42)
            .sea_level_fraction(sea_level)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_noise_follows_config() {
        let cfg = config(0.3);
        let model = IslandHeightModel::new(&cfg);
        assert_eq!(model.noise().config(), &NoiseConfig::from_terrain(&cfg));
    }

    #[test]
    fn test_falloff_ramps() {
        let model = IslandHeightModel::new(&config(0.45));

        assert_eq!(model.falloff(0.0, 0.5), 0.0);
        assert_eq!(model.falloff(0.5, 1.0), 0.0);
        assert!((model.falloff(0.1, 0.5) - 0.5).abs() < 1e-6);
        assert!((model.falloff(0.5, 0.95) - 0.25).abs() < 1e-5);
        assert_eq!(model.falloff(0.5, 0.5), 1.0);
        // corners take the smallest ramp
        assert!((model.falloff(0.05, 0.1) - 0.25).abs() < 1e-6);
        // outside the region the mask stays clamped
        assert_eq!(model.falloff(-0.3, 0.5), 0.0);
    }

    #[test]
    fn test_height_non_negative_and_zero_on_boundary() {
        let model = IslandHeightModel::new(&config(0.0));

        for i in 0..=50 {
            for j in 0..=50 {
                let (x, y) = (i as f32 / 50.0, j as f32 / 50.0);
                let h = model.height(x, y);
                assert!(h >= 0.0);
                assert!(h <= 0.3 + 1e-6);
            }
            let t = i as f32 / 50.0;
            assert_eq!(model.height(t, 0.0), 0.0);
            assert_eq!(model.height(0.0, t), 0.0);
            assert_eq!(model.height(1.0, t), 0.0);
            assert_eq!(model.height(t, 1.0), 0.0);
        }
    }

    #[test]
    fn test_full_sea_level_floods_everything() {
        let model = IslandHeightModel::new(&config(1.0));
        for i in 0..=20 {
            for j in 0..=20 {
                assert_eq!(model.height(i as f32 / 20.0, j as f32 / 20.0), 0.0);
            }
        }
    }

    #[test]
    fn test_height_matches_formula() {
        let cfg = config(0.45);
        let model = IslandHeightModel::new(&cfg);
        let (x, y) = (0.43, 0.61);
        let expected = (model.noise().sample(x, y) * model.falloff(x, y) - cfg.sea_floor()).max(0.0);
        assert_eq!(model.height(x, y), expected);
        assert_eq!(model.height_at(Vec2::new(x, y)), expected);
    }

    #[test]
    fn test_flat_model() {
        assert_eq!(FlatHeightModel.height(0.5, 0.5), 0.0);
    }
}
