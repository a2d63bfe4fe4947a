//! Multi-octave coherent noise over the plane
//!
//! Wraps fractal Brownian motion over Perlin noise. A `NoiseField` is a pure
//! function of its configuration and the sample coordinates; changing any
//! parameter means building a new field.

use glam::Vec2;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::TerrainConfig;

/// Configuration for a noise field
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoiseConfig {
    /// Seed of the underlying Perlin sources
    pub seed: u32,
    /// Base frequency (features per unit distance)
    pub frequency: f32,
    /// Number of octaves for fractal detail layers
    pub octaves: usize,
    /// Amplitude decay per octave
    pub persistence: f32,
    /// Frequency multiplier per octave
    pub lacunarity: f32,
    /// Lower amplitude bound of `sample`
    pub min: f32,
    /// Upper amplitude bound of `sample`
    pub max: f32,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            frequency: 3.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            min: 0.0,
            max: 1.0,
        }
    }
}

impl NoiseConfig {
    /// Elevation noise of a terrain: amplitude spans `[0, elevation_scale]`
    ///
    /// Height and humidity both sample this field, so they stay in sync.
    pub fn from_terrain(config: &TerrainConfig) -> Self {
        Self {
            seed: config.seed,
            frequency: config.noise_frequency,
            octaves: config.noise_octaves,
            persistence: config.noise_persistence,
            min: 0.0,
            max: config.elevation_scale,
            ..Default::default()
        }
    }
}

/// Offset applied to coordinates to read an independent channel of a field
///
/// Two channels sampled far enough apart are effectively uncorrelated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoiseChannel {
    /// Coordinate offset added to both axes
    pub offset: f32,
}

impl NoiseChannel {
    /// The unshifted channel
    pub const PRIMARY: NoiseChannel = NoiseChannel { offset: 0.0 };

    /// Channel shifted by `offset` on both axes
    pub fn new(offset: f32) -> Self {
        Self { offset }
    }
}

/// Deterministic band-limited noise field
#[derive(Clone)]
pub struct NoiseField {
    fbm: Fbm<Perlin>,
    config: NoiseConfig,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("config", &self.config).finish()
    }
}

impl NoiseField {
    /// Build a field from its configuration
    pub fn new(config: NoiseConfig) -> Self {
        let fbm = Fbm::<Perlin>::new(config.seed)
            .set_octaves(config.octaves.max(1))
            .set_frequency(config.frequency as f64)
            .set_persistence(config.persistence as f64)
            .set_lacunarity(config.lacunarity as f64);

        Self { fbm, config }
    }

    /// Configuration this field was built from
    #[inline]
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Signed noise in `[-1, 1]`, without amplitude scaling
    pub fn raw_sample(&self, x: f32, y: f32) -> f32 {
        let value = self.fbm.get([x as f64, y as f64]) as f32;
        // fBm normalisation is approximate, a few samples overshoot slightly
        value.clamp(-1.0, 1.0)
    }

    /// Noise mapped into the configured `[min, max]` amplitude bounds
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let unit = (self.raw_sample(x, y) + 1.0) * 0.5;
        self.config.min + unit * (self.config.max - self.config.min)
    }

    /// `raw_sample` on an offset channel
    #[inline]
    pub fn raw_sample_channel(&self, point: Vec2, channel: NoiseChannel) -> f32 {
        self.raw_sample(point.x + channel.offset, point.y + channel.offset)
    }

    /// `sample` on an offset channel
    #[inline]
    pub fn sample_channel(&self, point: Vec2, channel: NoiseChannel) -> f32 {
        self.sample(point.x + channel.offset, point.y + channel.offset)
    }
}
