//! Terrain Configuration and Builder
//!
//! This module provides the settings record read by every stage of a
//! generation pass. A configuration is immutable for the duration of one pass;
//! changing a setting means building a new configuration and regenerating.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::Vec2;

use crate::error::{Result, TerrainError};

/// Rectangular region the tessellation is clipped to
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Bounds {
    /// The unit square `[0, 1] x [0, 1]`
    pub const UNIT: Bounds = Bounds {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };

    /// Create bounds from two corners
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the region has no area
    pub fn new(min: Vec2, max: Vec2) -> Result<Self> {
        if !(max.x > min.x && max.y > min.y) {
            return Err(TerrainError::InvalidConfig(format!(
                "bounds must have positive area (min {:?}, max {:?})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Width and height of the region
    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check whether a point lies inside (boundary included)
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Distance from a point to the closest of the four region edges
    ///
    /// Negative for points outside the region.
    #[inline]
    pub fn edge_distance(&self, point: Vec2) -> f32 {
        let dx = (point.x - self.min.x).min(self.max.x - point.x);
        let dy = (point.y - self.min.y).min(self.max.y - point.y);
        dx.min(dy)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::UNIT
    }
}

/// Which quantity the surface colors visualise
///
/// Switching modes only changes the color mapping; stored heights and
/// humidity samples are untouched.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Biome lookup by elevation and humidity band
    #[default]
    Biome,
    /// Grayscale normalized elevation
    Height,
    /// Grayscale humidity
    Humidity,
    /// Grayscale product of elevation and humidity
    HeightHumidity,
}

/// How colors are laid out across a cell's faces
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shading {
    /// One color per cell (faceted look)
    #[default]
    Flat,
    /// Per-vertex colors classified at every vertex for interpolation
    Smooth,
}

/// How cell borders are emitted into the line buffer
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderMode {
    /// Every undirected edge once
    #[default]
    Deduplicated,
    /// Each cell draws its own loop, so interior edges appear twice
    PerCell,
}

/// Configuration for deterministic terrain generation
///
/// The same configuration (seed included) always produces the same sites,
/// heights and colors.
///
/// # Example
///
/// ```rust
/// use voronoi_terrain::*;
///
/// let config = TerrainConfigBuilder::new()
///     .seed(42)
///     .site_count(500)
///     .sea_level_fraction(0.4)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(config.sea_floor(), config.elevation_scale * 0.4);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainConfig {
    /// Seed for site placement and noise
    pub seed: u32,

    /// Number of Voronoi sites (cells) to generate
    pub site_count: usize,

    /// Number of Lloyd relaxation passes
    ///
    /// - 0: raw uniform random sites
    /// - 1: default, removes obvious clustering cheaply
    /// - more: converges toward a centroidal tessellation
    pub lloyd_iterations: usize,

    /// Early-exit threshold for Lloyd relaxation (fraction of the region size)
    ///
    /// 0.0 runs every requested pass.
    pub lloyd_convergence: f32,

    /// Maximum elevation the noise can reach
    pub elevation_scale: f32,

    /// Base frequency of the elevation/humidity noise over the region
    pub noise_frequency: f32,

    /// Number of fBm octaves
    pub noise_octaves: usize,

    /// Amplitude decay per octave
    pub noise_persistence: f32,

    /// Fraction of `elevation_scale` below which terrain is water
    pub sea_level_fraction: f32,

    /// Distance from the region edge over which elevation fades to zero
    pub falloff_margin: f32,

    /// Coordinate offset of the humidity channel relative to elevation
    pub humidity_offset: f32,

    /// Start with all elevations flattened to zero
    pub flatten: bool,

    /// Color mapping used by the classifier
    pub render_mode: RenderMode,

    /// Flat per-cell or smooth per-vertex coloring
    pub shading: Shading,

    /// Whether border segments are deduplicated
    pub border_mode: BorderMode,

    /// Region the sites live in
    pub bounds: Bounds,
}

impl TerrainConfig {
    /// Elevation at or below which terrain reports height 0
    #[inline]
    pub fn sea_floor(&self) -> f32 {
        self.elevation_scale * self.sea_level_fraction
    }

    /// Return a copy with a different render mode
    ///
    /// Render mode does not influence geometry, so no validation is needed.
    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let builder = TerrainConfigBuilder::new();
        let seed = rand::random();
        builder.config(seed)
    }
}

/// Builder for creating TerrainConfig with validation
///
/// # Example
///
/// ```rust
/// use voronoi_terrain::*;
///
/// let config = TerrainConfigBuilder::new()
///     .seed(7)
///     .site_count(200)
///     .lloyd_iterations(2)
///     .unwrap()
///     .render_mode(RenderMode::Height)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.lloyd_iterations, 2);
/// ```
#[derive(Debug, Clone)]
pub struct TerrainConfigBuilder {
    seed: Option<u32>,
    site_count: usize,
    lloyd_iterations: usize,
    lloyd_convergence: f32,
    elevation_scale: f32,
    noise_frequency: f32,
    noise_octaves: usize,
    noise_persistence: f32,
    sea_level_fraction: f32,
    falloff_margin: f32,
    humidity_offset: f32,
    flatten: bool,
    render_mode: RenderMode,
    shading: Shading,
    border_mode: BorderMode,
    bounds: Bounds,
}

impl TerrainConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: random
    /// - site_count: 1000
    /// - lloyd_iterations: 1
    /// - elevation_scale: 0.3, sea_level_fraction: 0.45
    /// - noise: frequency 3.0, 4 octaves, persistence 0.5
    /// - falloff_margin: 0.2 of the region
    pub fn new() -> Self {
        Self {
            seed: None,
            site_count: 1000,
            lloyd_iterations: 1,
            lloyd_convergence: 0.0,
            elevation_scale: 0.3,
            noise_frequency: 3.0,
            noise_octaves: 4,
            noise_persistence: 0.5,
            sea_level_fraction: 0.45,
            falloff_margin: 0.2,
            humidity_offset: 137.0,
            flatten: false,
            render_mode: RenderMode::default(),
            shading: Shading::default(),
            border_mode: BorderMode::default(),
            bounds: Bounds::UNIT,
        }
    }

    /// Set the seed for site placement and noise
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of sites
    pub fn site_count(mut self, count: usize) -> Self {
        self.site_count = count;
        self
    }

    /// Set the number of Lloyd relaxation passes
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if iterations > 20
    pub fn lloyd_iterations(mut self, iterations: usize) -> Result<Self> {
        if iterations > 20 {
            return Err(TerrainError::InvalidConfig(format!(
                "Lloyd iterations must be <= 20 (got {})",
                iterations
            )));
        }
        self.lloyd_iterations = iterations;
        Ok(self)
    }

    /// Set the Lloyd early-exit threshold
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if threshold is negative
    pub fn lloyd_convergence(mut self, threshold: f32) -> Result<Self> {
        if !(threshold >= 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "Lloyd convergence threshold must be >= 0 (got {})",
                threshold
            )));
        }
        self.lloyd_convergence = threshold;
        Ok(self)
    }

    /// Set the maximum elevation
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if scale <= 0
    pub fn elevation_scale(mut self, scale: f32) -> Result<Self> {
        if !(scale > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "elevation scale must be positive (got {})",
                scale
            )));
        }
        self.elevation_scale = scale;
        Ok(self)
    }

    /// Set the base noise frequency
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if frequency <= 0
    pub fn noise_frequency(mut self, frequency: f32) -> Result<Self> {
        if !(frequency > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "noise frequency must be positive (got {})",
                frequency
            )));
        }
        self.noise_frequency = frequency;
        Ok(self)
    }

    /// Set the number of noise octaves
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 1 <= octaves <= 16
    pub fn noise_octaves(mut self, octaves: usize) -> Result<Self> {
        if !(1..=16).contains(&octaves) {
            return Err(TerrainError::InvalidConfig(format!(
                "noise octaves must be in 1..=16 (got {})",
                octaves
            )));
        }
        self.noise_octaves = octaves;
        Ok(self)
    }

    /// Set the per-octave amplitude decay
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 0 < persistence <= 1
    pub fn noise_persistence(mut self, persistence: f32) -> Result<Self> {
        if !(persistence > 0.0 && persistence <= 1.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "noise persistence must be in (0, 1] (got {})",
                persistence
            )));
        }
        self.noise_persistence = persistence;
        Ok(self)
    }

    /// Set the sea level as a fraction of the elevation scale
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 0 <= fraction <= 1
    pub fn sea_level_fraction(mut self, fraction: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(TerrainError::InvalidConfig(format!(
                "sea level fraction must be in [0, 1] (got {})",
                fraction
            )));
        }
        self.sea_level_fraction = fraction;
        Ok(self)
    }

    /// Set the width of the coastal falloff band
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if margin <= 0
    pub fn falloff_margin(mut self, margin: f32) -> Result<Self> {
        if !(margin > 0.0) {
            return Err(TerrainError::InvalidConfig(format!(
                "falloff margin must be positive (got {})",
                margin
            )));
        }
        self.falloff_margin = margin;
        Ok(self)
    }

    /// Set the humidity channel offset
    pub fn humidity_offset(mut self, offset: f32) -> Self {
        self.humidity_offset = offset;
        self
    }

    /// Start flattened
    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    /// Set the render mode
    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    /// Set flat or smooth shading
    pub fn shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    /// Set how borders are emitted
    pub fn border_mode(mut self, mode: BorderMode) -> Self {
        self.border_mode = mode;
        self
    }

    /// Set the region the sites live in
    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is drawn.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the falloff band does not fit in the region
    pub fn build(self) -> Result<TerrainConfig> {
        let half_extent = self.bounds.size().min_element() * 0.5;
        if self.falloff_margin > half_extent {
            return Err(TerrainError::InvalidConfig(format!(
                "falloff margin {} exceeds half the region extent {}",
                self.falloff_margin, half_extent
            )));
        }
        let seed = self.seed.unwrap_or_else(rand::random);
        Ok(self.config(seed))
    }

    fn config(self, seed: u32) -> TerrainConfig {
        TerrainConfig {
            seed,
            site_count: self.site_count,
            lloyd_iterations: self.lloyd_iterations,
            lloyd_convergence: self.lloyd_convergence,
            elevation_scale: self.elevation_scale,
            noise_frequency: self.noise_frequency,
            noise_octaves: self.noise_octaves,
            noise_persistence: self.noise_persistence,
            sea_level_fraction: self.sea_level_fraction,
            falloff_margin: self.falloff_margin,
            humidity_offset: self.humidity_offset,
            flatten: self.flatten,
            render_mode: self.render_mode,
            shading: self.shading,
            border_mode: self.border_mode,
            bounds: self.bounds,
        }
    }
}

impl Default for TerrainConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
