//! Biome classification
//!
//! Land is classified by elevation band and humidity band through a fixed
//! 4×6 lookup table; anything at height zero is water.

use glam::Vec2;

use crate::config::{RenderMode, TerrainConfig};
use crate::mesh::{gray, ColorClassifier, TerrainColor};
use crate::terrain::noise::{NoiseChannel, NoiseConfig, NoiseField};

/// Number of elevation bands (table rows)
pub const ELEVATION_BANDS: usize = 4;
/// Number of humidity bands (table columns)
pub const HUMIDITY_BANDS: usize = 6;

/// Discrete terrain categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Biome {
    /// At or below sea level
    Water,
    /// Lowland, driest band
    SubtropicalDesert,
    /// Dry lowland or temperate midland
    Grassland,
    /// Lowland, moderate humidity
    TropicalSeasonalForest,
    /// Lowland, wettest bands
    TropicalRainForest,
    /// Dry midland and highland
    TemperateDesert,
    /// Midland, moderate humidity
    TemperateDeciduousForest,
    /// Midland, wettest band
    TemperateRainForest,
    /// Highland, moderate humidity
    Shrubland,
    /// Highland, wettest bands
    Taiga,
    /// Peak, driest band
    Scorched,
    /// Peak, dry
    Bare,
    /// Peak, moderate humidity
    Tundra,
    /// Peak, wet
    Snow,
}

/// Rows: elevation band, low to high. Columns: humidity band, dry to wet.
const BIOME_TABLE: [[Biome; HUMIDITY_BANDS]; ELEVATION_BANDS] = {
    use Biome::*;
    [
        [
            SubtropicalDesert,
            Grassland,
            TropicalSeasonalForest,
            TropicalSeasonalForest,
            TropicalRainForest,
            TropicalRainForest,
        ],
        [
            TemperateDesert,
            Grassland,
            Grassland,
            TemperateDeciduousForest,
            TemperateDeciduousForest,
            TemperateRainForest,
        ],
        [TemperateDesert, TemperateDesert, Shrubland, Shrubland, Taiga, Taiga],
        [Scorched, Bare, Tundra, Snow, Snow, Snow],
    ]
};

impl Biome {
    /// Look up the biome for an elevation band and humidity band
    ///
    /// Out-of-range bands are clamped to the table.
    pub fn from_bands(elevation_band: usize, humidity_band: usize) -> Biome {
        let row = elevation_band.min(ELEVATION_BANDS - 1);
        let col = humidity_band.min(HUMIDITY_BANDS - 1);
        BIOME_TABLE[row][col]
    }

    /// Check if this biome is water
    pub fn is_water(&self) -> bool {
        matches!(self, Biome::Water)
    }

    /// Display color of the biome
    pub fn color(&self) -> TerrainColor {
        match self {
            Biome::Water => [0.27, 0.27, 0.48, 1.0],
            Biome::SubtropicalDesert => [0.91, 0.86, 0.78, 1.0],
            Biome::Grassland => [0.77, 0.83, 0.67, 1.0],
            Biome::TropicalSeasonalForest => [0.66, 0.80, 0.64, 1.0],
            Biome::TropicalRainForest => [0.61, 0.73, 0.66, 1.0],
            Biome::TemperateDesert => [0.89, 0.91, 0.79, 1.0],
            Biome::TemperateDeciduousForest => [0.71, 0.79, 0.66, 1.0],
            Biome::TemperateRainForest => [0.64, 0.77, 0.66, 1.0],
            Biome::Shrubland => [0.77, 0.80, 0.73, 1.0],
            Biome::Taiga => [0.80, 0.83, 0.73, 1.0],
            Biome::Scorched => [0.60, 0.60, 0.60, 1.0],
            Biome::Bare => [0.73, 0.73, 0.73, 1.0],
            Biome::Tundra => [0.87, 0.87, 0.73, 1.0],
            Biome::Snow => [0.97, 0.97, 0.97, 1.0],
        }
    }
}

/// Quantize a value in `[0, 1]` into `bands` equal-width half-open bands
///
/// Bands are `(lo, hi]`, so a value exactly on a threshold falls into the
/// lower band. Zero and anything below maps to band 0, anything above 1 to
/// the last band.
pub fn band(value: f32, bands: usize) -> usize {
    if bands == 0 || !(value > 0.0) {
        return 0;
    }
    let upper = (value * bands as f32).ceil() as usize;
    upper.saturating_sub(1).min(bands - 1)
}

/// The two climate quantities a color is derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    /// Elevation above sea floor scaled to `[0, 1]`
    pub normalized_height: f32,
    /// Humidity in `[0, 1]`
    pub humidity: f32,
}

/// Default classifier: biome lookup plus grayscale debug modes
#[derive(Debug, Clone)]
pub struct BiomeClassifier {
    noise: NoiseField,
    humidity_channel: NoiseChannel,
    land_range: f32,
    render_mode: RenderMode,
}

impl BiomeClassifier {
    /// Build the classifier from a terrain configuration
    ///
    /// Humidity reads the same noise as elevation on an offset channel.
    pub fn new(config: &TerrainConfig) -> Self {
        let noise = NoiseField::new(NoiseConfig::from_terrain(config));
        let land_range = config.elevation_scale - config.sea_floor();
        if land_range <= 0.0 {
            log::warn!(
                "sea floor {} reaches elevation scale {}, all land normalizes to 0",
                config.sea_floor(),
                config.elevation_scale
            );
        }

        Self {
            noise,
            humidity_channel: NoiseChannel::new(config.humidity_offset),
            land_range,
            render_mode: config.render_mode,
        }
    }

    /// Same classifier with another render mode
    pub fn with_render_mode(&self, mode: RenderMode) -> Self {
        Self {
            render_mode: mode,
            ..self.clone()
        }
    }

    /// Active render mode
    #[inline]
    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Elevation above sea floor scaled into `[0, 1]`
    ///
    /// Returns 0 when the land range is empty (sea floor equals the scale).
    pub fn normalized_height(&self, height: f32) -> f32 {
        if self.land_range > 0.0 {
            (height / self.land_range).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Humidity in `[0, 1]` from the offset noise channel
    pub fn humidity(&self, x: f32, y: f32) -> f32 {
        let raw = self.noise.raw_sample_channel(Vec2::new(x, y), self.humidity_channel);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Climate quantities at a point, independent of the render mode
    pub fn sample(&self, height: f32, x: f32, y: f32) -> ClimateSample {
        ClimateSample {
            normalized_height: self.normalized_height(height),
            humidity: self.humidity(x, y),
        }
    }

    /// Biome for a climate sample
    pub fn biome(&self, sample: ClimateSample) -> Biome {
        if sample.normalized_height > 0.0 {
            Biome::from_bands(
                band(sample.normalized_height, ELEVATION_BANDS),
                band(sample.humidity, HUMIDITY_BANDS),
            )
        } else {
            Biome::Water
        }
    }

    /// Map a climate sample to a color under the active render mode
    pub fn color_for(&self, sample: ClimateSample) -> TerrainColor {
        match self.render_mode {
            RenderMode::Biome => self.biome(sample).color(),
            RenderMode::Height => gray(sample.normalized_height),
            RenderMode::Humidity => gray(sample.humidity),
            RenderMode::HeightHumidity => gray(sample.normalized_height * sample.humidity),
        }
    }
}

impl ColorClassifier for BiomeClassifier {
    fn color(&self, height: f32, x: f32, y: f32) -> TerrainColor {
        self.color_for(self.sample(height, x, y))
    }
}
