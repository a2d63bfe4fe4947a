//! Terrain sampling and classification
//!
//! Provides the noise field, the height model and the biome classifier used to
//! lift and color a tessellation.

pub mod biome;
pub mod height;
pub mod noise;

pub use biome::{band, Biome, BiomeClassifier, ClimateSample, ELEVATION_BANDS, HUMIDITY_BANDS};
pub use height::{FlatHeightModel, HeightModel, IslandHeightModel};
pub use noise::{NoiseChannel, NoiseConfig, NoiseField};
