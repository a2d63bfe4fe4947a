//! Voronoi-based island terrain generation
//!
//! A standalone library that turns random sites into a relaxed, bounded
//! Voronoi tessellation, lifts it with a noise height field, colors it by
//! biome and emits renderer-agnostic surface, border and site buffers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voronoi_terrain::*;
//!
//! // Generate a map
//! let config = TerrainConfigBuilder::new()
//!     .seed(42)
//!     .site_count(2000)
//!     .lloyd_iterations(2).unwrap()
//!     .build().unwrap();
//!
//! let mut map = VoronoiMap::generate(config).unwrap();
//! println!("Generated {} triangles", map.surface().face_count());
//!
//! // Debug views and region highlighting
//! map.set_render_mode(RenderMode::Humidity);
//! map.highlight_at(0.5, 0.5, 0.2).unwrap();
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): O(log n) point-to-cell lookups using a KD-tree
//! - `serde`: serialization support for configuration types

// Modules
pub mod error;
pub mod config;
pub mod cell;
pub mod generation;
pub mod terrain;
pub mod mesh;
pub mod walker;
pub mod map;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{TerrainError, Result};
pub use config::{Bounds, BorderMode, RenderMode, Shading, TerrainConfig, TerrainConfigBuilder};
pub use cell::TerrainCell;
pub use generation::{BoundedVoronoi, Diagram, DiagramCell, DiagramEdge, LloydOptions, Site, Tessellator};
pub use terrain::{Biome, BiomeClassifier, ClimateSample, FlatHeightModel, HeightModel, IslandHeightModel, NoiseConfig, NoiseField};
pub use mesh::{
    BuildOptions, ColorClassifier, GrayscaleClassifier, LineBuffer, PointBuffer, SurfaceBuffer, TerrainBuilder,
    TerrainColor, TerrainMesh, UniformColor,
};
pub use walker::{RegionWalker, HIGHLIGHT_COLOR};
pub use map::{MeshVisibility, VoronoiMap};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam vectors for convenience
pub use glam::{Vec2, Vec3};
