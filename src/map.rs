//! VoronoiMap main structure

use glam::Vec2;
use std::time::Instant;

use crate::cell::TerrainCell;
use crate::config::{RenderMode, TerrainConfig};
use crate::error::Result;
use crate::generation::{relaxed_sites, BoundedVoronoi, Diagram, Tessellator};
use crate::mesh::{BuildOptions, LineBuffer, PointBuffer, SurfaceBuffer, TerrainBuilder, TerrainColor, TerrainMesh};
use crate::terrain::{BiomeClassifier, IslandHeightModel};
use crate::walker::{RegionWalker, HIGHLIGHT_COLOR};

/// Which overlay buffers a renderer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshVisibility {
    /// Cell border lines
    pub borders: bool,
    /// Site markers
    pub sites: bool,
}

impl Default for MeshVisibility {
    fn default() -> Self {
        Self {
            borders: true,
            sites: true,
        }
    }
}

/// One generated island map
///
/// Owns everything produced by a generation pass: the configuration, the
/// diagram, the height and color models, and the mesh. Regenerating replaces
/// all of it at once.
///
/// # Examples
///
/// ```
/// use voronoi_terrain::*;
///
/// let config = TerrainConfigBuilder::new()
///     .seed(42)
///     .site_count(300)
///     .build()
///     .unwrap();
///
/// let mut map = VoronoiMap::generate(config).unwrap();
/// println!("Generated {} cells", map.cell_count());
///
/// // Highlight the region around the center
/// let region = map.highlight_at(0.5, 0.5, 0.1).unwrap();
/// assert!(!region.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct VoronoiMap {
    /// Configuration used to generate this map
    config: TerrainConfig,

    /// Tessellation of the relaxed sites
    diagram: Diagram,

    height_model: IslandHeightModel,
    classifier: BiomeClassifier,

    /// Renderer-facing buffers and the cell arena
    mesh: TerrainMesh,

    visibility: MeshVisibility,
}

impl VoronoiMap {
    /// Generate a map with the built-in bounded Voronoi tessellation
    ///
    /// # Example
    ///
    /// ```
    /// use voronoi_terrain::*;
    ///
    /// let config = TerrainConfigBuilder::new()
    ///     .seed(12345)
    ///     .site_count(100)
    ///     .lloyd_iterations(2)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    ///
    /// let map = VoronoiMap::generate(config).unwrap();
    /// assert_eq!(map.cell_count(), 100);
    /// ```
    pub fn generate(config: TerrainConfig) -> Result<Self> {
        let tessellator = BoundedVoronoi::new(config.bounds);
        Self::generate_with_tessellator(config, &tessellator)
    }

    /// Generate a map with a custom tessellation backend
    pub fn generate_with_tessellator<T>(config: TerrainConfig, tessellator: &T) -> Result<Self>
    where
        T: Tessellator + ?Sized,
    {
        let start = Instant::now();
        let sites = relaxed_sites(&config, tessellator)?;
        let map = Self::assemble(config, tessellator.tessellate(&sites)?)?;

        log::info!(
            "generated map (seed {}) with {} cells, {} faces in {:?}",
            config.seed,
            map.cell_count(),
            map.mesh.face_count(),
            start.elapsed()
        );
        Ok(map)
    }

    /// Build a map from fixed sites, skipping random placement and relaxation
    ///
    /// Useful for reproducible layouts and tests.
    pub fn from_sites(config: TerrainConfig, sites: &[Vec2]) -> Result<Self> {
        let diagram = BoundedVoronoi::new(config.bounds).tessellate(sites)?;
        Self::assemble(config, diagram)
    }

    fn assemble(config: TerrainConfig, diagram: Diagram) -> Result<Self> {
        let height_model = IslandHeightModel::new(&config);
        let classifier = BiomeClassifier::new(&config);
        let mut mesh =
            TerrainBuilder::new(&height_model, &classifier, BuildOptions::from_config(&config)).build(&diagram)?;
        mesh.set_flat(config.flatten);

        Ok(Self {
            config,
            diagram,
            height_model,
            classifier,
            mesh,
            visibility: MeshVisibility::default(),
        })
    }

    /// Replace the whole map with a fresh generation
    ///
    /// Visibility toggles survive. On error the current map is left intact.
    pub fn regenerate(&mut self, config: TerrainConfig) -> Result<()> {
        let visibility = self.visibility;
        *self = Self::generate(config)?;
        self.visibility = visibility;
        Ok(())
    }

    /// Get the configuration used to generate this map
    #[inline]
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    #[inline]
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    #[inline]
    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    #[inline]
    pub fn height_model(&self) -> &IslandHeightModel {
        &self.height_model
    }

    #[inline]
    pub fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Get the number of cells on this map
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.mesh.cells().len()
    }

    /// Get a cell by ID
    ///
    /// Returns `None` if the cell ID is out of bounds.
    #[inline]
    pub fn get_cell(&self, id: usize) -> Option<&TerrainCell> {
        self.mesh.cell(id)
    }

    /// Get all cells as a slice
    #[inline]
    pub fn cells(&self) -> &[TerrainCell] {
        self.mesh.cells()
    }

    /// Get neighbor IDs for a cell, empty for an invalid ID
    pub fn get_neighbors(&self, cell_id: usize) -> &[usize] {
        self.mesh.neighbors(cell_id)
    }

    /// Find the cell containing a planar position
    ///
    /// `None` outside the region.
    pub fn find_cell_at(&self, x: f32, y: f32) -> Option<usize> {
        self.diagram.locate(Vec2::new(x, y))
    }

    /// Collapse or restore elevation
    pub fn set_flat(&mut self, enabled: bool) {
        self.config.flatten = enabled;
        self.mesh.set_flat(enabled);
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        self.mesh.is_flat()
    }

    #[inline]
    pub fn render_mode(&self) -> RenderMode {
        self.classifier.render_mode()
    }

    /// Switch the color mapping and recolor every cell
    ///
    /// Heights and geometry are kept. Clears any highlight.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.config.render_mode = mode;
        self.classifier = self.classifier.with_render_mode(mode);
        self.mesh.recolor(&self.classifier);
    }

    /// Paint the region reachable from the cell at `(x, y)`
    ///
    /// Returns the painted cells, empty when the point is outside the region.
    pub fn highlight_at(&mut self, x: f32, y: f32, budget: f32) -> Result<Vec<usize>> {
        match self.find_cell_at(x, y) {
            Some(start) => self.highlight_cell(start, budget, HIGHLIGHT_COLOR),
            None => Ok(Vec::new()),
        }
    }

    /// Paint the region reachable from `start` with `color`
    pub fn highlight_cell(&mut self, start: usize, budget: f32, color: TerrainColor) -> Result<Vec<usize>> {
        RegionWalker::walk(&mut self.mesh, start, budget, color)
    }

    /// Restore classifier colors everywhere
    pub fn clear_highlight(&mut self) {
        self.mesh.recolor(&self.classifier);
    }

    #[inline]
    pub fn visibility(&self) -> MeshVisibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: MeshVisibility) {
        self.visibility = visibility;
    }

    /// Triangulated surface
    #[inline]
    pub fn surface(&self) -> &SurfaceBuffer {
        self.mesh.surface()
    }

    /// Border lines, `None` while hidden
    pub fn borders(&self) -> Option<&LineBuffer> {
        self.visibility.borders.then(|| self.mesh.borders())
    }

    /// Site markers, `None` while hidden
    pub fn sites(&self) -> Option<&PointBuffer> {
        self.visibility.sites.then(|| self.mesh.sites())
    }
}
