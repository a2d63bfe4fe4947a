//! Terrain mesh generation
//!
//! Turns a bounded Voronoi diagram into engine-agnostic buffers: a lifted,
//! triangulated surface with one color per cell, border line segments and
//! site markers. Positions are `(x, elevation, y)` so the surface faces +Y.
//!
//! The buffers map directly onto any renderer:
//! - Bevy: `Mesh` attributes
//! - Godot: `ArrayMesh`
//! - wgpu: raw vertex and index buffers

mod colors;
mod triangulate;

pub use colors::{gray, ColorClassifier, GrayscaleClassifier, TerrainColor, UniformColor};

use glam::{Vec2, Vec3};
use std::ops::Range;
use std::time::Instant;

use crate::cell::TerrainCell;
use crate::config::{BorderMode, Shading, TerrainConfig};
use crate::error::{Result, TerrainError};
use crate::generation::{border_edges, cell_boundary, cell_neighbors, Diagram};
use crate::terrain::HeightModel;
use triangulate::ear_clip;

/// Options for one mesh build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    /// Per-cell or per-vertex colors
    pub shading: Shading,
    /// How borders are emitted
    pub border_mode: BorderMode,
}

impl BuildOptions {
    /// Options taken from a terrain configuration
    pub fn from_config(config: &TerrainConfig) -> Self {
        Self {
            shading: config.shading,
            border_mode: config.border_mode,
        }
    }
}

/// Border line segments, two positions per segment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBuffer {
    /// Segment endpoints as `(x, elevation, y)`
    pub positions: Vec<[f32; 3]>,
}

impl LineBuffer {
    /// Number of segments
    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// True when there are no segments
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over segments as endpoint pairs
    pub fn segments(&self) -> impl Iterator<Item = [[f32; 3]; 2]> + '_ {
        self.positions.chunks_exact(2).map(|pair| [pair[0], pair[1]])
    }

    fn push_segment(&mut self, a: [f32; 3], b: [f32; 3]) {
        self.positions.push(a);
        self.positions.push(b);
    }
}

/// Site markers, one position per site
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointBuffer {
    /// Marker positions as `(x, cell height, y)`
    pub positions: Vec<[f32; 3]>,
}

impl PointBuffer {
    /// Number of markers
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when there are no markers
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Triangulated terrain surface
///
/// Every cell owns its own vertices, so a cell's faces can be recolored
/// without touching its neighbors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceBuffer {
    /// Vertex positions `(x, elevation, y)`
    pub positions: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub vertex_colors: Vec<[f32; 4]>,
    /// Triangle vertex indices, wound so normals point up
    pub faces: Vec<[u32; 3]>,
    /// One color per face
    pub face_colors: Vec<[f32; 4]>,
    /// Unit normal per face
    pub face_normals: Vec<[f32; 3]>,
    /// Mean elevation of each face's three vertices
    pub face_heights: Vec<f32>,
    /// Owning cell of each face
    pub face_cells: Vec<usize>,
}

impl SurfaceBuffer {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the surface is empty
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Flattened triangle indices for index buffers
    pub fn indices(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }

    /// Recompute every face normal from the current positions
    ///
    /// Zero-area faces get +Y.
    pub fn compute_normals(&mut self) {
        let positions = &self.positions;
        self.face_normals = self
            .faces
            .iter()
            .map(|face| {
                let [a, b, c] = face.map(|v| Vec3::from(positions[v as usize]));
                (b - a).cross(c - a).try_normalize().unwrap_or(Vec3::Y).to_array()
            })
            .collect();
    }

    fn paint(&mut self, faces: Range<usize>, color: TerrainColor) {
        for face in faces {
            self.face_colors[face] = color;
        }
    }
}

/// Elevation components saved by the first flattening
#[derive(Debug, Clone, Default, PartialEq)]
struct ElevationCache {
    surface: Vec<f32>,
    borders: Vec<f32>,
    sites: Vec<f32>,
}

impl ElevationCache {
    fn capture(surface: &SurfaceBuffer, borders: &LineBuffer, sites: &PointBuffer) -> Self {
        let heights = |positions: &[[f32; 3]]| -> Vec<f32> { positions.iter().map(|p| p[1]).collect() };
        Self {
            surface: heights(&surface.positions),
            borders: heights(&borders.positions),
            sites: heights(&sites.positions),
        }
    }
}

fn set_elevations(positions: &mut [[f32; 3]], elevations: Option<&[f32]>) {
    match elevations {
        Some(elevations) => {
            for (p, &h) in positions.iter_mut().zip(elevations) {
                p[1] = h;
            }
        }
        None => {
            for p in positions.iter_mut() {
                p[1] = 0.0;
            }
        }
    }
}

/// Lift a planar point onto the terrain
#[inline]
fn lift(point: Vec2, elevation: f32) -> [f32; 3] {
    [point.x, elevation, point.y]
}

/// Builds a terrain mesh from a diagram
///
/// Height and color are injected strategies, so the same builder renders a
/// flat debug map or a full biome island.
///
/// # Example
///
/// ```rust
/// use voronoi_terrain::*;
///
/// let diagram = BoundedVoronoi::default()
///     .tessellate(&[Vec2::new(0.3, 0.3), Vec2::new(0.7, 0.4), Vec2::new(0.5, 0.8)])
///     .unwrap();
/// let classifier = GrayscaleClassifier::default();
/// let builder = TerrainBuilder::new(&FlatHeightModel, &classifier, BuildOptions::default());
/// let mesh = builder.build(&diagram).unwrap();
///
/// assert_eq!(mesh.cells().len(), 3);
/// assert!(mesh.face_count() >= 3);
/// ```
pub struct TerrainBuilder<'a, H: ?Sized, C: ?Sized> {
    height_model: &'a H,
    classifier: &'a C,
    options: BuildOptions,
}

impl<'a, H, C> TerrainBuilder<'a, H, C>
where
    H: HeightModel + ?Sized,
    C: ColorClassifier + ?Sized,
{
    /// Create a builder over borrowed height and color strategies
    pub fn new(height_model: &'a H, classifier: &'a C, options: BuildOptions) -> Self {
        Self {
            height_model,
            classifier,
            options,
        }
    }

    /// Build the mesh for every cell in site order
    ///
    /// # Errors
    ///
    /// Any malformed cell or edge fails the whole build.
    pub fn build(&self, diagram: &Diagram) -> Result<TerrainMesh> {
        let start = Instant::now();

        let mut surface = SurfaceBuffer::default();
        let mut borders = LineBuffer::default();
        let mut sites = PointBuffer::default();
        let mut cells = Vec::with_capacity(diagram.site_count());

        for site in diagram.sites() {
            let boundary = cell_boundary(diagram, site.index)?;
            let triangles = ear_clip(&boundary);
            if triangles.is_empty() {
                return Err(TerrainError::MalformedCell {
                    cell: site.index,
                    reason: "boundary cannot be triangulated".to_string(),
                });
            }

            let height = self.height_model.height_at(site.position);
            let color = self.classifier.color(height, site.position.x, site.position.y);
            let elevations: Vec<f32> = boundary.iter().map(|&p| self.height_model.height_at(p)).collect();

            // Step 1: Cell vertices
            let first_vertex = surface.positions.len();
            let base = u32::try_from(first_vertex)
                .map_err(|_| TerrainError::GenerationFailed("surface exceeds u32 indices".to_string()))?;
            for (&point, &elevation) in boundary.iter().zip(&elevations) {
                surface.positions.push(lift(point, elevation));
                surface.vertex_colors.push(match self.options.shading {
                    Shading::Flat => color,
                    Shading::Smooth => self.classifier.color(elevation, point.x, point.y),
                });
            }

            // Step 2: Faces, reversed so the lifted normals point up
            let first_face = surface.faces.len();
            for [a, b, c] in triangles {
                surface.faces.push([base + c as u32, base + b as u32, base + a as u32]);
                surface.face_colors.push(color);
                surface.face_heights.push((elevations[a] + elevations[b] + elevations[c]) / 3.0);
                surface.face_cells.push(site.index);
            }

            // Step 3: Borders and site marker
            if self.options.border_mode == BorderMode::PerCell {
                let n = boundary.len();
                for k in 0..n {
                    let next = (k + 1) % n;
                    borders.push_segment(lift(boundary[k], elevations[k]), lift(boundary[next], elevations[next]));
                }
            }
            sites.positions.push(lift(site.position, height));

            cells.push(TerrainCell::new(
                site.index,
                site.position,
                height,
                color,
                cell_neighbors(diagram, site.index),
                first_face..surface.faces.len(),
                first_vertex..surface.positions.len(),
            ));
        }

        if self.options.border_mode == BorderMode::Deduplicated {
            for [a, b] in border_edges(diagram)? {
                borders.push_segment(
                    lift(a, self.height_model.height_at(a)),
                    lift(b, self.height_model.height_at(b)),
                );
            }
        }

        surface.compute_normals();

        log::debug!(
            "built terrain mesh: {} cells, {} faces, {} border segments in {:?}",
            cells.len(),
            surface.face_count(),
            borders.segment_count(),
            start.elapsed()
        );

        Ok(TerrainMesh {
            cells,
            surface,
            borders,
            sites,
            shading: self.options.shading,
            flat: false,
            elevation_cache: None,
        })
    }
}

/// Built terrain: the cell arena plus renderer buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMesh {
    cells: Vec<TerrainCell>,
    surface: SurfaceBuffer,
    borders: LineBuffer,
    sites: PointBuffer,
    shading: Shading,
    flat: bool,
    elevation_cache: Option<ElevationCache>,
}

impl TerrainMesh {
    /// All cells, indexed by site index
    #[inline]
    pub fn cells(&self) -> &[TerrainCell] {
        &self.cells
    }

    /// Get a cell by site index
    #[inline]
    pub fn cell(&self, id: usize) -> Option<&TerrainCell> {
        self.cells.get(id)
    }

    /// Neighbor IDs of a cell, empty for an unknown cell
    pub fn neighbors(&self, id: usize) -> &[usize] {
        self.cells
            .get(id)
            .map(|c| c.neighbors.as_slice())
            .unwrap_or(&[])
    }

    #[inline]
    pub fn surface(&self) -> &SurfaceBuffer {
        &self.surface
    }

    #[inline]
    pub fn borders(&self) -> &LineBuffer {
        &self.borders
    }

    #[inline]
    pub fn sites(&self) -> &PointBuffer {
        &self.sites
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.surface.face_count()
    }

    /// Check if the mesh has no cells
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn shading(&self) -> Shading {
        self.shading
    }

    /// Whether elevations are currently collapsed to 0
    ///
    /// Renderers use this to swap to an unlit material.
    #[inline]
    pub fn is_flat(&self) -> bool {
        self.flat
    }

    /// Collapse or restore the elevation of every buffer
    ///
    /// The first flattening caches the elevations; restoring copies them back
    /// exactly, so any sequence of toggles is lossless. Normals follow the
    /// new positions.
    pub fn set_flat(&mut self, enabled: bool) {
        if enabled == self.flat {
            return;
        }

        if enabled {
            if self.elevation_cache.is_none() {
                self.elevation_cache = Some(ElevationCache::capture(&self.surface, &self.borders, &self.sites));
            }
            set_elevations(&mut self.surface.positions, None);
            set_elevations(&mut self.borders.positions, None);
            set_elevations(&mut self.sites.positions, None);
        } else if let Some(cache) = &self.elevation_cache {
            set_elevations(&mut self.surface.positions, Some(&cache.surface));
            set_elevations(&mut self.borders.positions, Some(&cache.borders));
            set_elevations(&mut self.sites.positions, Some(&cache.sites));
        }

        self.flat = enabled;
        self.surface.compute_normals();
    }

    /// Re-run a classifier over every cell
    ///
    /// Uses the stored heights and sites; geometry is untouched. This also
    /// clears any highlight.
    pub fn recolor<C>(&mut self, classifier: &C)
    where
        C: ColorClassifier + ?Sized,
    {
        let cache = self.elevation_cache.as_ref();
        for cell in &mut self.cells {
            cell.color = classifier.color(cell.height, cell.site.x, cell.site.y);
            self.surface.paint(cell.faces.clone(), cell.color);

            for v in cell.vertices.clone() {
                self.surface.vertex_colors[v] = match self.shading {
                    Shading::Flat => cell.color,
                    Shading::Smooth => {
                        let [x, y, z] = self.surface.positions[v];
                        let elevation = match (self.flat, cache) {
                            (true, Some(cache)) => cache.surface[v],
                            _ => y,
                        };
                        classifier.color(elevation, x, z)
                    }
                };
            }
        }
    }

    /// Paint one cell's faces and vertices with a single color
    ///
    /// # Errors
    ///
    /// Returns `CellNotFound` for an unknown cell.
    pub fn set_cell_color(&mut self, id: usize, color: TerrainColor) -> Result<()> {
        let cell = self.cells.get_mut(id).ok_or(TerrainError::CellNotFound(id))?;
        cell.color = color;
        self.surface.paint(cell.faces.clone(), color);
        for v in cell.vertices.clone() {
            self.surface.vertex_colors[v] = color;
        }
        Ok(())
    }
}
