//! Bounded Voronoi diagram
//!
//! The diagram is the structure every later stage consumes: indexed sites,
//! welded boundary vertices, edges with left/right site references, and per
//! cell the list of edges bounding it. `BoundedVoronoi` builds one by clipping
//! the region rectangle against the bisector of each Delaunay neighbor.

use glam::Vec2;
use std::collections::{HashMap, HashSet};

use crate::config::Bounds;
use crate::error::{Result, TerrainError};
use crate::generation::delaunay::neighbor_candidates;

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;

/// Vertices closer than this fraction of the region's larger side are merged
const WELD_TOLERANCE: f32 = 1e-6;

/// A Voronoi site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    /// Position in the input point list
    pub index: usize,
    /// Planar position
    pub position: Vec2,
}

/// A boundary segment between two cells, or a cell and the region boundary
///
/// `left` lies to the left of the directed segment `start -> end`. At least
/// one side must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramEdge {
    /// Index of the first endpoint in the diagram's vertex list
    pub start: usize,
    /// Index of the second endpoint
    pub end: usize,
    /// Site on the left of `start -> end`
    pub left: Option<usize>,
    /// Site on the right of `start -> end`, `None` on the region boundary
    pub right: Option<usize>,
}

impl DiagramEdge {
    /// The site across this edge from `site`
    ///
    /// `None` on the region boundary or when `site` is not adjacent.
    pub fn other_side(&self, site: usize) -> Option<usize> {
        if self.left == Some(site) {
            self.right
        } else if self.right == Some(site) {
            self.left
        } else {
            None
        }
    }
}

/// A cell: one site and the edges bounding it, in no guaranteed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramCell {
    /// Index of the site owning this cell
    pub site: usize,
    /// Indices into the diagram's edge list
    pub half_edges: Vec<usize>,
}

/// A finished tessellation
#[derive(Clone)]
pub struct Diagram {
    bounds: Bounds,
    sites: Vec<Site>,
    vertices: Vec<Vec2>,
    edges: Vec<DiagramEdge>,
    cells: Vec<DiagramCell>,
    #[cfg(feature = "spatial-index")]
    spatial_index: SpatialIndex,
}

impl std::fmt::Debug for Diagram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagram")
            .field("bounds", &self.bounds)
            .field("sites", &self.sites.len())
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .finish()
    }
}

impl Diagram {
    /// Assemble a diagram from its parts
    ///
    /// Cells are expected in site-index order, one per site. Any tessellation
    /// backend can hand its output to the rest of the crate through this.
    ///
    /// # Errors
    ///
    /// Returns `GenerationFailed` if the cell list does not line up with the
    /// sites, or an edge references a vertex or site that does not exist.
    pub fn from_parts(
        bounds: Bounds,
        sites: Vec<Site>,
        vertices: Vec<Vec2>,
        edges: Vec<DiagramEdge>,
        cells: Vec<DiagramCell>,
    ) -> Result<Self> {
        if cells.len() != sites.len() {
            return Err(TerrainError::GenerationFailed(format!(
                "{} cells for {} sites",
                cells.len(),
                sites.len()
            )));
        }
        for (i, (site, cell)) in sites.iter().zip(&cells).enumerate() {
            if site.index != i || cell.site != i {
                return Err(TerrainError::GenerationFailed(format!(
                    "site/cell {} out of index order",
                    i
                )));
            }
            if let Some(&bad) = cell.half_edges.iter().find(|&&e| e >= edges.len()) {
                return Err(TerrainError::GenerationFailed(format!(
                    "cell {} references missing edge {}",
                    i, bad
                )));
            }
        }
        for (e, edge) in edges.iter().enumerate() {
            let bad_vertex = edge.start >= vertices.len() || edge.end >= vertices.len();
            let bad_site = [edge.left, edge.right]
                .iter()
                .flatten()
                .any(|&s| s >= sites.len());
            if bad_vertex || bad_site {
                return Err(TerrainError::GenerationFailed(format!(
                    "edge {} references a missing vertex or site",
                    e
                )));
            }
        }

        #[cfg(feature = "spatial-index")]
        let spatial_index = {
            let positions: Vec<Vec2> = sites.iter().map(|s| s.position).collect();
            SpatialIndex::new(&positions)
        };

        Ok(Self {
            bounds,
            sites,
            vertices,
            edges,
            cells,
            #[cfg(feature = "spatial-index")]
            spatial_index,
        })
    }

    /// Region the diagram covers
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// All sites, indexed by site index
    #[inline]
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// All cells, indexed by site index
    #[inline]
    pub fn cells(&self) -> &[DiagramCell] {
        &self.cells
    }

    /// All edges
    #[inline]
    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    /// All boundary vertices
    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Number of sites
    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Check if the diagram has no sites
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Get a cell by site index
    #[inline]
    pub fn cell(&self, site: usize) -> Option<&DiagramCell> {
        self.cells.get(site)
    }

    /// Planar endpoints of an edge in stored order
    #[inline]
    pub fn edge_endpoints(&self, edge: &DiagramEdge) -> (Vec2, Vec2) {
        (self.vertices[edge.start], self.vertices[edge.end])
    }

    /// Site whose cell contains `point`
    ///
    /// Returns `None` for points outside the region or an empty diagram.
    pub fn locate(&self, point: Vec2) -> Option<usize> {
        if !self.bounds.contains(point) {
            return None;
        }
        self.nearest_site(point)
    }

    #[cfg(feature = "spatial-index")]
    fn nearest_site(&self, point: Vec2) -> Option<usize> {
        self.spatial_index.find_nearest(point)
    }

    #[cfg(not(feature = "spatial-index"))]
    fn nearest_site(&self, point: Vec2) -> Option<usize> {
        self.sites
            .iter()
            .min_by(|a, b| {
                a.position
                    .distance_squared(point)
                    .total_cmp(&b.position.distance_squared(point))
            })
            .map(|s| s.index)
    }
}

/// Tessellation oracle: turns points into a diagram
pub trait Tessellator {
    /// Build the diagram for `points`; site `i` is `points[i]`
    fn tessellate(&self, points: &[Vec2]) -> Result<Diagram>;
}

/// Voronoi diagram clipped to a rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedVoronoi {
    /// Clip region
    pub bounds: Bounds,
}

impl BoundedVoronoi {
    /// Create a tessellator for the given region
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds }
    }
}

impl Default for BoundedVoronoi {
    fn default() -> Self {
        Self::new(Bounds::UNIT)
    }
}

impl Tessellator for BoundedVoronoi {
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a point outside the region or a duplicate
    /// point.
    fn tessellate(&self, points: &[Vec2]) -> Result<Diagram> {
        let mut seen = HashSet::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            if !self.bounds.contains(*p) {
                return Err(TerrainError::InvalidConfig(format!(
                    "site {} at {:?} lies outside {:?}",
                    i, p, self.bounds
                )));
            }
            if !seen.insert((p.x.to_bits(), p.y.to_bits())) {
                return Err(TerrainError::InvalidConfig(format!(
                    "site {} at {:?} duplicates an earlier site",
                    i, p
                )));
            }
        }

        let candidates = neighbor_candidates(points);

        let mut welder = VertexWelder::new(&self.bounds);
        let mut edges: Vec<DiagramEdge> = Vec::new();
        let mut edge_lookup: HashMap<(usize, usize), usize> = HashMap::new();
        let mut cells = Vec::with_capacity(points.len());

        for (i, &site) in points.iter().enumerate() {
            let polygon = clip_cell(site, points, &candidates[i], &self.bounds);
            let ids: Vec<usize> = polygon.iter().map(|&(p, _)| welder.weld(p)).collect();

            let mut half_edges = Vec::with_capacity(ids.len());
            for k in 0..ids.len() {
                let (a, b) = (ids[k], ids[(k + 1) % ids.len()]);
                if a == b {
                    continue;
                }

                let key = (a.min(b), a.max(b));
                match edge_lookup.get(&key) {
                    Some(&e) => {
                        let edge = &mut edges[e];
                        if edge.left != Some(i) && edge.right.is_none() {
                            edge.right = Some(i);
                        }
                        half_edges.push(e);
                    }
                    None => {
                        edge_lookup.insert(key, edges.len());
                        half_edges.push(edges.len());
                        edges.push(DiagramEdge {
                            start: a,
                            end: b,
                            left: Some(i),
                            right: polygon[k].1,
                        });
                    }
                }
            }

            cells.push(DiagramCell { site: i, half_edges });
        }

        let sites = points
            .iter()
            .enumerate()
            .map(|(index, &position)| Site { index, position })
            .collect();

        log::debug!(
            "tessellated {} sites into {} edges, {} vertices",
            points.len(),
            edges.len(),
            welder.vertices.len()
        );

        Diagram::from_parts(self.bounds, sites, welder.vertices, edges, cells)
    }
}

/// Polygon vertex plus the site across the segment starting at it
type TaggedVertex = (Vec2, Option<usize>);

/// Clip the region rectangle to the half-planes closer to `site` than to each candidate
///
/// The result is counter-clockwise; each vertex carries the neighbor across
/// the segment that starts at it (`None` for the region boundary).
fn clip_cell(site: Vec2, points: &[Vec2], candidates: &[usize], bounds: &Bounds) -> Vec<TaggedVertex> {
    let mut polygon: Vec<TaggedVertex> = vec![
        (bounds.min, None),
        (Vec2::new(bounds.max.x, bounds.min.y), None),
        (bounds.max, None),
        (Vec2::new(bounds.min.x, bounds.max.y), None),
    ];

    for &other in candidates {
        let normal = points[other] - site;
        let midpoint = (points[other] + site) * 0.5;
        polygon = clip_half_plane(&polygon, midpoint, normal, other);
        if polygon.is_empty() {
            break;
        }
    }

    polygon
}

/// Sutherland-Hodgman step keeping `(p - midpoint) · normal <= 0`
fn clip_half_plane(polygon: &[TaggedVertex], midpoint: Vec2, normal: Vec2, other: usize) -> Vec<TaggedVertex> {
    let mut out = Vec::with_capacity(polygon.len() + 1);
    let side = |p: Vec2| (p - midpoint).dot(normal);

    for k in 0..polygon.len() {
        let (current, tag) = polygon[k];
        let (next, _) = polygon[(k + 1) % polygon.len()];
        let (dc, dn) = (side(current), side(next));

        if dc <= 0.0 {
            out.push((current, tag));
            if dn > 0.0 {
                let t = dc / (dc - dn);
                out.push((current + (next - current) * t, Some(other)));
            }
        } else if dn <= 0.0 {
            let t = dc / (dc - dn);
            out.push((current + (next - current) * t, tag));
        }
    }

    out
}

/// Merges vertices produced independently by neighboring cells
///
/// The weld distance scales with the region, and never drops below a few
/// f32 ulps of the largest coordinate, so regions far from the origin weld too.
struct VertexWelder {
    weld_distance: f32,
    vertices: Vec<Vec2>,
    grid: HashMap<(i64, i64), Vec<usize>>,
}

impl VertexWelder {
    fn new(bounds: &Bounds) -> Self {
        let magnitude = bounds.min.abs().max(bounds.max.abs()).max_element();
        let weld_distance = (bounds.size().max_element() * WELD_TOLERANCE).max(magnitude * f32::EPSILON * 8.0);
        Self {
            weld_distance,
            vertices: Vec::new(),
            grid: HashMap::new(),
        }
    }

    fn weld(&mut self, p: Vec2) -> usize {
        let key = self.key(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.grid.get(&(key.0 + dx, key.1 + dy)) {
                    if let Some(&id) = ids
                        .iter()
                        .find(|&&id| self.vertices[id].distance(p) <= self.weld_distance)
                    {
                        return id;
                    }
                }
            }
        }

        let id = self.vertices.len();
        self.vertices.push(p);
        self.grid.entry(key).or_default().push(id);
        id
    }

    fn key(&self, p: Vec2) -> (i64, i64) {
        (
            (p.x / self.weld_distance).floor() as i64,
            (p.y / self.weld_distance).floor() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::sites::generate_sites;

    fn cell_area(diagram: &Diagram, cell: &DiagramCell) -> f32 {
        // shoelace over directed half-edges, orientation from the left/right sites,
        // relative to the site to keep offset regions precise
        let origin = diagram.sites()[cell.site].position;
        cell.half_edges
            .iter()
            .map(|&e| {
                let edge = diagram.edges()[e];
                let (a, b) = diagram.edge_endpoints(&edge);
                let (a, b) = if edge.left == Some(cell.site) { (a, b) } else { (b, a) };
                (a - origin).perp_dot(b - origin) * 0.5
            })
            .sum()
    }

    #[test]
    fn test_cells_cover_region() {
        let points = generate_sites(200, &Bounds::UNIT, 42);
        let diagram = BoundedVoronoi::default().tessellate(&points).unwrap();

        assert_eq!(diagram.site_count(), 200);
        let total: f32 = diagram.cells().iter().map(|c| cell_area(&diagram, c)).sum();
        assert!((total - 1.0).abs() < 1e-3, "cells cover {} of the unit square", total);

        for cell in diagram.cells() {
            assert!(cell.half_edges.len() >= 3);
            assert!(cell_area(&diagram, cell) > 0.0);
        }
    }

    #[test]
    fn test_edges_have_a_side_and_neighbors_are_symmetric() {
        let points = generate_sites(100, &Bounds::UNIT, 7);
        let diagram = BoundedVoronoi::default().tessellate(&points).unwrap();

        for edge in diagram.edges() {
            assert!(edge.left.is_some());
            if let (Some(l), Some(r)) = (edge.left, edge.right) {
                assert!(diagram.cells()[l].half_edges.iter().any(|&e| diagram.edges()[e] == *edge));
                assert!(diagram.cells()[r].half_edges.iter().any(|&e| diagram.edges()[e] == *edge));
            }
        }
    }

    #[test]
    fn test_single_site_owns_region() {
        let diagram = BoundedVoronoi::default().tessellate(&[Vec2::new(0.3, 0.6)]).unwrap();
        let cell = &diagram.cells()[0];
        assert_eq!(cell.half_edges.len(), 4);
        assert!(diagram.edges().iter().all(|e| e.right.is_none()));
        assert!((cell_area(&diagram, cell) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_two_sites_split_on_bisector() {
        let points = [Vec2::new(0.25, 0.5), Vec2::new(0.75, 0.5)];
        let diagram = BoundedVoronoi::default().tessellate(&points).unwrap();

        let shared: Vec<&DiagramEdge> = diagram.edges().iter().filter(|e| e.right.is_some()).collect();
        assert_eq!(shared.len(), 1);
        let (a, b) = diagram.edge_endpoints(shared[0]);
        assert!((a.x - 0.5).abs() < 1e-6 && (b.x - 0.5).abs() < 1e-6);
        assert_eq!(shared[0].other_side(0), Some(1));
        assert_eq!(shared[0].other_side(1), Some(0));
        assert_eq!(shared[0].other_side(5), None);
    }

    /// Interior edges must be shared by exactly two cells, whatever the scale
    fn assert_edges_shared(diagram: &Diagram) {
        let mut owners = vec![0usize; diagram.edges().len()];
        for cell in diagram.cells() {
            for &e in &cell.half_edges {
                owners[e] += 1;
            }
        }
        for (edge, &count) in diagram.edges().iter().zip(&owners) {
            let expected = if edge.right.is_some() { 2 } else { 1 };
            assert_eq!(count, expected, "edge {:?}", edge);
        }
        // an unwelded interior edge shows up as a one-sided edge off the border
        let bounds = diagram.bounds();
        for edge in diagram.edges().iter().filter(|e| e.right.is_none()) {
            let (a, b) = diagram.edge_endpoints(edge);
            let mid = (a + b) * 0.5;
            assert!(bounds.edge_distance(mid) <= bounds.size().max_element() * 1e-4, "stray edge {:?}", edge);
        }
    }

    #[test]
    fn test_weld_scales_with_region() {
        let regions = [
            Bounds::new(Vec2::ZERO, Vec2::splat(1000.0)).unwrap(),
            Bounds::new(Vec2::ZERO, Vec2::splat(0.001)).unwrap(),
            Bounds::new(Vec2::new(500.0, -20.0), Vec2::new(540.0, 10.0)).unwrap(),
        ];
        for bounds in regions {
            for seed in 0..3 {
                let points = generate_sites(1500, &bounds, seed);
                let diagram = BoundedVoronoi::new(bounds).tessellate(&points).unwrap();
                assert_edges_shared(&diagram);

                let area = bounds.size().x * bounds.size().y;
                let total: f32 = diagram.cells().iter().map(|c| cell_area(&diagram, c)).sum();
                assert!((total / area - 1.0).abs() < 1e-2, "cells cover {} of {}", total, area);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let diagram = BoundedVoronoi::default().tessellate(&[]).unwrap();
        assert!(diagram.is_empty());
        assert!(diagram.edges().is_empty());
        assert_eq!(diagram.locate(Vec2::new(0.5, 0.5)), None);
    }

    #[test]
    fn test_rejects_bad_points() {
        let voronoi = BoundedVoronoi::default();
        assert!(voronoi.tessellate(&[Vec2::new(1.5, 0.5)]).is_err());
        assert!(voronoi
            .tessellate(&[Vec2::new(0.5, 0.5), Vec2::new(0.5, 0.5)])
            .is_err());
    }

    #[test]
    fn test_locate() {
        let points = [Vec2::new(0.25, 0.25), Vec2::new(0.75, 0.25), Vec2::new(0.5, 0.8)];
        let diagram = BoundedVoronoi::default().tessellate(&points).unwrap();

        assert_eq!(diagram.locate(Vec2::new(0.1, 0.1)), Some(0));
        assert_eq!(diagram.locate(Vec2::new(0.9, 0.2)), Some(1));
        assert_eq!(diagram.locate(Vec2::new(0.5, 0.95)), Some(2));
        assert_eq!(diagram.locate(Vec2::new(1.2, 0.5)), None);
    }

    #[test]
    fn test_from_parts_validates() {
        let sites = vec![Site {
            index: 0,
            position: Vec2::new(0.5, 0.5),
        }];
        let result = Diagram::from_parts(Bounds::UNIT, sites.clone(), vec![], vec![], vec![]);
        assert!(result.is_err());

        let edges = vec![DiagramEdge {
            start: 0,
            end: 3,
            left: Some(0),
            right: None,
        }];
        let cells = vec![DiagramCell {
            site: 0,
            half_edges: vec![0],
        }];
        let result = Diagram::from_parts(Bounds::UNIT, sites, vec![Vec2::ZERO], edges, cells);
        assert!(result.is_err());
    }
}
