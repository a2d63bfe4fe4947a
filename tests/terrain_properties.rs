//! End-to-end properties of generated maps

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use voronoi_terrain::generation::cell_boundary;
use voronoi_terrain::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Random but valid configuration
fn random_config(rng: &mut ChaCha8Rng) -> TerrainConfig {
    TerrainConfigBuilder::new()
        .seed(rng.gen())
        .site_count(rng.gen_range(1..400))
        .lloyd_iterations(rng.gen_range(0..3))
        .unwrap()
        .elevation_scale(rng.gen_range(0.05..1.0))
        .unwrap()
        .sea_level_fraction(rng.gen_range(0.0..=1.0))
        .unwrap()
        .noise_frequency(rng.gen_range(0.5..8.0))
        .unwrap()
        .border_mode(if rng.gen_bool(0.5) {
            BorderMode::Deduplicated
        } else {
            BorderMode::PerCell
        })
        .build()
        .unwrap()
}

#[test]
fn heights_never_negative() {
    init_logging();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..12 {
        let config = random_config(&mut rng);
        let map = VoronoiMap::generate(config).unwrap();

        assert_eq!(map.cell_count(), config.site_count);
        assert!(map.cells().iter().all(|c| c.height >= 0.0));
        assert!(map.surface().positions.iter().all(|p| p[1] >= 0.0));
        assert!(map.surface().face_heights.iter().all(|&h| h >= 0.0));
    }
}

#[test]
fn border_endpoints_sit_on_height_field() {
    init_logging();
    let mut rng = ChaCha8Rng::seed_from_u64(77);

    for _ in 0..6 {
        let config = random_config(&mut rng);
        let map = VoronoiMap::generate(config).unwrap();
        let borders = map.borders().unwrap();

        for [a, b] in borders.segments() {
            assert_eq!(a[1], map.height_model().height(a[0], a[2]));
            assert_eq!(b[1], map.height_model().height(b[0], b[2]));
        }
    }
}

#[test]
fn flat_toggle_is_lossless() {
    let config = TerrainConfigBuilder::new().seed(31).site_count(250).build().unwrap();
    let mut map = VoronoiMap::generate(config).unwrap();
    let surface = map.surface().clone();
    let borders = map.borders().unwrap().clone();
    let sites = map.sites().unwrap().clone();

    for round in 0..5 {
        map.set_flat(true);
        if round % 2 == 0 {
            map.set_flat(true);
        }
        assert!(map.surface().positions.iter().all(|p| p[1] == 0.0));
        map.set_flat(false);
    }

    assert_eq!(map.surface(), &surface);
    assert_eq!(map.borders(), Some(&borders));
    assert_eq!(map.sites(), Some(&sites));
}

#[test]
fn walker_budget_extremes() {
    let config = TerrainConfigBuilder::new().seed(8).site_count(300).build().unwrap();
    let mut map = VoronoiMap::generate(config).unwrap();
    let color = [0.0, 1.0, 0.0, 1.0];

    let start = map.find_cell_at(0.4, 0.6).unwrap();
    let single = map.highlight_cell(start, 0.0, color).unwrap();
    assert_eq!(single, vec![start]);
    let painted = map
        .cells()
        .iter()
        .filter(|c| c.color == color)
        .count();
    assert_eq!(painted, 1);

    let all = map.highlight_cell(start, f32::INFINITY, color).unwrap();
    assert_eq!(all.len(), map.cell_count());
    assert!(map.surface().face_colors.iter().all(|&c| c == color));
}

#[test]
fn zero_sites_give_empty_mesh() {
    let config = TerrainConfigBuilder::new().seed(1).site_count(0).build().unwrap();
    let map = VoronoiMap::generate(config).unwrap();

    assert!(map.diagram().is_empty());
    assert!(map.mesh().is_empty());
    assert!(map.surface().is_empty());
    assert!(map.borders().unwrap().is_empty());
    assert!(map.sites().unwrap().is_empty());
}

#[test]
fn four_fixed_sites_are_reproducible() {
    let config = TerrainConfigBuilder::new()
        .seed(4)
        .site_count(4)
        .elevation_scale(0.3)
        .unwrap()
        .sea_level_fraction(0.45)
        .unwrap()
        .build()
        .unwrap();
    let sites = [
        Vec2::new(0.3, 0.35),
        Vec2::new(0.7, 0.3),
        Vec2::new(0.35, 0.7),
        Vec2::new(0.65, 0.65),
    ];

    let first = VoronoiMap::from_sites(config, &sites).unwrap();
    let second = VoronoiMap::from_sites(config, &sites).unwrap();

    assert_eq!(first.mesh().face_count(), second.mesh().face_count());
    for (a, b) in first.cells().iter().zip(second.cells()) {
        assert_eq!(a.height, b.height);
        assert_eq!(a.color, b.color);
    }
    assert_eq!(first.surface(), second.surface());

    // every cell is an n-gon fanned into n - 2 triangles
    let expected: usize = (0..4)
        .map(|i| cell_boundary(first.diagram(), i).unwrap().len() - 2)
        .sum();
    assert_eq!(first.mesh().face_count(), expected);
}

#[test]
fn smooth_shading_colors_every_vertex() {
    let config = TerrainConfigBuilder::new()
        .seed(12)
        .site_count(150)
        .shading(Shading::Smooth)
        .build()
        .unwrap();
    let map = VoronoiMap::generate(config).unwrap();
    let surface = map.surface();

    for (p, c) in surface.positions.iter().zip(&surface.vertex_colors) {
        assert_eq!(*c, map.classifier().color(p[1], p[0], p[2]));
    }
}

#[test]
fn malformed_diagram_fails_whole_build() {
    // a lone cell bounded by only two edges
    let vertices = vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)];
    let edges = vec![
        DiagramEdge { start: 0, end: 1, left: Some(0), right: None },
        DiagramEdge { start: 1, end: 0, left: Some(0), right: None },
    ];
    let sites = vec![Site { index: 0, position: Vec2::new(0.5, 0.5) }];
    let cells = vec![DiagramCell { site: 0, half_edges: vec![0, 1] }];
    let diagram = Diagram::from_parts(Bounds::UNIT, sites, vertices, edges, cells).unwrap();

    let result = TerrainBuilder::new(&FlatHeightModel, &GrayscaleClassifier::default(), BuildOptions::default())
        .build(&diagram);
    assert!(matches!(result, Err(TerrainError::MalformedCell { cell: 0, .. })));
}

#[test]
fn large_and_small_regions_share_interior_edges() {
    init_logging();
    let regions = [
        (Bounds::new(Vec2::ZERO, Vec2::splat(1000.0)).unwrap(), 200.0, 0.003),
        (Bounds::new(Vec2::ZERO, Vec2::splat(0.001)).unwrap(), 0.0002, 3000.0),
    ];

    for (bounds, margin, frequency) in regions {
        for seed in 0..4 {
            let config = TerrainConfigBuilder::new()
                .seed(seed)
                .site_count(800)
                .lloyd_iterations(1)
                .unwrap()
                .bounds(bounds)
                .falloff_margin(margin)
                .unwrap()
                .noise_frequency(frequency)
                .unwrap()
                .build()
                .unwrap();
            let map = VoronoiMap::generate(config).unwrap();
            let diagram = map.diagram();
            assert_eq!(map.cell_count(), 800);

            let mut owners = vec![0usize; diagram.edges().len()];
            for cell in diagram.cells() {
                for &e in &cell.half_edges {
                    owners[e] += 1;
                }
            }
            for (edge, &count) in diagram.edges().iter().zip(&owners) {
                if edge.right.is_some() {
                    assert_eq!(count, 2, "interior edge {:?}", edge);
                } else {
                    assert_eq!(count, 1, "boundary edge {:?}", edge);
                }
            }

            // edges without a right site lie on the region border
            let tolerance = bounds.size().max_element() * 1e-4;
            for edge in diagram.edges().iter().filter(|e| e.right.is_none()) {
                let (a, b) = diagram.edge_endpoints(edge);
                assert!(bounds.edge_distance((a + b) * 0.5) <= tolerance, "stray edge {:?}", edge);
            }
        }
    }
}
