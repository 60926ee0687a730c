//! # Mesh Buffer Tests
//!
//! End-to-end checks of `MeshBufferGenerator` against descriptors built
//! through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gridmesh_core::{GridSpec, MeshError};
use gridmesh_procedural::{
    BuildMode, ColorStrategy, GeneratorConfig, GrayscaleField, HeightField, HeightSource,
    HeightStrategy, MeshBufferGenerator, MeshBuffers, MeshDescriptor, NoiseField, NoiseSeed,
    NormalMode, Rgba, Size2, SurfaceMapping, TextureBitmap, Vector3,
};

fn build(descriptor: &MeshDescriptor) -> MeshBuffers {
    MeshBufferGenerator::default().build(descriptor).unwrap()
}

fn noisy_descriptor(columns: u32, rows: u32) -> MeshDescriptor {
    let grid = GridSpec::new(columns, rows)
        .unwrap()
        .with_cell_size(0.75, 1.25)
        .unwrap();
    MeshDescriptor::new(grid)
        .with_height(
            HeightSource::new()
                .with_field(NoiseField::new(NoiseSeed::new(7)).with_octaves(3))
                .with_height_scale(10.0)
                .with_strategy(HeightStrategy::Scaled),
        )
        .with_mapping(
            SurfaceMapping::new()
                .with_texture_scale(Size2::new(3.0, 5.0))
                .with_color(ColorStrategy::custom(|_, _, _, position| {
                    Rgba::gray((position.z / 10.0).clamp(0.0, 1.0))
                })),
        )
}

/// White field covering only the left half of the grid.
#[derive(Debug)]
struct LeftHalf;

impl GrayscaleField for LeftHalf {
    fn sample(&self, x: f64, _y: f64) -> Option<f64> {
        (x < 0.5).then_some(1.0)
    }
}

/// Test: buffer lengths follow the grid for every small shape.
#[test]
fn test_buffer_counts() {
    for columns in 1..6 {
        for rows in 1..6 {
            let spec = GridSpec::new(columns, rows).unwrap();
            let buffers = build(&MeshDescriptor::new(spec));

            let vertices = ((columns + 1) * (rows + 1)) as usize;
            assert_eq!(buffers.vertex_count(), vertices);
            assert_eq!(buffers.normals().len(), vertices);
            assert_eq!(buffers.texture_coordinates().len(), vertices);
            assert_eq!(buffers.indices().len(), (columns * rows) as usize);
            assert_eq!(buffers.triangle_count(), (2 * columns * rows) as usize);
            assert!(buffers.colors().is_none());
        }
    }
}

/// Test: every index addresses an existing vertex.
#[test]
fn test_indices_in_bounds() {
    let buffers = build(&MeshDescriptor::new(GridSpec::new(7, 3).unwrap()));
    let count = buffers.vertex_count() as i32;
    for quad in buffers.indices().as_slice() {
        for index in quad.first.to_array().into_iter().chain(quad.second.to_array()) {
            assert!((0..count).contains(&index), "index {index} out of range");
        }
    }
}

/// Test: a descriptor without a height source is a flat plane.
#[test]
fn test_flat_plane() {
    let buffers = build(&MeshDescriptor::new(GridSpec::new(4, 4).unwrap()));
    assert_eq!(buffers.vertex_count(), 25);
    for (index, v) in buffers.vertices().as_slice().iter().enumerate() {
        assert_eq!(v.z, 0.0);
        assert_eq!(v.x, (index % 5) as f32);
        assert_eq!(v.y, (index / 5) as f32);
    }
    assert!(buffers.normals().as_slice().iter().all(|n| *n == Vector3::UP));
}

/// Test: a constant mid-gray field with an identity height function.
#[test]
fn test_constant_field_identity_height() {
    let descriptor = MeshDescriptor::new(GridSpec::new(3, 2).unwrap()).with_height(
        HeightSource::new()
            .with_field(HeightField::constant(0.5))
            .with_strategy(HeightStrategy::custom(|value, _, _| value)),
    );
    let buffers = build(&descriptor);
    for v in buffers.vertices().as_slice() {
        assert!((v.z - 0.5).abs() < 1e-6);
    }
}

/// Test: vertices outside the field stay at zero and skip the height function.
#[test]
fn test_outside_field_stays_at_zero() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let spec = GridSpec::new(4, 4).unwrap().with_base_elevation(-1.0);
    let descriptor = MeshDescriptor::new(spec).with_height(
        HeightSource::new()
            .with_field(LeftHalf)
            .with_strategy(HeightStrategy::custom(move |value, _, _| {
                counter.fetch_add(1, Ordering::Relaxed);
                value + 2.0
            })),
    );

    let buffers = build(&descriptor);

    // Vertex fractions are 0, 0.2, 0.4, 0.6, 0.8: three of five columns inside
    assert_eq!(calls.load(Ordering::Relaxed), 15);
    for v in buffers.vertices().as_slice() {
        let expected = if v.x < 2.5 { 2.0 } else { 0.0 };
        assert!((v.z - expected).abs() < 1e-6, "vertex {v:?}");
    }
}

/// Test: texture coordinates stay in [0, 1) for any tiling.
#[test]
fn test_texture_coordinates_in_unit_range() {
    let spec = GridSpec::new(9, 5).unwrap();
    for scale in [0.25, 1.0, 3.0, 7.5, 1000.0] {
        let descriptor = MeshDescriptor::new(spec)
            .with_mapping(SurfaceMapping::new().with_texture_scale(Size2::new(scale, scale)));
        let buffers = build(&descriptor);
        for p in buffers.texture_coordinates().as_slice() {
            assert!((0.0..1.0).contains(&p.u), "u = {} at scale {scale}", p.u);
            assert!((0.0..1.0).contains(&p.v), "v = {} at scale {scale}", p.v);
        }
    }
}

/// Test: tiling derived from a texture bitmap.
#[test]
fn test_bitmap_texture_scale() {
    let bitmap = TextureBitmap::new(8, 8, vec![255; 256]).unwrap();
    let descriptor = MeshDescriptor::new(GridSpec::new(4, 4).unwrap()).with_mapping(
        SurfaceMapping::new()
            .with_texture_bitmap(bitmap)
            .with_bitmap_texture_scale(4.0),
    );
    let buffers = build(&descriptor);
    // 4 cells * 4 texels / 8 texels = 2 repeats
    let second = buffers.texture_coordinates().as_slice()[1];
    assert!((second.u - (0.2 * 0.999 * 2.0) as f32).abs() < 1e-6);
}

/// Test: bitmap-derived tiling without a bitmap fails, other buffers still build.
#[test]
fn test_missing_texture_source() {
    let descriptor = MeshDescriptor::new(GridSpec::new(2, 2).unwrap())
        .with_mapping(SurfaceMapping::new().with_bitmap_texture_scale(16.0));
    let generator = MeshBufferGenerator::default();

    assert!(matches!(
        generator.build(&descriptor),
        Err(MeshError::MissingTextureSource(_))
    ));
    assert!(matches!(
        generator.texture_coordinates(&descriptor),
        Err(MeshError::MissingTextureSource(_))
    ));
    assert_eq!(generator.vertices(&descriptor).unwrap().len(), 9);
    assert_eq!(generator.indices(&descriptor).unwrap().len(), 4);
}

/// Test: colors exist only with a color function, one per vertex.
#[test]
fn test_colors_present_only_with_function() {
    let spec = GridSpec::new(3, 3).unwrap();
    let plain = build(&MeshDescriptor::new(spec).with_mapping(SurfaceMapping::new()));
    assert!(plain.colors().is_none());

    let colored = build(&MeshDescriptor::new(spec).with_mapping(
        SurfaceMapping::new().with_color(ColorStrategy::custom(|value, location, fractional, _| {
            assert_eq!(value, 0.0);
            assert_eq!(fractional.x, 0.0);
            assert_eq!(fractional.y, 0.0);
            Rgba::new(location.column as f32, location.row as f32, 0.0, 1.0)
        })),
    ));
    let colors = colored.colors().unwrap();
    assert_eq!(colors.len(), colored.vertex_count());
    assert_eq!(colors.as_slice()[6], Rgba::new(2.0, 1.0, 0.0, 1.0));
}

/// Test: single cell triangles and counter-clockwise winding seen from +Z.
#[test]
fn test_winding_order() {
    let single = build(&MeshDescriptor::new(GridSpec::new(1, 1).unwrap()));
    let quad = single.indices().as_slice()[0];
    assert_eq!(quad.first.to_array(), [3, 2, 0]);
    assert_eq!(quad.second.to_array(), [3, 0, 1]);

    let buffers = build(&MeshDescriptor::new(GridSpec::new(4, 3).unwrap()));
    let vertices = buffers.vertices().as_slice();
    for quad in buffers.indices().as_slice() {
        for [a, b, c] in [quad.first.to_array(), quad.second.to_array()] {
            let (a, b, c) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
            let cross_z = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            assert!(cross_z > 0.0);
        }
    }
}

/// Test: same descriptor, same bytes, in every build mode.
#[test]
fn test_builds_are_byte_identical() {
    let descriptor = noisy_descriptor(23, 17);
    let sequential = MeshBufferGenerator::new(GeneratorConfig {
        normal_mode: NormalMode::Slope,
        ..GeneratorConfig::default()
    })
    .unwrap();
    let parallel = MeshBufferGenerator::new(GeneratorConfig {
        normal_mode: NormalMode::Slope,
        build_mode: BuildMode::Parallel { workers: 4 },
        ..GeneratorConfig::default()
    })
    .unwrap();

    let first = sequential.build(&descriptor).unwrap();
    let second = sequential.build(&descriptor).unwrap();
    let threaded = parallel.build(&descriptor).unwrap();

    for other in [&second, &threaded] {
        assert_eq!(first.vertices().as_bytes(), other.vertices().as_bytes());
        assert_eq!(first.normals().as_bytes(), other.normals().as_bytes());
        assert_eq!(first.indices().as_bytes(), other.indices().as_bytes());
        assert_eq!(
            first.texture_coordinates().as_bytes(),
            other.texture_coordinates().as_bytes()
        );
        assert_eq!(
            first.colors().map(|c| c.as_bytes()),
            other.colors().map(|c| c.as_bytes())
        );
    }
}

/// Test: slope normals are unit length and face up on noisy terrain.
#[test]
fn test_slope_normals() {
    let generator = MeshBufferGenerator::new(GeneratorConfig {
        normal_mode: NormalMode::Slope,
        ..GeneratorConfig::default()
    })
    .unwrap();
    let buffers = generator.build(&noisy_descriptor(16, 16)).unwrap();

    let normals = buffers.normals().as_slice();
    assert!(normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-4 && n.z > 0.0));
    assert!(normals.iter().any(|n| *n != Vector3::UP), "terrain should not be flat");
}

/// Test: grids too large for 32-bit indices cannot be described at all.
#[test]
fn test_index_overflow_rejected() {
    assert!(matches!(
        GridSpec::new(50_000, 50_000),
        Err(MeshError::IndexOverflow { .. })
    ));
    // Would otherwise saturate the vertex grid and come up a column short
    assert!(matches!(
        GridSpec::new(u32::MAX, 1),
        Err(MeshError::IndexOverflow { .. })
    ));
    assert!(matches!(
        GridSpec::new(1, u32::MAX),
        Err(MeshError::IndexOverflow { .. })
    ));
}

/// Test: the reference elevation never moves vertices.
#[test]
fn test_base_elevation_is_metadata_only() {
    let spec = GridSpec::new(4, 4).unwrap().with_base_elevation(3.0);
    let flat = build(&MeshDescriptor::new(spec));
    assert!(flat.vertices().as_slice().iter().all(|v| v.z == 0.0));

    let raised = build(&MeshDescriptor::new(spec).with_height(
        HeightSource::new().with_strategy(HeightStrategy::custom(|_, _, _| 1.5)),
    ));
    assert!(raised.vertices().as_slice().iter().all(|v| (v.z - 1.5).abs() < 1e-6));
}
