//! # Grid and Buffer Tests
//!
//! Cross-module checks: scanners drive buffers, and the vertex/cell grid
//! relationship holds for every small grid shape.

use gridmesh_core::{GridSize, GridSpec, MeshError, TypedBuffer};

/// Test: a vertex-grid buffer has exactly (c+1)*(r+1) elements.
#[test]
fn test_vertex_buffer_size_follows_grid() {
    for columns in 1..10 {
        for rows in 1..10 {
            let spec = GridSpec::new(columns, rows).unwrap();
            let buffer = TypedBuffer::<[f32; 2]>::populate(spec.vertex_grid(), |cell| {
                [cell.fractional.x as f32, cell.fractional.y as f32]
            })
            .unwrap();

            assert_eq!(buffer.len(), spec.number_of_vertices());
            assert_eq!(buffer.byte_len(), spec.number_of_vertices() * 8);
        }
    }
}

/// Test: buffers built from the same generator are byte-identical.
#[test]
fn test_population_is_deterministic() {
    let grid = GridSize::new(31, 17).unwrap();
    let generator = |cell: gridmesh_core::ScanCell| {
        (cell.fractional.x * 3.0 + cell.fractional.y).sin() as f32
    };

    let first = TypedBuffer::populate(grid, generator).unwrap();
    let second = TypedBuffer::populate(grid, generator).unwrap();
    let threaded = TypedBuffer::populate_parallel(grid, 5, generator).unwrap();

    assert_eq!(first.as_bytes(), second.as_bytes());
    assert_eq!(first.as_bytes(), threaded.as_bytes());
}

/// Test: scanner locations round-trip through index_of.
#[test]
fn test_scanner_index_round_trip() {
    let grid = GridSize::new(6, 4).unwrap().grown_by(1);
    for cell in grid.scanner() {
        assert_eq!(grid.index_of(cell.location), cell.index);
        assert_eq!(grid.cell_at(cell.index), Some(cell));
    }
}

/// Test: zero-sized grids never reach allocation.
#[test]
fn test_empty_grid_is_rejected_up_front() {
    match GridSpec::new(0, 0) {
        Err(MeshError::InvalidDimensions { columns, rows }) => {
            assert_eq!((columns, rows), (0, 0));
        }
        other => panic!("expected dimension error, got {other:?}"),
    }
}
