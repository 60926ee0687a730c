//! Vertex normals.
//!
//! [`NormalMode::Up`](crate::config::NormalMode::Up) needs nothing but the
//! grid. Slope normals read the finished vertex buffer: for each vertex the
//! elevation gradient is taken by central differences, falling back to a
//! one-sided difference on the border.

use gridmesh_core::{GridLocation, GridSize, MeshError, MeshResult, ScanCell};

use crate::mesh::elements::Vector3;

/// Slope normal computation over a populated vertex buffer.
#[derive(Clone, Copy)]
pub(crate) struct SlopeNormals<'a> {
    grid: GridSize,
    vertices: &'a [Vector3],
}

impl<'a> SlopeNormals<'a> {
    /// Pairs a vertex grid with its vertex buffer.
    pub(crate) fn new(grid: GridSize, vertices: &'a [Vector3]) -> MeshResult<Self> {
        let expected = grid.number_of_cells();
        if vertices.len() != expected {
            return Err(MeshError::BufferMismatch {
                expected,
                actual: vertices.len(),
            });
        }
        Ok(Self { grid, vertices })
    }

    fn at(&self, column: u32, row: u32) -> Vector3 {
        self.vertices[self.grid.index_of(GridLocation::new(column, row))]
    }

    pub(crate) fn normal(&self, cell: ScanCell) -> Vector3 {
        let GridLocation { column, row } = cell.location;
        let last_column = self.grid.columns() - 1;
        let last_row = self.grid.rows() - 1;

        let left = self.at(column.saturating_sub(1), row);
        let right = self.at((column + 1).min(last_column), row);
        let down = self.at(column, row.saturating_sub(1));
        let up = self.at(column, (row + 1).min(last_row));

        let dzdx = gradient(left, right, right.x - left.x);
        let dzdy = gradient(down, up, up.y - down.y);
        Vector3::new(-dzdx, -dzdy, 1.0).normalized()
    }
}

fn gradient(from: Vector3, to: Vector3, span: f32) -> f32 {
    if span.abs() > f32::EPSILON {
        (to.z - from.z) / span
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane(columns: u32, rows: u32, z: impl Fn(f32, f32) -> f32) -> (GridSize, Vec<Vector3>) {
        let grid = GridSize::new(columns, rows).unwrap();
        let vertices = grid
            .scanner()
            .map(|cell| {
                let x = cell.location.column as f32;
                let y = cell.location.row as f32;
                Vector3::new(x, y, z(x, y))
            })
            .collect();
        (grid, vertices)
    }

    #[test]
    fn test_flat_plane_points_up() {
        let (grid, vertices) = plane(4, 3, |_, _| 2.0);
        let normals = SlopeNormals::new(grid, &vertices).unwrap();
        for cell in grid.scanner() {
            assert_eq!(normals.normal(cell), Vector3::UP);
        }
    }

    #[test]
    fn test_ramp_tilts_against_slope() {
        // z = x: normal is (-1, 0, 1) / sqrt(2) everywhere, border included
        let (grid, vertices) = plane(3, 3, |x, _| x);
        let normals = SlopeNormals::new(grid, &vertices).unwrap();
        let expected = std::f32::consts::FRAC_1_SQRT_2;
        for cell in grid.scanner() {
            let n = normals.normal(cell);
            assert!((n.x + expected).abs() < 1e-5);
            assert!(n.y.abs() < 1e-5);
            assert!((n.z - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn test_mismatched_buffer_rejected() {
        let (_, vertices) = plane(2, 2, |_, _| 0.0);
        let grid = GridSize::new(3, 3).unwrap();
        assert_eq!(
            SlopeNormals::new(grid, &vertices).err(),
            Some(MeshError::BufferMismatch {
                expected: 9,
                actual: 4
            })
        );
    }
}
