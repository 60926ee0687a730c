//! Triangle index construction.
//!
//! One pass over the **cell** grid. For cell `(col, row)` with a vertex
//! grid `W = columns + 1` wide:
//!
//! ```text
//!  topLeft ---- topRight        topRight    = (row + 1) * W + col + 1
//!     |  \         |            topLeft     = topRight - 1
//!     |    \       |            bottomLeft  = topRight - W - 1
//!     |      \     |            bottomRight = topRight - W
//!  bottomLeft - bottomRight
//! ```
//!
//! Both triangles start at `topRight` and wind counter-clockwise seen from +Z.

use gridmesh_core::{GridSpec, ScanCell};

use crate::mesh::elements::{QuadIndices, TriangleIndices};

/// Index arithmetic for one grid.
///
/// [`GridSpec`] caps the vertex grid at `i32::MAX + 1` points, so every
/// index computed here fits an `i32`.
#[derive(Clone, Copy)]
pub(crate) struct QuadLayout {
    vertices_per_row: i64,
}

impl QuadLayout {
    pub(crate) fn new(grid: &GridSpec) -> Self {
        Self {
            vertices_per_row: i64::from(grid.columns()) + 1,
        }
    }

    pub(crate) fn quad(self, cell: ScanCell) -> QuadIndices {
        let width = self.vertices_per_row;
        let column = i64::from(cell.location.column);
        let row = i64::from(cell.location.row);

        let top_right = (row + 1) * width + (column + 1);
        let top_left = top_right - 1;
        let bottom_left = top_right - width - 1;
        let bottom_right = top_right - width;

        QuadIndices {
            first: triangle(top_right, top_left, bottom_left),
            second: triangle(top_right, bottom_left, bottom_right),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn triangle(i0: i64, i1: i64, i2: i64) -> TriangleIndices {
    TriangleIndices::new(i0 as i32, i1 as i32, i2 as i32)
}
