//! # Grid Topology
//!
//! A terrain is described as a grid of `columns x rows` square cells.
//! Each cell's four corners are shared with its neighbours, so the
//! underlying vertex grid always has one more column and one more row
//! than the cell grid:
//!
//! ```text
//!  cells: 2x1          vertices: 3x2
//!  +-----+-----+       3-----4-----5
//!  |  0  |  1  |       |     |     |
//!  +-----+-----+       0-----1-----2
//! ```
//!
//! Both grids are walked with the same [`GridScanner`]; only the bounds differ.

mod scanner;

pub use scanner::{GridScanner, ScanCell};

use serde::Deserialize;

use crate::error::{MeshError, MeshResult};

/// Most vertices a grid may have: every index must fit an `i32`.
pub const MAX_VERTICES: u64 = i32::MAX.unsigned_abs() as u64 + 1;

/// Largest fractional coordinate a scanner can yield (just below 1.0).
pub const MAX_FRACTION: f64 = 1.0 - f64::EPSILON;

/// Integer location of a cell (or vertex) inside its grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridLocation {
    /// Column, 0 on the left.
    pub column: u32,
    /// Row, 0 at the bottom.
    pub row: u32,
}

impl GridLocation {
    /// Creates a new grid location.
    #[inline]
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

/// Location expressed as a fraction of the grid's full extent, in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FractionalLocation {
    /// Horizontal fraction.
    pub x: f64,
    /// Vertical fraction.
    pub y: f64,
}

impl FractionalLocation {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new fractional location.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Number of columns and rows of a grid.
///
/// Both are at least 1; use [`GridSize::new`] to get one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a grid size, rejecting empty grids.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidDimensions`] if `columns` or `rows` is zero.
    pub const fn new(columns: u32, rows: u32) -> MeshResult<Self> {
        if columns == 0 || rows == 0 {
            return Err(MeshError::InvalidDimensions { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn columns(self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(self) -> u32 {
        self.rows
    }

    /// Total number of cells (`columns * rows`).
    #[inline]
    #[must_use]
    pub const fn number_of_cells(self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Same as [`Self::number_of_cells`], widened so it never overflows.
    #[inline]
    #[must_use]
    pub const fn number_of_cells_u64(self) -> u64 {
        self.columns as u64 * self.rows as u64
    }

    /// Returns a grid with `amount` more columns and rows, saturating at
    /// `u32::MAX`.
    ///
    /// `grown_by(1)` turns a cell grid into its vertex grid. A [`GridSpec`]
    /// is small enough that its vertex grid never saturates.
    #[inline]
    #[must_use]
    pub const fn grown_by(self, amount: u32) -> Self {
        Self {
            columns: self.columns.saturating_add(amount),
            rows: self.rows.saturating_add(amount),
        }
    }

    /// Linear row-major index of a location.
    #[inline]
    #[must_use]
    pub const fn index_of(self, location: GridLocation) -> usize {
        location.row as usize * self.columns as usize + location.column as usize
    }

    /// Fractional position of a location relative to this grid's extent.
    #[inline]
    #[must_use]
    pub fn fractional_location(self, location: GridLocation) -> FractionalLocation {
        FractionalLocation {
            x: (f64::from(location.column) / f64::from(self.columns)).clamp(0.0, MAX_FRACTION),
            y: (f64::from(location.row) / f64::from(self.rows)).clamp(0.0, MAX_FRACTION),
        }
    }

    /// Returns the scan cell at a linear index, or `None` past the end.
    #[must_use]
    pub fn cell_at(self, index: usize) -> Option<ScanCell> {
        if index >= self.number_of_cells() {
            return None;
        }
        let columns = self.columns as usize;
        #[allow(clippy::cast_possible_truncation)]
        let location = GridLocation::new((index % columns) as u32, (index / columns) as u32);
        Some(ScanCell {
            location,
            index,
            fractional: self.fractional_location(location),
        })
    }

    /// Returns a row-major scanner over every cell of this grid.
    #[inline]
    #[must_use]
    pub const fn scanner(self) -> GridScanner {
        GridScanner::new(self)
    }
}

/// Immutable description of a terrain grid.
///
/// ```rust,ignore
/// let spec = GridSpec::new(64, 32)?
///     .with_cell_size(0.5, 0.5)?
///     .with_base_elevation(10.0);
/// assert_eq!(spec.number_of_vertices(), 65 * 33);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "GridSpecDef")]
pub struct GridSpec {
    grid: GridSize,
    cell_width: f64,
    cell_height: f64,
    base_elevation: f64,
}

impl GridSpec {
    /// Creates a grid spec with unit cells at elevation 0.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidDimensions`] if `columns` or `rows` is zero,
    /// or [`MeshError::IndexOverflow`] if the vertex grid has more than
    /// [`MAX_VERTICES`] points.
    pub fn new(columns: u32, rows: u32) -> MeshResult<Self> {
        let grid = GridSize::new(columns, rows)?;
        let vertices = (u64::from(columns) + 1).saturating_mul(u64::from(rows) + 1);
        if vertices > MAX_VERTICES {
            return Err(MeshError::IndexOverflow { vertices });
        }
        Ok(Self {
            grid,
            cell_width: 1.0,
            cell_height: 1.0,
            base_elevation: 0.0,
        })
    }

    /// Sets the physical size of one cell.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidCellSize`] unless both values are finite and positive.
    pub fn with_cell_size(mut self, width: f64, height: f64) -> MeshResult<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(MeshError::InvalidCellSize { width, height });
        }
        self.cell_width = width;
        self.cell_height = height;
        Ok(self)
    }

    /// Sets the reference elevation passed through to consumers.
    #[must_use]
    pub const fn with_base_elevation(mut self, elevation: f64) -> Self {
        self.base_elevation = elevation;
        self
    }

    /// Number of cell columns.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.grid.columns
    }

    /// Number of cell rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.grid.rows
    }

    /// Width of one cell.
    #[inline]
    #[must_use]
    pub const fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// Height (depth along Y) of one cell.
    #[inline]
    #[must_use]
    pub const fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Elevation of the terrain's reference plane.
    ///
    /// Carried for consumers positioning the mesh; vertex positions do not
    /// include it.
    #[inline]
    #[must_use]
    pub const fn base_elevation(&self) -> f64 {
        self.base_elevation
    }

    /// The cell grid (`columns x rows`).
    #[inline]
    #[must_use]
    pub const fn cell_grid(&self) -> GridSize {
        self.grid
    }

    /// The vertex grid (`(columns + 1) x (rows + 1)`).
    #[inline]
    #[must_use]
    pub const fn vertex_grid(&self) -> GridSize {
        self.grid.grown_by(1)
    }

    /// Number of cells (quads).
    #[inline]
    #[must_use]
    pub const fn number_of_cells(&self) -> usize {
        self.grid.number_of_cells()
    }

    /// Number of vertices, `(columns + 1) * (rows + 1)`.
    #[inline]
    #[must_use]
    pub const fn number_of_vertices(&self) -> usize {
        self.vertex_grid().number_of_cells()
    }

    /// Number of triangles, two per cell.
    #[inline]
    #[must_use]
    pub const fn number_of_triangles(&self) -> usize {
        self.number_of_cells() * 2
    }
}

/// Raw on-disk form of a [`GridSpec`], validated on conversion.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSpecDef {
    columns: u32,
    rows: u32,
    #[serde(default = "unit")]
    cell_width: f64,
    #[serde(default = "unit")]
    cell_height: f64,
    #[serde(default)]
    base_elevation: f64,
}

const fn unit() -> f64 {
    1.0
}

impl TryFrom<GridSpecDef> for GridSpec {
    type Error = MeshError;

    fn try_from(def: GridSpecDef) -> MeshResult<Self> {
        Ok(Self::new(def.columns, def.rows)?
            .with_cell_size(def.cell_width, def.cell_height)?
            .with_base_elevation(def.base_elevation))
    }
}
