//! Row-major grid scanning.

use super::{FractionalLocation, GridLocation, GridSize};

/// One element produced by a [`GridScanner`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanCell {
    /// Column and row inside the scanned grid.
    pub location: GridLocation,
    /// Linear index, `row * columns + column`.
    pub index: usize,
    /// Position relative to the scanned grid's extent, in `[0, 1)`.
    pub fractional: FractionalLocation,
}

/// Lazy, restartable, row-major walk over every cell of a grid.
///
/// The scanner has no side effects: cloning it or calling
/// [`GridScanner::restart`] yields the exact same sequence again.
///
/// # Example
///
/// ```rust,ignore
/// let grid = GridSize::new(2, 2)?;
/// let indices: Vec<usize> = grid.scanner().map(|cell| cell.index).collect();
/// assert_eq!(indices, vec![0, 1, 2, 3]);
/// ```
#[derive(Clone, Debug)]
pub struct GridScanner {
    grid: GridSize,
    next: usize,
}

impl GridScanner {
    /// Creates a scanner positioned on the first cell.
    #[inline]
    #[must_use]
    pub const fn new(grid: GridSize) -> Self {
        Self { grid, next: 0 }
    }

    /// The grid being scanned.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        self.grid
    }

    /// Rewinds to the first cell.
    #[inline]
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for GridScanner {
    type Item = ScanCell;

    #[inline]
    fn next(&mut self) -> Option<ScanCell> {
        let cell = self.grid.cell_at(self.next)?;
        self.next += 1;
        Some(cell)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.number_of_cells().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridScanner {}

impl std::iter::FusedIterator for GridScanner {}
