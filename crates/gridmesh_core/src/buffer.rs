//! # Typed Buffers
//!
//! Exactly-sized, populate-once storage for mesh elements.
//!
//! ## Lifecycle
//!
//! 1. **Allocate**: reserve exactly `count * size_of::<T>()` bytes, or fail
//! 2. **Populate**: run a generator once per grid element, in scanner order
//!    or across a rayon pool
//! 3. **Read**: the buffer is immutable from then on
//!
//! Steps 1 and 2 happen inside the constructors, so a half-populated
//! buffer can never be observed.

use std::mem;

use bytemuck::Pod;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::error::{MeshError, MeshResult};
use crate::grid::{GridSize, ScanCell};

/// A fixed-length, contiguous buffer of plain-old-data elements.
///
/// # Example
///
/// ```rust,ignore
/// let grid = GridSize::new(4, 4)?;
/// let buffer = TypedBuffer::<f32>::populate(grid, |cell| cell.index as f32)?;
/// assert_eq!(buffer.len(), 16);
/// assert_eq!(buffer.as_bytes().len(), 64);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TypedBuffer<T: Pod> {
    /// Boxed slice: length is fixed for the buffer's whole life.
    elements: Box<[T]>,
}

impl<T: Pod> TypedBuffer<T> {
    /// Builds a buffer with one element per cell of `grid`.
    ///
    /// `generator` is called exactly once per cell, in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Allocation`] if the buffer cannot be allocated.
    pub fn populate<F>(grid: GridSize, mut generator: F) -> MeshResult<Self>
    where
        F: FnMut(ScanCell) -> T,
    {
        let mut elements = Self::allocate(grid.number_of_cells())?;
        for (slot, cell) in elements.iter_mut().zip(grid.scanner()) {
            *slot = generator(cell);
        }
        Ok(Self {
            elements: elements.into_boxed_slice(),
        })
    }

    /// Builds a buffer like [`Self::populate`] on a dedicated pool of
    /// `workers` threads, one element per rayon task.
    ///
    /// The result is identical to the sequential version as long as
    /// `generator` is pure.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Allocation`] if the buffer cannot be allocated,
    /// or [`MeshError::ThreadPool`] if the worker threads cannot be started.
    pub fn populate_parallel<F>(grid: GridSize, workers: usize, generator: F) -> MeshResult<Self>
    where
        T: Send,
        F: Fn(ScanCell) -> T + Sync,
    {
        let count = grid.number_of_cells();
        if workers <= 1 || count < 2 {
            return Self::populate(grid, generator);
        }

        let mut elements = Self::allocate(count)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("gridmesh-worker-{index}"))
            .build()
            .map_err(|e| MeshError::ThreadPool(e.to_string()))?;

        pool.install(|| {
            elements
                .par_iter_mut()
                .enumerate()
                .for_each(|(index, slot)| {
                    if let Some(cell) = grid.cell_at(index) {
                        *slot = generator(cell);
                    }
                });
        });

        Ok(Self {
            elements: elements.into_boxed_slice(),
        })
    }

    /// Reserves exactly `count` zeroed elements.
    fn allocate(count: usize) -> MeshResult<Vec<T>> {
        let alloc_error = |bytes| MeshError::Allocation {
            element: std::any::type_name::<T>(),
            count,
            bytes,
        };

        let bytes = count
            .checked_mul(mem::size_of::<T>())
            .filter(|&bytes| isize::try_from(bytes).is_ok())
            .ok_or_else(|| alloc_error(usize::MAX))?;

        let mut elements = Vec::new();
        elements
            .try_reserve_exact(count)
            .map_err(|_| alloc_error(bytes))?;
        elements.resize(count, T::zeroed());
        Ok(elements)
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the buffer holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Size of one element in bytes.
    #[inline]
    #[must_use]
    pub const fn stride(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Total size in bytes, always `len() * stride()`.
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        mem::size_of_val(&*self.elements)
    }

    /// Typed view of the elements.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Raw byte view for GPU upload or geometry assembly.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.elements)
    }

    /// Element at `index`, if any.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.elements.get(index)
    }

    /// Consumes the buffer, handing its elements to the caller.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.elements.into_vec()
    }
}

impl<T: Pod> AsRef<[T]> for TypedBuffer<T> {
    fn as_ref(&self) -> &[T] {
        &self.elements
    }
}
