//! # GRIDMESH Core
//!
//! Grid topology and typed buffers shared by every mesh generator.
//!
//! ## Architecture Rules
//!
//! 1. **Exact sizing** - A buffer is allocated once, for exactly the elements it holds
//! 2. **No partial state** - Buffers are fully populated inside their constructor
//! 3. **Pure scanning** - Grid coordinates come from a side-effect-free scanner
//!
//! ## Example
//!
//! ```rust,ignore
//! use gridmesh_core::{GridSpec, TypedBuffer};
//!
//! let spec = GridSpec::new(4, 4)?;
//! let heights = TypedBuffer::<f32>::populate(spec.vertex_grid(), |_| 0.0)?;
//! assert_eq!(heights.len(), 25);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffer;
pub mod error;
pub mod grid;

pub use buffer::TypedBuffer;
pub use error::{MeshError, MeshResult};
pub use grid::{
    FractionalLocation, GridLocation, GridScanner, GridSize, GridSpec, ScanCell, MAX_VERTICES,
};
