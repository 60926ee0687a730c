//! # Mesh Error Types
//!
//! All errors that can occur while describing a grid or building its buffers.

use thiserror::Error;

/// Errors that can occur in the mesh generation pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A grid was described with zero columns or rows.
    #[error("invalid grid dimensions: {columns}x{rows} (both must be >= 1)")]
    InvalidDimensions {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },

    /// A cell was described with a non-positive or non-finite size.
    #[error("invalid cell size: {width}x{height} (both must be finite and > 0)")]
    InvalidCellSize {
        /// Requested cell width.
        width: f64,
        /// Requested cell height.
        height: f64,
    },

    /// The allocator could not satisfy a buffer request.
    #[error("cannot allocate {count} elements of {element} ({bytes} bytes)")]
    Allocation {
        /// Element type name.
        element: &'static str,
        /// Number of elements requested.
        count: usize,
        /// Number of bytes requested (saturated on overflow).
        bytes: usize,
    },

    /// The vertex grid has more points than a 32-bit signed index can address.
    #[error("vertex grid of {vertices} points exceeds the 32-bit index range")]
    IndexOverflow {
        /// Number of vertices the grid would produce.
        vertices: u64,
    },

    /// A buffer was combined with a grid of a different size.
    #[error("buffer holds {actual} elements, grid needs {expected}")]
    BufferMismatch {
        /// Elements the grid requires.
        expected: usize,
        /// Elements the buffer holds.
        actual: usize,
    },

    /// Worker threads for parallel population could not be started.
    #[error("cannot start worker threads: {0}")]
    ThreadPool(String),

    /// Texture coordinates need a texture source that was not provided.
    #[error("missing texture source: {0}")]
    MissingTextureSource(String),

    /// Bitmap data does not match its declared size.
    #[error("invalid bitmap: {width}x{height} needs {expected} values, got {actual}")]
    InvalidBitmap {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
        /// Values required by the declared size.
        expected: usize,
        /// Values actually supplied.
        actual: usize,
    },

    /// A configuration value is out of range or a config file is malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A descriptor or config file could not be read.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MeshError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;
