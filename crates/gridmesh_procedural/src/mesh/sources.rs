//! Geometry source descriptors.
//!
//! Describes each generated buffer the way scene-graph and GPU APIs expect
//! to receive vertex data: raw bytes plus component count, component size,
//! offset and stride.

use std::mem;

use bytemuck::Pod;
use gridmesh_core::TypedBuffer;

/// What a geometry source feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Semantic {
    /// Vertex positions.
    Vertex,
    /// Vertex normals.
    Normal,
    /// Texture coordinates.
    TextureCoordinate,
    /// Per-vertex colors.
    Color,
}

/// How a geometry element's indices are grouped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Three indices per primitive.
    Triangles,
}

/// A per-vertex data stream borrowed from [`super::MeshBuffers`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometrySource<'a> {
    /// What the stream feeds.
    pub semantic: Semantic,
    /// Tightly packed element bytes.
    pub data: &'a [u8],
    /// Number of vectors (one per vertex).
    pub vector_count: usize,
    /// True when components are floating point.
    pub uses_float_components: bool,
    /// Components per vector.
    pub components_per_vector: usize,
    /// Size of one component in bytes.
    pub bytes_per_component: usize,
    /// Offset of the first vector in bytes.
    pub data_offset: usize,
    /// Distance between vectors in bytes.
    pub data_stride: usize,
}

impl<'a> GeometrySource<'a> {
    /// Describes a buffer of `f32` vectors.
    pub(crate) fn float<T: Pod>(semantic: Semantic, buffer: &'a TypedBuffer<T>) -> Self {
        let component = mem::size_of::<f32>();
        Self {
            semantic,
            data: buffer.as_bytes(),
            vector_count: buffer.len(),
            uses_float_components: true,
            components_per_vector: buffer.stride() / component,
            bytes_per_component: component,
            data_offset: 0,
            data_stride: buffer.stride(),
        }
    }
}

/// The index stream borrowed from [`super::MeshBuffers`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeometryElement<'a> {
    /// Raw index bytes.
    pub data: &'a [u8],
    /// Primitive grouping.
    pub primitive_type: PrimitiveType,
    /// Number of primitives.
    pub primitive_count: usize,
    /// Size of one index in bytes.
    pub bytes_per_index: usize,
}
