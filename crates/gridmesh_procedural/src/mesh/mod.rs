//! # Mesh Buffer Generation
//!
//! Turns a [`MeshDescriptor`] into the five buffers a renderer needs:
//!
//! | Buffer    | Grid         | Depends on            |
//! |-----------|--------------|-----------------------|
//! | vertices  | vertex grid  | grid, height source   |
//! | normals   | vertex grid  | vertices (slope mode) |
//! | indices   | cell grid    | grid                  |
//! | texcoords | vertex grid  | grid, mapping         |
//! | colors    | vertex grid  | vertices, mapping     |
//!
//! Every buffer except colors and slope normals can be built on its own.
//! [`MeshBufferGenerator::build`] builds all of them or none.

pub mod elements;
pub mod sources;

mod indices;
mod normals;
mod texcoords;
mod vertices;

use std::mem;

use bytemuck::Pod;
use gridmesh_core::{
    FractionalLocation, GridSize, MeshError, MeshResult, ScanCell, TypedBuffer,
};

use crate::config::{BuildMode, GeneratorConfig, NormalMode};
use crate::descriptor::{MeshDescriptor, Size2};

use elements::{QuadIndices, Rgba, TexturePoint, Vector3};
use indices::QuadLayout;
use normals::SlopeNormals;
use sources::{GeometryElement, GeometrySource, PrimitiveType, Semantic};
use texcoords::TextureMapper;
use vertices::VertexSampler;

/// Builds mesh buffers from descriptors.
///
/// Holds only settings; one generator can serve any number of descriptors,
/// from any number of threads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshBufferGenerator {
    config: GeneratorConfig,
}

impl MeshBufferGenerator {
    /// Creates a generator.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: GeneratorConfig) -> MeshResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The generator's settings.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn populate<T, F>(&self, grid: GridSize, generator: F) -> MeshResult<TypedBuffer<T>>
    where
        T: Pod + Send,
        F: Fn(ScanCell) -> T + Sync,
    {
        match self.config.build_mode {
            BuildMode::Sequential => TypedBuffer::populate(grid, generator),
            BuildMode::Parallel { workers } => {
                TypedBuffer::populate_parallel(grid, workers, generator)
            }
        }
    }

    /// Vertex positions, one per vertex-grid point in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Allocation`] if the buffer cannot be allocated.
    pub fn vertices(&self, descriptor: &MeshDescriptor) -> MeshResult<TypedBuffer<Vector3>> {
        let sampler = VertexSampler::new(descriptor);
        self.populate(descriptor.grid.vertex_grid(), |cell| sampler.position(cell))
    }

    /// Vertex normals for a vertex buffer built from the same descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::BufferMismatch`] if `vertices` does not match the
    /// grid, or [`MeshError::Allocation`].
    pub fn normals(
        &self,
        descriptor: &MeshDescriptor,
        vertices: &TypedBuffer<Vector3>,
    ) -> MeshResult<TypedBuffer<Vector3>> {
        let grid = descriptor.grid.vertex_grid();
        match self.config.normal_mode {
            NormalMode::Up => {
                check_vertex_count(grid, vertices)?;
                self.populate(grid, |_| Vector3::UP)
            }
            NormalMode::Slope => {
                let slope = SlopeNormals::new(grid, vertices.as_slice())?;
                self.populate(grid, |cell| slope.normal(cell))
            }
        }
    }

    /// Two counter-clockwise triangles per cell, in row-major cell order.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Allocation`] if the buffer cannot be allocated.
    pub fn indices(&self, descriptor: &MeshDescriptor) -> MeshResult<TypedBuffer<QuadIndices>> {
        let layout = QuadLayout::new(&descriptor.grid);
        self.populate(descriptor.grid.cell_grid(), |cell| layout.quad(cell))
    }

    /// Texture coordinates in `[0, 1)`, one per vertex.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::MissingTextureSource`] if the mapping derives its
    /// tiling from a bitmap that is not set, or [`MeshError::Allocation`].
    pub fn texture_coordinates(
        &self,
        descriptor: &MeshDescriptor,
    ) -> MeshResult<TypedBuffer<TexturePoint>> {
        let scale = match &descriptor.mapping {
            Some(mapping) => mapping.resolve_texture_scale(&descriptor.grid)?,
            None => Size2::ONE,
        };
        let mapper = TextureMapper::new(self.config.texture_fudge, scale);
        self.populate(descriptor.grid.vertex_grid(), |cell| mapper.point(cell))
    }

    /// Per-vertex colors, or `None` unless the mapping has a color function.
    ///
    /// The function sees the finished vertex position; its value and
    /// fractional arguments are always 0.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::BufferMismatch`] if `vertices` does not match the
    /// grid, or [`MeshError::Allocation`].
    pub fn colors(
        &self,
        descriptor: &MeshDescriptor,
        vertices: &TypedBuffer<Vector3>,
    ) -> MeshResult<Option<TypedBuffer<Rgba>>> {
        let Some(color_fn) = descriptor.color_fn() else {
            return Ok(None);
        };
        let grid = descriptor.grid.vertex_grid();
        check_vertex_count(grid, vertices)?;
        let positions = vertices.as_slice();
        self.populate(grid, |cell| {
            color_fn(0.0, cell.location, FractionalLocation::ZERO, positions[cell.index])
        })
        .map(Some)
    }

    /// Builds every buffer for `descriptor`.
    ///
    /// Either all buffers are returned or none: buffers built before a
    /// failure are dropped.
    ///
    /// # Errors
    ///
    /// Any error from the individual buffer builders.
    pub fn build(&self, descriptor: &MeshDescriptor) -> MeshResult<MeshBuffers> {
        tracing::debug!(
            "building mesh buffers for {}x{} grid ({:?}, {:?} normals)",
            descriptor.grid.columns(),
            descriptor.grid.rows(),
            self.config.build_mode,
            self.config.normal_mode
        );

        match self.build_all(descriptor) {
            Ok(buffers) => {
                tracing::debug!(
                    "built {} vertices, {} triangles ({} bytes)",
                    buffers.vertex_count(),
                    buffers.triangle_count(),
                    buffers.byte_len()
                );
                Ok(buffers)
            }
            Err(err) => {
                tracing::warn!("mesh build failed: {}", err);
                Err(err)
            }
        }
    }

    fn build_all(&self, descriptor: &MeshDescriptor) -> MeshResult<MeshBuffers> {
        let vertices = self.vertices(descriptor)?;
        tracing::debug!("vertices: {} bytes", vertices.byte_len());
        let normals = self.normals(descriptor, &vertices)?;
        tracing::debug!("normals: {} bytes", normals.byte_len());
        let indices = self.indices(descriptor)?;
        tracing::debug!("indices: {} bytes", indices.byte_len());
        let texture_coordinates = self.texture_coordinates(descriptor)?;
        tracing::debug!("texture coordinates: {} bytes", texture_coordinates.byte_len());
        let colors = self.colors(descriptor, &vertices)?;
        if let Some(colors) = &colors {
            tracing::debug!("colors: {} bytes", colors.byte_len());
        }

        Ok(MeshBuffers {
            vertices,
            normals,
            indices,
            texture_coordinates,
            colors,
        })
    }
}

fn check_vertex_count(grid: GridSize, vertices: &TypedBuffer<Vector3>) -> MeshResult<()> {
    let expected = grid.number_of_cells();
    if vertices.len() == expected {
        Ok(())
    } else {
        Err(MeshError::BufferMismatch {
            expected,
            actual: vertices.len(),
        })
    }
}

/// A complete, immutable set of mesh buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshBuffers {
    vertices: TypedBuffer<Vector3>,
    normals: TypedBuffer<Vector3>,
    indices: TypedBuffer<QuadIndices>,
    texture_coordinates: TypedBuffer<TexturePoint>,
    colors: Option<TypedBuffer<Rgba>>,
}

/// Owned buffers taken out of [`MeshBuffers`].
#[derive(Clone, Debug, PartialEq)]
pub struct MeshParts {
    /// Vertex positions.
    pub vertices: Vec<Vector3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// Two triangles per cell.
    pub indices: Vec<QuadIndices>,
    /// Texture coordinates.
    pub texture_coordinates: Vec<TexturePoint>,
    /// Per-vertex colors, if generated.
    pub colors: Option<Vec<Rgba>>,
}

impl MeshBuffers {
    /// Vertex positions.
    #[must_use]
    pub const fn vertices(&self) -> &TypedBuffer<Vector3> {
        &self.vertices
    }

    /// Vertex normals.
    #[must_use]
    pub const fn normals(&self) -> &TypedBuffer<Vector3> {
        &self.normals
    }

    /// Triangle indices, one quad per cell.
    #[must_use]
    pub const fn indices(&self) -> &TypedBuffer<QuadIndices> {
        &self.indices
    }

    /// Texture coordinates.
    #[must_use]
    pub const fn texture_coordinates(&self) -> &TypedBuffer<TexturePoint> {
        &self.texture_coordinates
    }

    /// Per-vertex colors, if a color function was set.
    #[must_use]
    pub const fn colors(&self) -> Option<&TypedBuffer<Rgba>> {
        self.colors.as_ref()
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() * 2
    }

    /// Total size of all buffers in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.vertices.byte_len()
            + self.normals.byte_len()
            + self.indices.byte_len()
            + self.texture_coordinates.byte_len()
            + self.colors.as_ref().map_or(0, TypedBuffer::byte_len)
    }

    /// Per-vertex streams; the color stream only when colors were generated.
    #[must_use]
    pub fn sources(&self) -> Vec<GeometrySource<'_>> {
        let mut sources = vec![
            GeometrySource::float(Semantic::Vertex, &self.vertices),
            GeometrySource::float(Semantic::Normal, &self.normals),
            GeometrySource::float(Semantic::TextureCoordinate, &self.texture_coordinates),
        ];
        if let Some(colors) = &self.colors {
            sources.push(GeometrySource::float(Semantic::Color, colors));
        }
        sources
    }

    /// The triangle index stream.
    #[must_use]
    pub fn element(&self) -> GeometryElement<'_> {
        GeometryElement {
            data: self.indices.as_bytes(),
            primitive_type: PrimitiveType::Triangles,
            primitive_count: self.triangle_count(),
            bytes_per_index: mem::size_of::<i32>(),
        }
    }

    /// Takes ownership of the buffers.
    #[must_use]
    pub fn into_parts(self) -> MeshParts {
        MeshParts {
            vertices: self.vertices.into_vec(),
            normals: self.normals.into_vec(),
            indices: self.indices.into_vec(),
            texture_coordinates: self.texture_coordinates.into_vec(),
            colors: self.colors.map(TypedBuffer::into_vec),
        }
    }
}
