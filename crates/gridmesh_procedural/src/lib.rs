//! # GRIDMESH Procedural
//!
//! Terrain mesh buffers from a grid, a grayscale height field and a
//! surface mapping.
//!
//! ## Pipeline
//!
//! ```text
//! MeshFile (TOML) ──► MeshDescriptor ──► MeshBufferGenerator::build ──► MeshBuffers
//!                        │                                                │
//!                        ├─ GridSpec                                      ├─ sources()
//!                        ├─ HeightSource (field + strategy)               └─ element()
//!                        └─ SurfaceMapping (tiling + colors)
//! ```
//!
//! ## Determinism
//!
//! Same descriptor + same config = same bytes, in sequential and parallel
//! build modes alike. Noise fields are seeded and contain no global state.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod descriptor;
pub mod field;
pub mod mesh;
pub mod noise;

pub use config::{BuildMode, GeneratorConfig, MeshFile, NormalMode, DEFAULT_TEXTURE_FUDGE};
pub use descriptor::{
    ColorFn, ColorStrategy, HeightFn, HeightSource, HeightStrategy, MeshDescriptor, Size2,
    SurfaceMapping, TextureBitmap, TextureScale,
};
pub use field::{GrayscaleField, HeightField, SamplingMode};
pub use mesh::elements::{QuadIndices, Rgba, TexturePoint, TriangleIndices, Vector3};
pub use mesh::sources::{GeometryElement, GeometrySource, PrimitiveType, Semantic};
pub use mesh::{MeshBufferGenerator, MeshBuffers, MeshParts};
pub use noise::{NoiseField, NoiseSeed, SimplexNoise};
