//! # Configuration
//!
//! Generator settings and mesh descriptor files, loaded from TOML.
//!
//! ## Descriptor File Format
//!
//! ```toml
//! [generator]
//! texture_fudge = 0.999
//! normal_mode = "slope"
//! build_mode = { mode = "parallel", workers = 4 }
//!
//! [grid]
//! columns = 128
//! rows = 128
//! cell_width = 0.5
//! cell_height = 0.5
//! base_elevation = 0.0
//!
//! [height]
//! scale = 12.0
//! noise = { seed = 42, frequency = 3.0, octaves = 5 }
//!
//! [mapping]
//! texture_scale = { width = 8.0, height = 8.0 }
//! base_texture_name = "Sand"
//! flat_color = { r = 0.8, g = 0.7, b = 0.5 }
//! ```

use std::path::Path;

use gridmesh_core::{GridSpec, MeshError, MeshResult};
use serde::Deserialize;

use crate::descriptor::{HeightSource, HeightStrategy, MeshDescriptor, Size2, SurfaceMapping};
use crate::mesh::elements::Rgba;
use crate::noise::{NoiseField, NoiseSeed};

/// Default texture-coordinate fudge factor.
///
/// Fractional positions are multiplied by this before wrapping so the last
/// vertex row/column never lands exactly on 1.0, which samplers read as
/// the start of the next tile. Tuned empirically.
pub const DEFAULT_TEXTURE_FUDGE: f64 = 0.999;

/// How buffers are populated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BuildMode {
    /// One pass per buffer on the calling thread.
    #[default]
    Sequential,
    /// Each buffer split into chunks populated on scoped worker threads.
    Parallel {
        /// Number of worker threads (at least 1).
        workers: usize,
    },
}

/// How vertex normals are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalMode {
    /// Constant `(0, 0, 1)` for every vertex, regardless of slope.
    #[default]
    Up,
    /// Central differences over neighbouring vertex elevations.
    Slope,
}

/// Mesh buffer generator settings.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Texture-coordinate fudge factor, strictly inside `(0.99, 1.0)`.
    pub texture_fudge: f64,
    /// Buffer population strategy.
    pub build_mode: BuildMode,
    /// Normal computation.
    pub normal_mode: NormalMode,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            texture_fudge: DEFAULT_TEXTURE_FUDGE,
            build_mode: BuildMode::Sequential,
            normal_mode: NormalMode::Up,
        }
    }
}

impl GeneratorConfig {
    /// Checks every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> MeshResult<()> {
        if !(self.texture_fudge > 0.99 && self.texture_fudge < 1.0) {
            return Err(MeshError::InvalidConfig(format!(
                "texture_fudge must be in (0.99, 1.0), got {}",
                self.texture_fudge
            )));
        }
        if let BuildMode::Parallel { workers: 0 } = self.build_mode {
            return Err(MeshError::InvalidConfig(
                "parallel build needs at least 1 worker".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] on malformed TOML or bad values.
    pub fn from_toml_str(text: &str) -> MeshResult<Self> {
        let config: Self = parse_toml(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> MeshResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

/// `[height]` section of a descriptor file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeightSection {
    /// Elevation of a fully dark sample.
    #[serde(default = "unit")]
    pub scale: f64,
    /// Tiling of the field over the grid.
    #[serde(default)]
    pub texture_scale: Size2,
    /// Procedural noise field; without it the terrain is flat.
    #[serde(default)]
    pub noise: Option<NoiseSection>,
}

/// `[height.noise]` section of a descriptor file.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseSection {
    /// Noise seed.
    pub seed: u64,
    /// Noise periods across the grid.
    #[serde(default = "default_frequency")]
    pub frequency: f64,
    /// Fractal layers.
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    /// Amplitude factor per octave.
    #[serde(default = "default_persistence")]
    pub persistence: f64,
}

/// `[mapping]` section of a descriptor file.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingSection {
    /// Fixed texture tiling.
    #[serde(default)]
    pub texture_scale: Option<Size2>,
    /// External texture set name.
    #[serde(default)]
    pub base_texture_name: Option<String>,
    /// Flat diffuse color.
    #[serde(default)]
    pub flat_color: Option<Rgba>,
}

/// A complete descriptor file.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshFile {
    /// Generator settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Grid geometry.
    pub grid: GridSpec,
    /// Optional elevation.
    #[serde(default)]
    pub height: Option<HeightSection>,
    /// Optional texture mapping.
    #[serde(default)]
    pub mapping: Option<MappingSection>,
}

impl MeshFile {
    /// Parses and validates a descriptor file from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidConfig`] on malformed TOML, bad generator
    /// settings, or an invalid grid.
    pub fn from_toml_str(text: &str) -> MeshResult<Self> {
        let file: Self = parse_toml(text)?;
        file.generator.validate()?;
        Ok(file)
    }

    /// Reads and parses a descriptor file.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("loaded mesh descriptor file {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Builds the mesh descriptor this file describes.
    #[must_use]
    pub fn descriptor(&self) -> MeshDescriptor {
        let mut descriptor = MeshDescriptor::new(self.grid);

        if let Some(section) = &self.height {
            let mut source = HeightSource::new()
                .with_height_scale(section.scale)
                .with_texture_scale(section.texture_scale);
            if let Some(noise) = section.noise {
                source = source
                    .with_field(
                        NoiseField::new(NoiseSeed::new(noise.seed))
                            .with_frequency(noise.frequency)
                            .with_octaves(noise.octaves)
                            .with_persistence(noise.persistence),
                    )
                    .with_strategy(HeightStrategy::Scaled);
            }
            descriptor = descriptor.with_height(source);
        }

        if let Some(section) = &self.mapping {
            let mut mapping =
                SurfaceMapping::new().with_texture_scale(section.texture_scale.unwrap_or_default());
            if let Some(name) = &section.base_texture_name {
                mapping = mapping.with_base_texture_name(name.clone());
            }
            if let Some(color) = section.flat_color {
                mapping = mapping.with_flat_color(color);
            }
            descriptor = descriptor.with_mapping(mapping);
        }

        descriptor
    }
}

fn parse_toml<T: serde::de::DeserializeOwned>(text: &str) -> MeshResult<T> {
    toml::from_str(text).map_err(|err| MeshError::InvalidConfig(err.to_string()))
}

const fn unit() -> f64 {
    1.0
}

const fn default_frequency() -> f64 {
    4.0
}

const fn default_octaves() -> u32 {
    4
}

const fn default_persistence() -> f64 {
    0.5
}
