//! # Mesh Descriptors
//!
//! Everything the generator needs to know about one terrain:
//!
//! - **Grid**: cell counts, cell size, base elevation ([`GridSpec`])
//! - **Height source** (optional): a grayscale field plus a height strategy
//! - **Surface mapping** (optional): texture tiling, texture sources, colors
//!
//! Optional parts select well-defined defaults when absent: a flat plane,
//! unit texture tiling, and no color buffer.
//!
//! Height and color functions are explicit strategy variants rather than
//! nullable closures, so the default behavior can be matched on and tested.

use std::fmt;
use std::sync::Arc;

use gridmesh_core::{FractionalLocation, GridLocation, GridSpec, MeshError, MeshResult};
use serde::Deserialize;

use crate::field::GrayscaleField;
use crate::mesh::elements::{Rgba, Vector3};

/// `(sampled value, grid location, fractional location) -> elevation`.
pub type HeightFn = Arc<dyn Fn(f64, GridLocation, FractionalLocation) -> f64 + Send + Sync>;

/// `(sampled value, grid location, fractional location, vertex position) -> color`.
pub type ColorFn =
    Arc<dyn Fn(f64, GridLocation, FractionalLocation, Vector3) -> Rgba + Send + Sync>;

/// Width and height pair, used for tiling factors.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Size2 {
    /// Horizontal component.
    pub width: f64,
    /// Vertical component.
    pub height: f64,
}

impl Size2 {
    /// `(1, 1)`: no tiling.
    pub const ONE: Self = Self::new(1.0, 1.0);

    /// Creates a size.
    #[inline]
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size2 {
    fn default() -> Self {
        Self::ONE
    }
}

/// Turns the value sampled from a height source into an elevation.
#[derive(Clone, Default)]
pub enum HeightStrategy {
    /// Every vertex at elevation 0.
    #[default]
    Flat,
    /// Sampled value times the source's `height_scale`.
    Scaled,
    /// User function; must be pure and reentrant.
    Custom(HeightFn),
}

impl HeightStrategy {
    /// Wraps a closure as a custom strategy.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, GridLocation, FractionalLocation) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Elevation for one vertex.
    #[must_use]
    pub fn elevation(
        &self,
        value: f64,
        height_scale: f64,
        location: GridLocation,
        fractional: FractionalLocation,
    ) -> f64 {
        match self {
            Self::Flat => 0.0,
            Self::Scaled => value * height_scale,
            Self::Custom(f) => f(value, location, fractional),
        }
    }
}

impl fmt::Debug for HeightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => f.write_str("Flat"),
            Self::Scaled => f.write_str("Scaled"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Produces per-vertex colors.
#[derive(Clone, Default)]
pub enum ColorStrategy {
    /// No color buffer.
    #[default]
    None,
    /// User function; must be pure and reentrant.
    Custom(ColorFn),
}

impl ColorStrategy {
    /// Wraps a closure as a custom strategy.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, GridLocation, FractionalLocation, Vector3) -> Rgba + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Returns true when no color buffer will be produced.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for ColorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Elevation configuration.
#[derive(Clone, Debug)]
pub struct HeightSource {
    /// Multiplier used by [`HeightStrategy::Scaled`].
    pub height_scale: f64,
    /// Tiling applied to field lookups; `(1, 1)` maps the field once over the grid.
    pub texture_scale: Size2,
    /// Optional grayscale field; without one the strategy is fed 0.
    pub field: Option<Arc<dyn GrayscaleField>>,
    /// How sampled values become elevations.
    pub strategy: HeightStrategy,
}

impl Default for HeightSource {
    fn default() -> Self {
        Self {
            height_scale: 1.0,
            texture_scale: Size2::ONE,
            field: None,
            strategy: HeightStrategy::Flat,
        }
    }
}

impl HeightSource {
    /// A flat source with no field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grayscale field.
    #[must_use]
    pub fn with_field(mut self, field: impl GrayscaleField + 'static) -> Self {
        self.field = Some(Arc::new(field));
        self
    }

    /// Sets the height strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: HeightStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the height scale.
    #[must_use]
    pub fn with_height_scale(mut self, height_scale: f64) -> Self {
        self.height_scale = height_scale;
        self
    }

    /// Sets the field lookup tiling.
    #[must_use]
    pub fn with_texture_scale(mut self, texture_scale: Size2) -> Self {
        self.texture_scale = texture_scale;
        self
    }

    /// Input value for the height strategy at a vertex.
    ///
    /// `1 - red` when a field is set (darker = higher input), 0 without a
    /// field, and `None` when the field has no data at that position.
    #[must_use]
    pub fn height_input(&self, fractional: FractionalLocation) -> Option<f64> {
        let Some(field) = &self.field else {
            return Some(0.0);
        };
        let x = tile(fractional.x, self.texture_scale.width);
        let y = tile(fractional.y, self.texture_scale.height);
        field.sample(x, y).map(|red| 1.0 - red.clamp(0.0, 1.0))
    }
}

/// Applies a tiling factor to a fraction in `[0, 1)`; identity for scale 1.
#[inline]
fn tile(fraction: f64, scale: f64) -> f64 {
    if (scale - 1.0).abs() < f64::EPSILON {
        fraction
    } else {
        (fraction * scale).rem_euclid(1.0)
    }
}

/// RGBA8 texture bitmap supplied by the caller (never decoded here).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureBitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TextureBitmap {
    /// Wraps RGBA8 pixel data, row-major.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidDimensions`] for an empty size, or
    /// [`MeshError::InvalidBitmap`] if `rgba` is not `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> MeshResult<Self> {
        if width == 0 || height == 0 {
            return Err(MeshError::InvalidDimensions {
                columns: width,
                rows: height,
            });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(MeshError::InvalidBitmap {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }

    /// Width in texels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }
}

/// How many times the texture repeats across the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureScale {
    /// Fixed tiling factors.
    Uniform(Size2),
    /// Derived from the texture bitmap: each cell covers `texels_per_cell`
    /// texels along both axes. Requires [`SurfaceMapping::texture_bitmap`].
    FromBitmap {
        /// Texels covered by one cell edge.
        texels_per_cell: f64,
    },
}

impl Default for TextureScale {
    fn default() -> Self {
        Self::Uniform(Size2::ONE)
    }
}

/// Texture and color configuration.
#[derive(Clone, Debug, Default)]
pub struct SurfaceMapping {
    /// Texture tiling.
    pub texture_scale: TextureScale,
    /// Base name of an external texture set, passed through to consumers.
    pub base_texture_name: Option<String>,
    /// Precomputed texture, passed through to consumers.
    pub texture_bitmap: Option<Arc<TextureBitmap>>,
    /// Flat diffuse color, passed through to consumers.
    pub flat_color: Option<Rgba>,
    /// Per-vertex color strategy; a color buffer exists only for `Custom`.
    pub color: ColorStrategy,
}

impl SurfaceMapping {
    /// Mapping with unit tiling and nothing else.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets fixed tiling factors.
    #[must_use]
    pub fn with_texture_scale(mut self, scale: Size2) -> Self {
        self.texture_scale = TextureScale::Uniform(scale);
        self
    }

    /// Derives tiling from the texture bitmap.
    #[must_use]
    pub fn with_bitmap_texture_scale(mut self, texels_per_cell: f64) -> Self {
        self.texture_scale = TextureScale::FromBitmap { texels_per_cell };
        self
    }

    /// Sets the texture base name.
    #[must_use]
    pub fn with_base_texture_name(mut self, name: impl Into<String>) -> Self {
        self.base_texture_name = Some(name.into());
        self
    }

    /// Sets the precomputed texture bitmap.
    #[must_use]
    pub fn with_texture_bitmap(mut self, bitmap: TextureBitmap) -> Self {
        self.texture_bitmap = Some(Arc::new(bitmap));
        self
    }

    /// Sets the flat color.
    #[must_use]
    pub fn with_flat_color(mut self, color: Rgba) -> Self {
        self.flat_color = Some(color);
        self
    }

    /// Sets the color strategy.
    #[must_use]
    pub fn with_color(mut self, color: ColorStrategy) -> Self {
        self.color = color;
        self
    }

    /// Resolves the tiling factors for a grid.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::MissingTextureSource`] if tiling derives from a
    /// bitmap that is not set, or [`MeshError::InvalidConfig`] for a
    /// non-positive texel count.
    pub fn resolve_texture_scale(&self, grid: &GridSpec) -> MeshResult<Size2> {
        match self.texture_scale {
            TextureScale::Uniform(scale) => Ok(scale),
            TextureScale::FromBitmap { texels_per_cell } => {
                if !(texels_per_cell.is_finite() && texels_per_cell > 0.0) {
                    return Err(MeshError::InvalidConfig(format!(
                        "texels_per_cell must be > 0, got {texels_per_cell}"
                    )));
                }
                let bitmap = self.texture_bitmap.as_ref().ok_or_else(|| {
                    MeshError::MissingTextureSource(
                        "texture scale derives from a texture bitmap, but none is set".into(),
                    )
                })?;
                Ok(Size2::new(
                    f64::from(grid.columns()) * texels_per_cell / f64::from(bitmap.width()),
                    f64::from(grid.rows()) * texels_per_cell / f64::from(bitmap.height()),
                ))
            }
        }
    }
}

/// Full description of one terrain mesh.
///
/// Owned by the caller; the generator only borrows it for one build.
#[derive(Clone, Debug)]
pub struct MeshDescriptor {
    /// Grid geometry.
    pub grid: GridSpec,
    /// Optional elevation source.
    pub height: Option<HeightSource>,
    /// Optional texture/color configuration.
    pub mapping: Option<SurfaceMapping>,
}

impl MeshDescriptor {
    /// A flat, unmapped mesh over `grid`.
    #[must_use]
    pub const fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            height: None,
            mapping: None,
        }
    }

    /// Sets the height source.
    #[must_use]
    pub fn with_height(mut self, height: HeightSource) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the surface mapping.
    #[must_use]
    pub fn with_mapping(mut self, mapping: SurfaceMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// The color function, if the mapping sets one.
    #[must_use]
    pub fn color_fn(&self) -> Option<&ColorFn> {
        match self.mapping.as_ref().map(|m| &m.color) {
            Some(ColorStrategy::Custom(f)) => Some(f),
            _ => None,
        }
    }
}
