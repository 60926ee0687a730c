//! # Grayscale Fields
//!
//! A grayscale field is anything that can be sampled at a fractional
//! position and return a red-channel intensity in `[0, 1]`. The mesh
//! generator never decodes images itself: callers hand it a field.
//!
//! Row 0 of a bitmap field is at fractional `y = 0`.

use std::fmt;

use gridmesh_core::{MeshError, MeshResult};

/// A read-only 2D intensity source.
///
/// Implementations must be pure: the same position always yields the
/// same value, and sampling may happen from several threads at once.
pub trait GrayscaleField: Send + Sync + fmt::Debug {
    /// Samples the red channel at `(x, y)` in fractional coordinates.
    ///
    /// Returns a value in `[0, 1]`, or `None` when the position falls
    /// outside the field.
    fn sample(&self, x: f64, y: f64) -> Option<f64>;
}

/// How a [`HeightField`] reads between pixel centers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplingMode {
    /// Value of the pixel containing the position.
    #[default]
    Nearest,
    /// Interpolation of the four surrounding pixel centers.
    Bilinear,
}

/// Grayscale bitmap held in memory as normalized intensities.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: u32,
    height: u32,
    values: Vec<f32>,
    sampling: SamplingMode,
}

impl HeightField {
    /// Creates a field from normalized values, row-major, clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidDimensions`] for an empty size, or
    /// [`MeshError::InvalidBitmap`] if `values` has the wrong length.
    pub fn from_values(width: u32, height: u32, mut values: Vec<f32>) -> MeshResult<Self> {
        if width == 0 || height == 0 {
            return Err(MeshError::InvalidDimensions {
                columns: width,
                rows: height,
            });
        }
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(MeshError::InvalidBitmap {
                width,
                height,
                expected,
                actual: values.len(),
            });
        }
        for value in &mut values {
            *value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        }
        Ok(Self {
            width,
            height,
            values,
            sampling: SamplingMode::Nearest,
        })
    }

    /// Creates a field from 8-bit luminance pixels, row-major.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_values`].
    pub fn from_luma8(width: u32, height: u32, pixels: &[u8]) -> MeshResult<Self> {
        let values = pixels.iter().map(|&p| f32::from(p) / 255.0).collect();
        Self::from_values(width, height, values)
    }

    /// A 1x1 field returning `value` everywhere inside `[0, 1]`.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        Self {
            width: 1,
            height: 1,
            values: vec![value],
            sampling: SamplingMode::Nearest,
        }
    }

    /// Selects the sampling mode.
    #[must_use]
    pub fn with_sampling(mut self, sampling: SamplingMode) -> Self {
        self.sampling = sampling;
        self
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> f64 {
        f64::from(self.values[y as usize * self.width as usize + x as usize])
    }

    /// Pixel index along an axis of `size` pixels for fraction `f`.
    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn nearest_index(f: f64, size: u32) -> u32 {
        ((f * f64::from(size)).floor() as u32).min(size - 1)
    }

    /// Lower pixel, upper pixel and blend weight along an axis.
    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bilinear_span(f: f64, size: u32) -> (u32, u32, f64) {
        let max = f64::from(size - 1);
        let center = (f * f64::from(size) - 0.5).clamp(0.0, max);
        let low = center.floor();
        let low_index = low as u32;
        (low_index, (low_index + 1).min(size - 1), center - low)
    }
}

impl GrayscaleField for HeightField {
    fn sample(&self, x: f64, y: f64) -> Option<f64> {
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return None;
        }
        let value = match self.sampling {
            SamplingMode::Nearest => self.pixel(
                Self::nearest_index(x, self.width),
                Self::nearest_index(y, self.height),
            ),
            SamplingMode::Bilinear => {
                let (x0, x1, tx) = Self::bilinear_span(x, self.width);
                let (y0, y1, ty) = Self::bilinear_span(y, self.height);
                let bottom = self.pixel(x0, y0) * (1.0 - tx) + self.pixel(x1, y0) * tx;
                let top = self.pixel(x0, y1) * (1.0 - tx) + self.pixel(x1, y1) * tx;
                bottom * (1.0 - ty) + top * ty
            }
        };
        Some(value)
    }
}
