//! Texture coordinates.

use gridmesh_core::ScanCell;

use crate::descriptor::Size2;
use crate::mesh::elements::TexturePoint;

/// Largest `f32` strictly below 1.0 that wrapping may produce.
const MAX_COORDINATE: f32 = 1.0 - f32::EPSILON / 2.0;

/// Maps vertex fractions to tiled, wrapped texture coordinates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TextureMapper {
    fudge: f64,
    scale: Size2,
}

impl TextureMapper {
    pub(crate) const fn new(fudge: f64, scale: Size2) -> Self {
        Self { fudge, scale }
    }

    /// `u = frac(x * fudge * sw)`, `v = frac((1 - y) * fudge * sh)`.
    pub(crate) fn point(self, cell: ScanCell) -> TexturePoint {
        let f = cell.fractional;
        TexturePoint {
            u: wrap(f.x * self.fudge * self.scale.width),
            v: wrap((1.0 - f.y) * self.fudge * self.scale.height),
        }
    }
}

/// Fractional part in `[0, 1)`, also after narrowing to `f32`.
#[allow(clippy::cast_possible_truncation)]
fn wrap(value: f64) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    (value.rem_euclid(1.0) as f32).min(MAX_COORDINATE)
}
