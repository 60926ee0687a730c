//! Element layouts of the generated buffers.
//!
//! Every type here is `#[repr(C)]` and `Pod`, so a buffer of them can be
//! handed to a GPU or geometry assembler as raw bytes.
//!
//! | Buffer    | Element            | Layout     | Stride |
//! |-----------|--------------------|------------|--------|
//! | vertices  | [`Vector3`]        | 3 x f32    | 12     |
//! | normals   | [`Vector3`]        | 3 x f32    | 12     |
//! | indices   | [`QuadIndices`]    | 6 x i32    | 24     |
//! | texcoords | [`TexturePoint`]   | 2 x f32    | 8      |
//! | colors    | [`Rgba`]           | 4 x f32    | 16     |

use bytemuck::{Pod, Zeroable};
use serde::Deserialize;

/// Position or direction in mesh space.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component (elevation for positions).
    pub z: f32,
}

impl Vector3 {
    /// The up direction, `(0, 0, 1)`.
    pub const UP: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or [`Self::UP`] for a zero vector.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            Self::UP
        }
    }
}

/// Texture coordinate, both components in `[0, 1)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TexturePoint {
    /// Horizontal coordinate.
    pub u: f32,
    /// Vertical coordinate (origin at the top of the texture).
    pub v: f32,
}

/// One triangle as three vertex indices.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TriangleIndices {
    /// First corner.
    pub i0: i32,
    /// Second corner.
    pub i1: i32,
    /// Third corner.
    pub i2: i32,
}

impl TriangleIndices {
    /// Creates a triangle.
    #[inline]
    #[must_use]
    pub const fn new(i0: i32, i1: i32, i2: i32) -> Self {
        Self { i0, i1, i2 }
    }

    /// The corners as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [i32; 3] {
        [self.i0, self.i1, self.i2]
    }
}

/// The two triangles covering one grid cell.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct QuadIndices {
    /// Upper-left triangle: top-right, top-left, bottom-left.
    pub first: TriangleIndices,
    /// Lower-right triangle: top-right, bottom-left, bottom-right.
    pub second: TriangleIndices,
}

/// Linear RGBA color, components nominally in `[0, 1]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    #[serde(default = "opaque")]
    pub a: f32,
}

const fn opaque() -> f32 {
    1.0
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray of the given intensity.
    #[inline]
    #[must_use]
    pub const fn gray(value: f32) -> Self {
        Self::new(value, value, value, 1.0)
    }
}
