//! # Procedural Grayscale Fields
//!
//! Seeded 2D simplex noise, exposed as a [`GrayscaleField`] so a terrain
//! can be generated without any source image.
//!
//! ## Determinism Guarantee
//!
//! Given the same [`NoiseSeed`] and parameters, a [`NoiseField`] samples
//! **exactly** the same values on any platform, any time.

use crate::field::GrayscaleField;

/// Seed for a noise field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NoiseSeed(u64);

impl NoiseSeed {
    /// Creates a new seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Default for NoiseSeed {
    fn default() -> Self {
        Self(0x5EED_6A1D_0000_0001)
    }
}

/// Gradient directions for 2D simplex corners.
const GRADIENTS: [[f64; 2]; 8] = [
    [1.0, 0.0],
    [1.0, 1.0],
    [0.0, 1.0],
    [-1.0, 1.0],
    [-1.0, 0.0],
    [-1.0, -1.0],
    [0.0, -1.0],
    [1.0, -1.0],
];

/// 2D simplex noise in `[-1, 1]`.
#[derive(Clone)]
pub struct SimplexNoise {
    /// Shuffled 0..=255, stored twice so `perm[i + perm[j]]` never wraps.
    perm: [u8; 512],
}

impl std::fmt::Debug for SimplexNoise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimplexNoise").finish_non_exhaustive()
    }
}

impl SimplexNoise {
    /// Skew factor, `(sqrt(3) - 1) / 2`.
    const SKEW: f64 = 0.366_025_403_784_438_6;
    /// Unskew factor, `(3 - sqrt(3)) / 6`.
    const UNSKEW: f64 = 0.211_324_865_405_187_1;

    /// Builds the permutation table for `seed` (xorshift64 Fisher-Yates).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(seed: NoiseSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // xorshift state must never be zero
        let mut state = seed.value() | 1;
        for i in (1..256usize).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            perm.swap(i, j);
        }

        let (low, high) = perm.split_at_mut(256);
        high.copy_from_slice(low);
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: usize, j: usize) -> usize {
        self.perm[i + self.perm[j] as usize] as usize
    }

    #[inline]
    fn corner(&self, x: f64, y: f64, hash: usize) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t <= 0.0 {
            return 0.0;
        }
        let [gx, gy] = GRADIENTS[hash & 7];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }

    /// Samples noise at `(x, y)`; the result lies in `[-1, 1]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::SKEW;
        let cell_x = (x + skew).floor();
        let cell_y = (y + skew).floor();

        let unskew = (cell_x + cell_y) * Self::UNSKEW;
        let x0 = x - (cell_x - unskew);
        let y0 = y - (cell_y - unskew);

        // Lower or upper triangle of the skewed cell
        let (step_x, step_y) = if x0 > y0 { (1usize, 0usize) } else { (0, 1) };

        let x1 = x0 - step_x as f64 + Self::UNSKEW;
        let y1 = y0 - step_y as f64 + Self::UNSKEW;
        let x2 = x0 - 1.0 + 2.0 * Self::UNSKEW;
        let y2 = y0 - 1.0 + 2.0 * Self::UNSKEW;

        let i = (cell_x as i64 & 255) as usize;
        let j = (cell_y as i64 & 255) as usize;

        let n0 = self.corner(x0, y0, self.hash(i, j));
        let n1 = self.corner(x1, y1, self.hash(i + step_x, j + step_y));
        let n2 = self.corner(x2, y2, self.hash(i + 1, j + 1));

        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Fractal sum of `octaves` layers, normalized back to `[-1, 1]`.
    ///
    /// * `persistence` - amplitude factor per octave (typically 0.5)
    /// * `lacunarity` - frequency factor per octave (typically 2.0)
    #[must_use]
    pub fn octaved(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_amplitude > 0.0 {
            (total / max_amplitude).clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Grayscale field backed by octaved simplex noise.
///
/// ```rust,ignore
/// let field = NoiseField::new(NoiseSeed::new(42)).with_frequency(4.0).with_octaves(5);
/// let value = field.sample(0.25, 0.75).unwrap();
/// assert!((0.0..=1.0).contains(&value));
/// ```
#[derive(Clone, Debug)]
pub struct NoiseField {
    noise: SimplexNoise,
    frequency: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl NoiseField {
    /// Creates a field with 4 octaves at frequency 4 across the grid.
    #[must_use]
    pub fn new(seed: NoiseSeed) -> Self {
        Self {
            noise: SimplexNoise::new(seed),
            frequency: 4.0,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Noise periods across the full grid extent.
    #[must_use]
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Number of fractal layers (at least 1).
    #[must_use]
    pub fn with_octaves(mut self, octaves: u32) -> Self {
        self.octaves = octaves.max(1);
        self
    }

    /// Amplitude factor per octave.
    #[must_use]
    pub fn with_persistence(mut self, persistence: f64) -> Self {
        self.persistence = persistence;
        self
    }
}

impl GrayscaleField for NoiseField {
    fn sample(&self, x: f64, y: f64) -> Option<f64> {
        let value = self.noise.octaved(
            x * self.frequency,
            y * self.frequency,
            self.octaves,
            self.persistence,
            self.lacunarity,
        );
        Some(((value + 1.0) * 0.5).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let a = SimplexNoise::new(NoiseSeed::new(12345));
        let b = SimplexNoise::new(NoiseSeed::new(12345));
        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = SimplexNoise::new(NoiseSeed::new(1));
        let b = SimplexNoise::new(NoiseSeed::new(2));
        let differs = (0..50).any(|i| {
            let x = f64::from(i) * 0.37 + 0.1;
            (a.sample(x, x * 0.5) - b.sample(x, x * 0.5)).abs() > 1e-9
        });
        assert!(differs, "different seeds should give different noise");
    }

    #[test]
    fn test_range() {
        let noise = SimplexNoise::new(NoiseSeed::new(42));
        for i in 0..10_000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let y = f64::from(i) * 0.13 - 650.0;
            let value = noise.sample(x, y);
            assert!((-1.0..=1.0).contains(&value), "{value} out of range at ({x}, {y})");
        }
    }

    #[test]
    fn test_continuity() {
        let noise = SimplexNoise::new(NoiseSeed::new(42));
        let v = noise.sample(10.0, 10.0);
        assert!((v - noise.sample(10.001, 10.0)).abs() < 0.01);
        assert!((v - noise.sample(10.0, 10.001)).abs() < 0.01);
    }

    #[test]
    fn test_field_in_unit_range() {
        let field = NoiseField::new(NoiseSeed::new(7)).with_octaves(6);
        for i in 0..200 {
            let f = f64::from(i) / 200.0;
            let value = field.sample(f, 1.0 - f).unwrap();
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
