//! Layered value noise for decoration
//!
//! A single field of white noise is resampled at doubling periods and the
//! octaves are summed with halving weights. The result only drives wall
//! styling; it never feeds back into the cave topology.

use std::f32::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

/// Amplitude retained from one octave to the next.
pub const PERSISTENCE: f32 = 0.5;

/// Octaves past this add nothing: the smoothing period already exceeds any
/// realistic grid.
pub const MAX_OCTAVES: u32 = 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    #[default]
    Linear,
    Cosine,
}

impl Interpolation {
    fn blend(self, x0: f32, x1: f32, t: f32) -> f32 {
        let t = match self {
            Interpolation::Linear => t,
            Interpolation::Cosine => (1.0 - (t * PI).cos()) / 2.0,
        };
        x0 * (1.0 - t) + x1 * t
    }
}

/// Noise values in `[0, 1]`, row-major like every other grid in the crate.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    pub field: Tilemap<f32>,
}

impl NoiseField {
    /// Draw a base field from `rng` and layer `octaves` octaves over it.
    pub fn generate<R: Rng + ?Sized>(
        height: usize,
        width: usize,
        octaves: u32,
        interpolation: Interpolation,
        rng: &mut R,
    ) -> Self {
        let base = white_noise(height, width, rng);
        Self::from_base(&base, octaves, interpolation)
    }

    /// Layer octaves over an existing base field. Deterministic in `base`.
    /// The octave count is clamped to `1..=MAX_OCTAVES`.
    pub fn from_base(base: &Tilemap<f32>, octaves: u32, interpolation: Interpolation) -> Self {
        let (height, width) = (base.height, base.width);
        if base.is_empty() {
            return Self { field: Tilemap::new_with(height, width, 0.0) };
        }

        let octaves = octaves.clamp(1, MAX_OCTAVES);
        let layers: Vec<Tilemap<f32>> = (0..octaves).map(|o| smooth(base, o, interpolation)).collect();

        let mut field = Tilemap::new_with(height, width, 0.0f32);
        let mut amplitude = 1.0f32;
        let mut total_amplitude = 0.0f32;

        for layer in layers.iter().rev() {
            amplitude *= PERSISTENCE;
            total_amplitude += amplitude;
            for (row, col, value) in field.iter_mut() {
                *value += layer.get(row, col) * amplitude;
            }
        }

        for (_, _, value) in field.iter_mut() {
            // Float error can nudge the sum a hair past 1
            *value = (*value / total_amplitude).clamp(0.0, 1.0);
        }

        Self { field }
    }

    pub fn height(&self) -> usize {
        self.field.height
    }

    pub fn width(&self) -> usize {
        self.field.width
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        *self.field.get(row, col)
    }
}

/// Independent uniform samples in `[0, 1)`.
pub fn white_noise<R: Rng + ?Sized>(height: usize, width: usize, rng: &mut R) -> Tilemap<f32> {
    Tilemap::from_fn(height, width, |_, _| rng.gen::<f32>())
}

/// One octave: bilinear (or cosine) resampling of `base` at period `2^octave`,
/// wrapping at the bottom and right edges.
fn smooth(base: &Tilemap<f32>, octave: u32, interpolation: Interpolation) -> Tilemap<f32> {
    let (height, width) = (base.height, base.width);
    let period = 1usize.checked_shl(octave).unwrap_or(usize::MAX).max(1);
    let frequency = 1.0 / period as f32;

    Tilemap::from_fn(height, width, |row, col| {
        let v0 = (row / period) * period;
        let v1 = (v0 + period % height) % height;
        let vertical = (row - v0) as f32 * frequency;

        let h0 = (col / period) * period;
        let h1 = (h0 + period % width) % width;
        let horizontal = (col - h0) as f32 * frequency;

        let top = interpolation.blend(*base.get(v0, h0), *base.get(v0, h1), horizontal);
        let bottom = interpolation.blend(*base.get(v1, h0), *base.get(v1, h1), horizontal);
        interpolation.blend(top, bottom, vertical)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_values_in_unit_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for &(h, w, octaves) in &[(1, 1, 1), (7, 13, 3), (100, 100, 5), (16, 4, 8)] {
            for interp in [Interpolation::Linear, Interpolation::Cosine] {
                let noise = NoiseField::generate(h, w, octaves, interp, &mut rng);
                assert_eq!((noise.height(), noise.width()), (h, w));
                assert!(noise.field.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
            }
        }
    }

    #[test]
    fn test_reproducible_from_base() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let base = white_noise(32, 24, &mut rng);
        let a = NoiseField::from_base(&base, 5, Interpolation::Cosine);
        let b = NoiseField::from_base(&base, 5, Interpolation::Cosine);
        assert_eq!(a, b);

        let mut other = ChaCha8Rng::seed_from_u64(7);
        let c = NoiseField::generate(32, 24, 5, Interpolation::Cosine, &mut other);
        assert_eq!(a, c);
    }

    #[test]
    fn test_single_octave_is_base() {
        // Period 1 samples each cell exactly
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let base = white_noise(9, 9, &mut rng);
        let noise = NoiseField::from_base(&base, 1, Interpolation::Linear);
        assert_eq!(noise.field, base);

        let zero = NoiseField::from_base(&base, 0, Interpolation::Linear);
        assert_eq!(zero.field, base);
    }

    #[test]
    fn test_second_octave_blends_and_wraps() {
        // Octave 1 has period 2: odd columns are the mean of their neighbours,
        // and the last odd column wraps to column 0.
        let base = Tilemap::from_fn(1, 4, |_, col| [0.0, 0.0, 1.0, 0.5][col]);
        let layer = smooth(&base, 1, Interpolation::Linear);
        assert_eq!(layer.as_slice(), &[0.0, 0.5, 1.0, 0.5]);

        let cosine = smooth(&base, 1, Interpolation::Cosine);
        assert!((cosine.get(0, 1) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_octave_weights() {
        // Constant base: every octave agrees, so the weighted mean is the constant
        let base = Tilemap::new_with(8, 8, 0.25f32);
        let noise = NoiseField::from_base(&base, 4, Interpolation::Cosine);
        assert!(noise.field.as_slice().iter().all(|v| (v - 0.25).abs() < 1e-6));
    }

    #[test]
    fn test_octaves_capped() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let base = white_noise(6, 5, &mut rng);
        let capped = NoiseField::from_base(&base, MAX_OCTAVES, Interpolation::Cosine);
        assert_eq!(NoiseField::from_base(&base, 100_000, Interpolation::Cosine), capped);
    }

    #[test]
    fn test_empty_field() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let noise = NoiseField::generate(0, 10, 5, Interpolation::Linear, &mut rng);
        assert!(noise.field.as_slice().is_empty());
    }
}
