//! Stateless trigonometric hash noise.
//!
//! `noise(x, z) = frac(sin(x * 12.9898 + z * 78.233) * 43758.5453)`, evaluated
//! with `libm` so the same inputs hash identically on every platform. Separate
//! uses draw from separate [`NoiseChannel`]s, which shift the input lattice so
//! that, say, a tile's decoration chance is uncorrelated with its surface shade.

use crate::coords::GridCoord;

const FREQ_X: f64 = 12.9898;
const FREQ_Z: f64 = 78.233;
const AMPLITUDE: f64 = 43_758.545_3;

/// Hash `(x, z)` to a reproducible value in `[0, 1)`.
#[inline]
pub fn noise(x: f64, z: f64) -> f64 {
    let v = libm::sin(x * FREQ_X + z * FREQ_Z) * AMPLITUDE;
    let f = v - libm::floor(v);
    // `v - floor(v)` rounds up to exactly 1.0 for tiny negative `v`.
    if f >= 1.0 { 0.0 } else { f }
}

/// Independent noise streams drawn from the same hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseChannel {
    /// Surface shade and height variance.
    Surface,
    /// Transition band jitter along x.
    JitterX,
    /// Transition band jitter along z.
    JitterZ,
    /// River meander jitter per row.
    Meander,
    /// River width per row.
    RiverWidth,
    /// Whether a tile gets a decoration.
    DecorationChance,
    /// Which decoration kind and variant.
    DecorationVariant,
    /// Sub-tile decoration offset along x.
    DecorationOffsetX,
    /// Sub-tile decoration offset along z.
    DecorationOffsetZ,
}

impl NoiseChannel {
    /// Lattice shift applied to the inputs of this channel.
    const fn salt(self) -> (f64, f64) {
        match self {
            Self::Surface => (0.0, 0.0),
            Self::JitterX => (37.0, 11.0),
            Self::JitterZ => (-53.0, 97.0),
            Self::Meander => (101.0, 0.0),
            Self::RiverWidth => (211.0, 7.0),
            Self::DecorationChance => (0.37, 0.71),
            Self::DecorationVariant => (5.13, 9.29),
            Self::DecorationOffsetX => (17.7, -3.3),
            Self::DecorationOffsetZ => (-29.1, 41.9),
        }
    }
}

/// Per-tile noise on a channel.
#[inline]
pub fn tile_noise(coord: GridCoord, channel: NoiseChannel) -> f64 {
    let (sx, sz) = channel.salt();
    noise(coord.gx as f64 + sx, coord.gz as f64 + sz)
}

/// Per-row noise on a channel (for values that vary along the river).
#[inline]
pub fn row_noise(gz: usize, channel: NoiseChannel) -> f64 {
    let (sx, sz) = channel.salt();
    noise(sx, gz as f64 + sz)
}
