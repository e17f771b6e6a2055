//! Region partitioning: one biome per map quadrant, blended along the midlines.
//!
//! Quadrants are indexed `0 = low-x/low-z`, `1 = high-x/low-z`,
//! `2 = low-x/high-z`, `3 = high-x/high-z`. Tiles within the transition band
//! around either midline resolve their quadrant at a noise-jittered position,
//! which turns the straight seams into ragged borders.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::coords::{GridCoord, GridDims};
use crate::noise::{NoiseChannel, tile_noise};

/// Thematic region type governing a tile's default classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    /// Grassland.
    Meadow,
    /// Wooded grassland.
    Forest,
    /// Sand.
    Desert,
    /// Rock rising toward the map edge.
    Mountain,
}

impl Biome {
    /// All biomes, in canonical order.
    pub const ALL: [Biome; 4] = [Biome::Meadow, Biome::Forest, Biome::Desert, Biome::Mountain];

    /// Position in [`Biome::ALL`], for per-biome arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Biome::Meadow => "meadow",
            Biome::Forest => "forest",
            Biome::Desert => "desert",
            Biome::Mountain => "mountain",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A biome name that is not one of the four known biomes.
#[derive(Debug, thiserror::Error)]
#[error("unknown biome name: {0}")]
pub struct ParseBiomeError(pub String);

impl FromStr for Biome {
    type Err = ParseBiomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Biome::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseBiomeError(s.to_string()))
    }
}

/// Bijection from quadrant index to biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeAssignment([Biome; 4]);

impl BiomeAssignment {
    /// Wrap an explicit layout. Returns `None` unless every biome appears exactly once.
    pub fn new(layout: [Biome; 4]) -> Option<Self> {
        let mut seen = [false; 4];
        for biome in layout {
            if std::mem::replace(&mut seen[biome.index()], true) {
                return None;
            }
        }
        Some(Self(layout))
    }

    /// Biome owning a quadrant (`quadrant` is taken modulo 4).
    pub fn biome(&self, quadrant: usize) -> Biome {
        self.0[quadrant % 4]
    }

    /// The layout as an array indexed by quadrant.
    pub fn as_array(&self) -> [Biome; 4] {
        self.0
    }
}

impl Default for BiomeAssignment {
    fn default() -> Self {
        Self(Biome::ALL)
    }
}

/// Uniformly random quadrant layout (Fisher-Yates shuffle).
pub fn assign_biomes(rng: &mut impl Rng) -> BiomeAssignment {
    let mut layout = Biome::ALL;
    layout.shuffle(rng);
    BiomeAssignment(layout)
}

/// Quadrant of a (possibly fractional) grid position.
fn quadrant_at(dims: GridDims, x: f64, z: f64) -> usize {
    let mid = dims.half() as f64;
    usize::from(x >= mid) + 2 * usize::from(z >= mid)
}

/// Quadrant of a tile, by midline comparison.
pub fn quadrant_index(dims: GridDims, coord: GridCoord) -> usize {
    quadrant_at(dims, coord.gx as f64, coord.gz as f64)
}

/// Resolves the governing biome of each tile.
#[derive(Clone, Debug)]
pub struct BiomePartition {
    dims: GridDims,
    assignment: BiomeAssignment,
    transition_width: usize,
}

impl BiomePartition {
    /// Create a partition over `dims` with a band of `transition_width` tiles on each side of the midlines.
    pub fn new(dims: GridDims, assignment: BiomeAssignment, transition_width: usize) -> Self {
        Self {
            dims,
            assignment,
            transition_width,
        }
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Quadrant layout.
    pub fn assignment(&self) -> BiomeAssignment {
        self.assignment
    }

    /// Whether a tile center lies within the transition band of either midline.
    pub fn in_transition_band(&self, coord: GridCoord) -> bool {
        let mid = self.dims.half() as f64;
        let width = self.transition_width as f64;
        (coord.gx as f64 + 0.5 - mid).abs() < width || (coord.gz as f64 + 0.5 - mid).abs() < width
    }

    /// Governing biome of a tile.
    pub fn biome_at(&self, coord: GridCoord) -> Biome {
        if !self.in_transition_band(coord) {
            return self.assignment.biome(quadrant_index(self.dims, coord));
        }

        let reach = 2.0 * self.transition_width as f64;
        let jx = (tile_noise(coord, NoiseChannel::JitterX) - 0.5) * reach;
        let jz = (tile_noise(coord, NoiseChannel::JitterZ) - 0.5) * reach;
        let x = coord.gx as f64 + 0.5 + jx;
        let z = coord.gz as f64 + 0.5 + jz;
        self.assignment.biome(quadrant_at(self.dims, x, z))
    }
}
