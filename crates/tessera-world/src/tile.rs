//! Tile classification: position, biome, and river membership in, tile record out.

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::coords::{GridCoord, GridDims};
use crate::noise::{NoiseChannel, tile_noise};

const WATER_HEIGHT: f32 = 0.05;
const WATER_OPACITY: f32 = 0.75;
const BRIDGE_HEIGHT: f32 = 0.3;

/// `(base, variance)` surface height bands.
const MEADOW_HEIGHT: (f32, f32) = (0.2, 0.08);
const FOREST_HEIGHT: (f32, f32) = (0.24, 0.08);
const DESERT_HEIGHT: (f32, f32) = (0.12, 0.05);

const MOUNTAIN_BASE: f32 = 0.6;
const MOUNTAIN_EDGE_RANGE: f32 = 2.4;
const MOUNTAIN_VARIANCE: f32 = 0.3;
/// Edge factor reaches zero this many rings in from the border.
const MOUNTAIN_FALLOFF_RINGS: f32 = 6.0;
/// Outer rings classified as snow-capped peaks.
pub const PEAK_RINGS: usize = 2;

/// Concrete surface type of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileType {
    /// Meadow or forest ground.
    Grass,
    /// Desert ground.
    Sand,
    /// Mountain slope.
    Mountain,
    /// Snow-capped mountain tile near the map edge.
    MountainPeak,
    /// River.
    Water,
    /// Bridge deck over the river.
    Bridge,
}

impl TileType {
    /// Single-character glyph for ASCII maps.
    pub const fn glyph(self) -> char {
        match self {
            TileType::Grass => '.',
            TileType::Sand => ':',
            TileType::Mountain => '^',
            TileType::MountainPeak => 'A',
            TileType::Water => '~',
            TileType::Bridge => '=',
        }
    }
}

/// Opaque material identifier for the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    MeadowLight,
    MeadowDark,
    ForestLight,
    ForestDark,
    SandLight,
    SandDark,
    Rock,
    Slate,
    Snow,
    WaterShallow,
    WaterDeep,
    Plank,
}

impl ColorClass {
    /// Packed `0xRRGGBB` palette color.
    pub const fn rgb(self) -> u32 {
        match self {
            ColorClass::MeadowLight => 0x7c_c0_4f,
            ColorClass::MeadowDark => 0x6a_ad_42,
            ColorClass::ForestLight => 0x3f_7d_3a,
            ColorClass::ForestDark => 0x2f_66_2c,
            ColorClass::SandLight => 0xe6_d3_8f,
            ColorClass::SandDark => 0xd4_bd_72,
            ColorClass::Rock => 0x8a_84_7c,
            ColorClass::Slate => 0x6e_6a_66,
            ColorClass::Snow => 0xf2_f4_f7,
            ColorClass::WaterShallow => 0x4f_a8_d8,
            ColorClass::WaterDeep => 0x2f_7f_bf,
            ColorClass::Plank => 0x8b_5a_2b,
        }
    }
}

/// One classified tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// Grid position.
    pub coord: GridCoord,
    /// Surface type.
    pub tile_type: TileType,
    /// Surface elevation.
    pub height: f32,
    /// Governing biome; carried for water and bridges but not used by their classification.
    pub biome: Option<Biome>,
    /// Material identifier.
    pub color: ColorClass,
    /// 1.0 for opaque tiles; only water is translucent.
    pub opacity: f32,
}

impl TileRecord {
    /// Whether the renderer must blend this tile.
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

fn shade(noise: f64, light: ColorClass, dark: ColorClass) -> ColorClass {
    if noise < 0.5 { light } else { dark }
}

fn banded(noise: f64, (base, variance): (f32, f32)) -> f32 {
    base + noise as f32 * variance
}

/// Classify a tile. Pure and total: a missing (unknown) biome classifies as plain grass.
pub fn classify_tile(
    dims: GridDims,
    coord: GridCoord,
    biome: Option<Biome>,
    is_river: bool,
) -> TileRecord {
    let n = tile_noise(coord, NoiseChannel::Surface);

    if is_river {
        return TileRecord {
            coord,
            tile_type: TileType::Water,
            height: WATER_HEIGHT,
            biome,
            color: shade(n, ColorClass::WaterShallow, ColorClass::WaterDeep),
            opacity: WATER_OPACITY,
        };
    }

    let (tile_type, height, color) = match biome {
        Some(Biome::Forest) => (
            TileType::Grass,
            banded(n, FOREST_HEIGHT),
            shade(n, ColorClass::ForestLight, ColorClass::ForestDark),
        ),
        Some(Biome::Desert) => (
            TileType::Sand,
            banded(n, DESERT_HEIGHT),
            shade(n, ColorClass::SandLight, ColorClass::SandDark),
        ),
        Some(Biome::Mountain) => {
            let edge_distance = dims.edge_distance(coord);
            let edge_factor = (1.0 - edge_distance as f32 / MOUNTAIN_FALLOFF_RINGS).max(0.0);
            let height =
                MOUNTAIN_BASE + edge_factor * MOUNTAIN_EDGE_RANGE + n as f32 * MOUNTAIN_VARIANCE;
            if edge_distance < PEAK_RINGS {
                (TileType::MountainPeak, height, ColorClass::Snow)
            } else {
                (TileType::Mountain, height, shade(n, ColorClass::Rock, ColorClass::Slate))
            }
        }
        Some(Biome::Meadow) | None => (
            TileType::Grass,
            banded(n, MEADOW_HEIGHT),
            shade(n, ColorClass::MeadowLight, ColorClass::MeadowDark),
        ),
    };

    TileRecord {
        coord,
        tile_type,
        height,
        biome,
        color,
        opacity: 1.0,
    }
}

/// Bridge deck record laid over a river tile.
pub fn bridge_tile(coord: GridCoord, biome: Option<Biome>) -> TileRecord {
    TileRecord {
        coord,
        tile_type: TileType::Bridge,
        height: BRIDGE_HEIGHT,
        biome,
        color: ColorClass::Plank,
        opacity: 1.0,
    }
}
