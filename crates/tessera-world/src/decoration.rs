//! Decoration scattering: deterministic, biome-aware dressing of free tiles.
//!
//! Each eligible tile rolls its own noise against its biome's probability, so
//! the result depends only on the grid and the occupancy at scatter time.

use serde::{Deserialize, Serialize};
use tessera_config::DecorationConfig;
use tracing::debug;

use crate::biome::Biome;
use crate::coords::{GridCoord, WorldCoord};
use crate::grid::WorldGrid;
use crate::noise::{NoiseChannel, tile_noise};
use crate::sites::SiteAllocator;
use crate::tile::TileType;

/// Visual variants per decoration kind.
const VARIANTS: u8 = 4;
/// Maximum distance of a decoration from its tile center, in tiles.
const MAX_OFFSET: f64 = 0.3;

/// Decoration archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    Flower,
    TallGrass,
    Bush,
    OakTree,
    PineTree,
    Mushroom,
    Cactus,
    DryShrub,
    Sandstone,
    Boulder,
    Crystal,
}

impl DecorationKind {
    /// Tall kinds stay out of the outer rings.
    pub const fn is_tall(self) -> bool {
        matches!(
            self,
            DecorationKind::OakTree | DecorationKind::PineTree | DecorationKind::Cactus
        )
    }

    /// Kinds that give off light.
    pub const fn is_emissive(self) -> bool {
        matches!(self, DecorationKind::Crystal)
    }
}

/// Kinds a biome can grow, picked from by the variant roll.
pub const fn biome_palette(biome: Biome) -> &'static [DecorationKind] {
    use DecorationKind::*;
    match biome {
        Biome::Meadow => &[Flower, TallGrass, Bush, OakTree],
        Biome::Forest => &[PineTree, OakTree, Mushroom, Bush],
        Biome::Desert => &[Cactus, DryShrub, Sandstone],
        Biome::Mountain => &[Boulder, Crystal, PineTree],
    }
}

/// A decoration anchored to one tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    /// Archetype.
    pub kind: DecorationKind,
    /// Tile the decoration stands on.
    pub anchor: WorldCoord,
    /// Offset from the tile center, each axis in `[-0.3, 0.3)`.
    pub offset: [f32; 2],
    /// Visual variant, `0..4`.
    pub variant: u8,
}

/// Per-biome scatter probabilities and edge clearance.
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterRules {
    probabilities: [f64; 4],
    edge_clearance: usize,
}

impl ScatterRules {
    /// Probability that an eligible tile of `biome` is decorated.
    pub fn probability(&self, biome: Biome) -> f64 {
        self.probabilities[biome.index()]
    }
}

impl Default for ScatterRules {
    fn default() -> Self {
        Self::from(&DecorationConfig::default())
    }
}

impl From<&DecorationConfig> for ScatterRules {
    fn from(config: &DecorationConfig) -> Self {
        let mut probabilities = [0.0; 4];
        probabilities[Biome::Meadow.index()] = config.meadow_probability;
        probabilities[Biome::Forest.index()] = config.forest_probability;
        probabilities[Biome::Desert.index()] = config.desert_probability;
        probabilities[Biome::Mountain.index()] = config.mountain_probability;
        Self {
            probabilities,
            edge_clearance: config.edge_clearance,
        }
    }
}

fn can_decorate(grid: &WorldGrid, sites: &SiteAllocator, coord: GridCoord) -> bool {
    let tile = grid.tile(coord);
    !grid.is_water(coord)
        && !grid.is_path(coord)
        && !sites.is_occupied(coord)
        && matches!(
            tile.tile_type,
            TileType::Grass | TileType::Sand | TileType::Mountain
        )
}

fn decorate_tile(grid: &WorldGrid, rules: &ScatterRules, coord: GridCoord) -> Option<Decoration> {
    let biome = grid.biome(coord);
    if biome == Biome::Mountain && grid.tile(coord).tile_type != TileType::Mountain {
        return None;
    }
    if tile_noise(coord, NoiseChannel::DecorationChance) >= rules.probability(biome) {
        return None;
    }

    let palette = biome_palette(biome);
    let roll = tile_noise(coord, NoiseChannel::DecorationVariant) * palette.len() as f64;
    let kind = palette[(roll as usize).min(palette.len() - 1)];
    if kind.is_tall() && grid.dims().edge_distance(coord) < rules.edge_clearance {
        return None;
    }

    let variant = ((roll.fract() * f64::from(VARIANTS)) as u8).min(VARIANTS - 1);
    let offset = |channel| ((tile_noise(coord, channel) - 0.5) * 2.0 * MAX_OFFSET) as f32;
    Some(Decoration {
        kind,
        anchor: grid.dims().to_world(coord),
        offset: [
            offset(NoiseChannel::DecorationOffsetX),
            offset(NoiseChannel::DecorationOffsetZ),
        ],
        variant,
    })
}

/// Decorate every free land tile, in row-major order.
pub fn scatter_decorations(
    grid: &WorldGrid,
    sites: &SiteAllocator,
    rules: &ScatterRules,
) -> Vec<Decoration> {
    let decorations: Vec<Decoration> = grid
        .dims()
        .iter()
        .filter(|coord| can_decorate(grid, sites, *coord))
        .filter_map(|coord| decorate_tile(grid, rules, coord))
        .collect();
    debug!(count = decorations.len(), "decorations scattered");
    decorations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::{BiomeAssignment, BiomePartition};
    use crate::coords::GridDims;
    use crate::river::generate_river_path;
    use tessera_config::SiteConfig;

    fn grid() -> WorldGrid {
        let dims = GridDims::default();
        let layout =
            BiomeAssignment::new([Biome::Forest, Biome::Meadow, Biome::Mountain, Biome::Desert])
                .unwrap();
        WorldGrid::build(&BiomePartition::new(dims, layout, 3), generate_river_path(dims, 10))
    }

    fn rules(p: f64) -> ScatterRules {
        ScatterRules::from(&DecorationConfig {
            meadow_probability: p,
            forest_probability: p,
            desert_probability: p,
            mountain_probability: p,
            edge_clearance: 2,
        })
    }

    #[test]
    fn test_decorations_avoid_water_and_sites() {
        let grid = grid();
        let mut sites = SiteAllocator::new(&grid, &SiteConfig::default());
        for _ in 0..4 {
            let site = sites.find_site(&grid).unwrap();
            sites.commit(&grid, site.x, site.z).unwrap();
        }
        for deco in scatter_decorations(&grid, &sites, &rules(1.0)) {
            let coord = grid.dims().to_grid(deco.anchor).unwrap();
            assert!(!grid.is_water(coord), "{deco:?} on water");
            assert!(!sites.is_occupied(coord), "{deco:?} on a reserved tile");
            assert_ne!(grid.tile(coord).tile_type, TileType::Bridge);
        }
    }

    #[test]
    fn test_scatter_is_deterministic() {
        let grid = grid();
        let sites = SiteAllocator::new(&grid, &SiteConfig::default());
        let a = scatter_decorations(&grid, &sites, &ScatterRules::default());
        let b = scatter_decorations(&grid, &sites, &ScatterRules::default());
        assert_eq!(a, b);
        assert!(!a.is_empty(), "default probabilities should decorate something");
    }

    #[test]
    fn test_zero_probability_decorates_nothing() {
        let grid = grid();
        let sites = SiteAllocator::new(&grid, &SiteConfig::default());
        assert!(scatter_decorations(&grid, &sites, &rules(0.0)).is_empty());
    }

    #[test]
    fn test_kinds_match_biome_and_skip_peaks() {
        let grid = grid();
        let sites = SiteAllocator::new(&grid, &SiteConfig::default());
        for deco in scatter_decorations(&grid, &sites, &rules(1.0)) {
            let coord = grid.dims().to_grid(deco.anchor).unwrap();
            let biome = grid.biome(coord);
            assert!(biome_palette(biome).contains(&deco.kind), "{deco:?} in {biome}");
            assert_ne!(grid.tile(coord).tile_type, TileType::MountainPeak);
            assert!(deco.variant < VARIANTS);
            assert!(deco.offset.iter().all(|o| o.abs() <= MAX_OFFSET as f32));
        }
    }

    #[test]
    fn test_tall_kinds_clear_of_edges() {
        let grid = grid();
        let sites = SiteAllocator::new(&grid, &SiteConfig::default());
        for deco in scatter_decorations(&grid, &sites, &rules(1.0)) {
            if deco.kind.is_tall() {
                let coord = grid.dims().to_grid(deco.anchor).unwrap();
                assert!(grid.dims().edge_distance(coord) >= 2, "{deco:?} too close to edge");
            }
        }
    }

    #[test]
    fn test_forest_denser_than_meadow() {
        let grid = grid();
        let sites = SiteAllocator::new(&grid, &SiteConfig::default());
        let decorations = scatter_decorations(&grid, &sites, &ScatterRules::default());
        let in_biome = |biome| {
            decorations
                .iter()
                .filter(|d| grid.biome_at(d.anchor.x, d.anchor.z) == Some(biome))
                .count()
        };
        assert!(
            in_biome(Biome::Forest) > in_biome(Biome::Meadow),
            "forest (15%) should out-decorate meadow (5%)"
        );
    }
}
