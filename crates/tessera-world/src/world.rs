//! The world aggregate: grid, site registry, and decorations under one owner.

use tessera_config::Config;
use tracing::info;

use crate::biome::{Biome, BiomeAssignment, BiomePartition, assign_biomes};
use crate::coords::{GridDims, TileRegion, WorldCoord};
use crate::decoration::{Decoration, ScatterRules, scatter_decorations};
use crate::error::WorldError;
use crate::grid::WorldGrid;
use crate::river::{generate_river_path, river_start_column};
use crate::seed::{GenerationStream, fresh_seed, stream_rng};
use crate::sites::{Placement, SiteAllocator};
use crate::tile::TileRecord;

/// A generated world and all state mutated over its lifetime.
#[derive(Clone, Debug)]
pub struct World {
    seed: u64,
    grid: WorldGrid,
    sites: SiteAllocator,
    scatter_rules: ScatterRules,
    decorations: Option<Vec<Decoration>>,
}

impl World {
    /// Generate a world from configuration.
    ///
    /// Uses `config.world.seed` when set; otherwise draws a fresh seed and logs
    /// it so the world can be regenerated.
    pub fn generate(config: &Config) -> Result<Self, WorldError> {
        config.validate()?;
        let seed = config.world.seed.unwrap_or_else(fresh_seed);
        let dims = GridDims::new(config.world.grid_size);

        let assignment = assign_biomes(&mut stream_rng(seed, GenerationStream::Biomes));
        let start = river_start_column(dims, &mut stream_rng(seed, GenerationStream::River));
        Self::with_layout(config, seed, assignment, start)
    }

    /// Generate with an explicit biome layout and river start column.
    pub fn with_layout(
        config: &Config,
        seed: u64,
        assignment: BiomeAssignment,
        river_start: usize,
    ) -> Result<Self, WorldError> {
        config.validate()?;
        let dims = GridDims::new(config.world.grid_size);
        let partition = BiomePartition::new(dims, assignment, config.world.transition_width);
        let grid = WorldGrid::build(&partition, generate_river_path(dims, river_start));
        let sites = SiteAllocator::new(&grid, &config.sites);

        info!(
            seed,
            size = dims.size(),
            layout = ?assignment.as_array(),
            river_start,
            bridge_row = grid.bridge().map(|b| b.row),
            "world generated"
        );

        Ok(Self {
            seed,
            grid,
            sites,
            scatter_rules: ScatterRules::from(&config.decoration),
            decorations: None,
        })
    }

    /// Seed that reproduces this world.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The tile grid.
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    /// Tile at a world coordinate.
    pub fn tile_at(&self, x: i32, z: i32) -> Option<&TileRecord> {
        self.grid.tile_at(x, z)
    }

    /// Surface height at a world position, [`crate::FALLBACK_HEIGHT`] off the map.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        self.grid.height_at(x, z)
    }

    /// Biome at a world coordinate, `None` off the map.
    pub fn biome_at(&self, x: i32, z: i32) -> Option<Biome> {
        self.grid.biome_at(x, z)
    }

    /// Next free structure site, without reserving it.
    pub fn find_site(&self) -> Option<WorldCoord> {
        self.sites.find_site(&self.grid)
    }

    /// Confirm a structure at `(x, z)`.
    pub fn commit_site(&mut self, x: i32, z: i32) -> Result<Placement, WorldError> {
        self.sites.commit(&self.grid, x, z)
    }

    /// Site registry (placements, occupancy, per-biome tally).
    pub fn sites(&self) -> &SiteAllocator {
        &self.sites
    }

    /// Run the one-time decoration pass over all tiles free at this point.
    pub fn scatter_decorations(&mut self) -> Result<&[Decoration], WorldError> {
        if self.decorations.is_some() {
            return Err(WorldError::AlreadyDecorated);
        }
        let decorations = scatter_decorations(&self.grid, &self.sites, &self.scatter_rules);
        info!(count = decorations.len(), "world decorated");
        let stored = self.decorations.insert(decorations);
        Ok(stored.as_slice())
    }

    /// All decorations; empty until [`scatter_decorations`](Self::scatter_decorations) runs.
    pub fn decorations(&self) -> &[Decoration] {
        self.decorations.as_deref().unwrap_or_default()
    }

    /// Decorations anchored inside `region`.
    pub fn decorations_near(&self, region: TileRegion) -> Vec<&Decoration> {
        self.decorations()
            .iter()
            .filter(|d| region.contains(d.anchor))
            .collect()
    }
}
