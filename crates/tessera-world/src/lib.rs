//! Procedural tile world generation: noise, biome partitioning, river and
//! bridge, tile classification, site allocation, and decoration scattering.

mod biome;
mod coords;
mod decoration;
mod error;
mod grid;
mod noise;
mod river;
mod seed;
mod sites;
mod tile;
mod world;

pub use biome::{
    Biome, BiomeAssignment, BiomePartition, ParseBiomeError, assign_biomes, quadrant_index,
};
pub use coords::{DEFAULT_GRID_SIZE, GridCoord, GridDims, TileRegion, WorldCoord};
pub use decoration::{
    Decoration, DecorationKind, ScatterRules, biome_palette, scatter_decorations,
};
pub use error::WorldError;
pub use grid::{FALLBACK_HEIGHT, WorldGrid};
pub use noise::{NoiseChannel, noise, row_noise, tile_noise};
pub use river::{
    BRIDGE_DECK_MARGIN, Bridge, RiverPath, bridge_band, find_bridge_location,
    generate_river_path, river_start_column,
};
pub use seed::{GenerationStream, derive_stream_seed, fresh_seed, stream_rng};
pub use sites::{Placement, SiteAllocator};
pub use tile::{ColorClass, PEAK_RINGS, TileRecord, TileType, bridge_tile, classify_tile};
pub use world::World;
