//! The world grid: every tile, plus water and path membership.
//!
//! Built once per world. Everything downstream (site allocation, decoration,
//! scene extraction) reads tiles from here.

use tracing::debug;

use crate::biome::{Biome, BiomeAssignment, BiomePartition};
use crate::coords::{GridCoord, GridDims, WorldCoord};
use crate::river::{Bridge, RiverPath, find_bridge_location};
use crate::tile::{TileRecord, TileType, bridge_tile, classify_tile};

/// Height reported for positions outside the grid: the ground plane.
pub const FALLBACK_HEIGHT: f32 = 0.0;

/// Owned collection of all tiles of one world.
#[derive(Clone, Debug)]
pub struct WorldGrid {
    dims: GridDims,
    assignment: BiomeAssignment,
    tiles: Vec<TileRecord>,
    biomes: Vec<Biome>,
    water: Vec<bool>,
    path: Vec<bool>,
    river: RiverPath,
    bridge: Option<Bridge>,
}

impl WorldGrid {
    /// Classify every tile, then lay the bridge over the river.
    pub fn build(partition: &BiomePartition, river: RiverPath) -> Self {
        let dims = partition.dims();
        let count = dims.tile_count();
        let mut tiles = Vec::with_capacity(count);
        let mut biomes = Vec::with_capacity(count);
        let mut water = vec![false; count];

        for coord in dims.iter() {
            let biome = partition.biome_at(coord);
            let is_river = river.contains(coord);
            water[dims.index(coord)] = is_river;
            biomes.push(biome);
            tiles.push(classify_tile(dims, coord, Some(biome), is_river));
        }

        let mut grid = Self {
            dims,
            assignment: partition.assignment(),
            tiles,
            biomes,
            water,
            path: vec![false; count],
            bridge: find_bridge_location(dims, &river),
            river,
        };
        grid.overlay_bridge();

        debug!(
            tiles = grid.tiles.len(),
            water = grid.river.len(),
            bridge = ?grid.bridge,
            "world grid built"
        );
        grid
    }

    /// Replace the crossing's river tiles with deck tiles and mark the banks as path.
    fn overlay_bridge(&mut self) {
        let Some(bridge) = self.bridge else {
            return;
        };
        for gx in bridge.min_col..=bridge.max_col {
            let coord = GridCoord::new(gx, bridge.row);
            let idx = self.dims.index(coord);
            if self.water[idx] {
                self.tiles[idx] = bridge_tile(coord, Some(self.biomes[idx]));
            }
        }

        let approaches = [
            bridge.min_col.checked_sub(1),
            Some(bridge.max_col + 1).filter(|&gx| gx < self.dims.size()),
        ];
        for gx in approaches.into_iter().flatten() {
            let idx = self.dims.index(GridCoord::new(gx, bridge.row));
            self.path[idx] = true;
        }
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Quadrant layout this grid was built with.
    pub fn assignment(&self) -> BiomeAssignment {
        self.assignment
    }

    /// The river under this grid.
    pub fn river(&self) -> &RiverPath {
        &self.river
    }

    /// The bridge, if the river crosses the central band.
    pub fn bridge(&self) -> Option<Bridge> {
        self.bridge
    }

    /// Every tile in row-major order.
    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    /// Tile at a grid coordinate.
    pub fn tile(&self, coord: GridCoord) -> &TileRecord {
        &self.tiles[self.dims.index(coord)]
    }

    /// Governing biome at a grid coordinate.
    pub fn biome(&self, coord: GridCoord) -> Biome {
        self.biomes[self.dims.index(coord)]
    }

    /// Tile at a world coordinate, `None` outside the grid.
    pub fn tile_at(&self, x: i32, z: i32) -> Option<&TileRecord> {
        self.dims
            .to_grid(WorldCoord::new(x, z))
            .map(|coord| self.tile(coord))
    }

    /// Surface height at a world position, rounded to the nearest tile.
    ///
    /// Returns [`FALLBACK_HEIGHT`] outside the grid and for non-finite positions.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        if !x.is_finite() || !z.is_finite() {
            return FALLBACK_HEIGHT;
        }
        let coord = WorldCoord::new(x.round() as i32, z.round() as i32);
        self.tile_at(coord.x, coord.z)
            .map_or(FALLBACK_HEIGHT, |tile| tile.height)
    }

    /// Governing biome at a world coordinate; `None` is the "unknown" answer outside the grid.
    pub fn biome_at(&self, x: i32, z: i32) -> Option<Biome> {
        self.dims
            .to_grid(WorldCoord::new(x, z))
            .map(|coord| self.biome(coord))
    }

    /// Whether a tile is river (including tiles under the bridge deck).
    pub fn is_water(&self, coord: GridCoord) -> bool {
        self.water[self.dims.index(coord)]
    }

    /// Whether a tile is a bridge approach.
    pub fn is_path(&self, coord: GridCoord) -> bool {
        self.path[self.dims.index(coord)]
    }

    /// Whether any tile of the 3x3 block around `coord` is water.
    pub fn water_nearby(&self, coord: GridCoord) -> bool {
        self.dims.neighborhood(coord).any(|c| self.is_water(c))
    }

    /// Water tiles in row-major order.
    pub fn water_tiles(&self) -> impl Iterator<Item = &TileRecord> + '_ {
        self.tiles.iter().filter(|t| t.tile_type == TileType::Water)
    }

    /// One glyph per tile, rows separated by newlines, `gz = 0` first.
    pub fn ascii_map(&self) -> String {
        let size = self.dims.size();
        let mut out = String::with_capacity(self.tiles.len() + size);
        for row in self.tiles.chunks(size) {
            out.extend(row.iter().map(|t| {
                if self.is_path(t.coord) { '#' } else { t.tile_type.glyph() }
            }));
            out.push('\n');
        }
        out
    }
}
