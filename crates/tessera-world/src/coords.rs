//! Grid-space and world-space tile coordinates.
//!
//! Grid coordinates `(gx, gz)` run `0..size`; world coordinates are
//! `gx - size / 2`, so a 28-tile grid spans world `-14..=13` on each axis.
//! Tiles are stored in flat arrays indexed `gz * size + gx`.

use serde::{Deserialize, Serialize};

/// Side length used when no configuration overrides it.
pub const DEFAULT_GRID_SIZE: usize = 28;

/// A tile position in grid space (always in bounds for the grid it came from).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column, `0..size`.
    pub gx: usize,
    /// Row, `0..size`.
    pub gz: usize,
}

impl GridCoord {
    /// Create a grid coordinate.
    pub const fn new(gx: usize, gz: usize) -> Self {
        Self { gx, gz }
    }
}

/// A tile position in world space, centered on the grid midpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldCoord {
    /// World x.
    pub x: i32,
    /// World z.
    pub z: i32,
}

impl WorldCoord {
    /// Create a world coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chebyshev (king-move) distance between two tiles.
    pub fn chebyshev(self, other: WorldCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }
}

/// Inclusive rectangle of world-space tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRegion {
    /// Lowest corner (inclusive).
    pub min: WorldCoord,
    /// Highest corner (inclusive).
    pub max: WorldCoord,
}

impl TileRegion {
    /// Region spanning both corners, in any order.
    pub fn new(a: WorldCoord, b: WorldCoord) -> Self {
        Self {
            min: WorldCoord::new(a.x.min(b.x), a.z.min(b.z)),
            max: WorldCoord::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// Square region of Chebyshev `radius` around `center`.
    pub fn around(center: WorldCoord, radius: u32) -> Self {
        let r = radius as i32;
        Self {
            min: WorldCoord::new(center.x - r, center.z - r),
            max: WorldCoord::new(center.x + r, center.z + r),
        }
    }

    /// Whether `coord` lies inside the region.
    pub fn contains(&self, coord: WorldCoord) -> bool {
        (self.min.x..=self.max.x).contains(&coord.x) && (self.min.z..=self.max.z).contains(&coord.z)
    }
}

/// Dimensions of a square tile grid and the conversions that depend on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    size: usize,
}

impl Default for GridDims {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl GridDims {
    /// Dimensions for a `size x size` grid.
    pub const fn new(size: usize) -> Self {
        Self { size }
    }

    /// Side length in tiles.
    pub const fn size(self) -> usize {
        self.size
    }

    /// Offset between grid and world coordinates (`size / 2`).
    pub const fn half(self) -> i32 {
        (self.size / 2) as i32
    }

    /// Total number of tiles.
    pub const fn tile_count(self) -> usize {
        self.size * self.size
    }

    /// Flat array index of a grid coordinate.
    #[inline]
    pub fn index(self, coord: GridCoord) -> usize {
        coord.gz * self.size + coord.gx
    }

    /// Grid coordinate of a flat array index.
    #[inline]
    pub fn coord_of(self, index: usize) -> GridCoord {
        GridCoord::new(index % self.size, index / self.size)
    }

    /// Grid coordinate for signed column/row values, if in bounds.
    pub fn checked(self, gx: i64, gz: i64) -> Option<GridCoord> {
        let size = self.size as i64;
        ((0..size).contains(&gx) && (0..size).contains(&gz))
            .then(|| GridCoord::new(gx as usize, gz as usize))
    }

    /// World-space position of a grid tile.
    pub fn to_world(self, coord: GridCoord) -> WorldCoord {
        WorldCoord::new(coord.gx as i32 - self.half(), coord.gz as i32 - self.half())
    }

    /// Grid tile at a world position, or `None` outside the grid.
    pub fn to_grid(self, coord: WorldCoord) -> Option<GridCoord> {
        self.checked(
            i64::from(coord.x) + i64::from(self.half()),
            i64::from(coord.z) + i64::from(self.half()),
        )
    }

    /// Rings between the tile and the nearest map edge (0 on the border).
    pub fn edge_distance(self, coord: GridCoord) -> usize {
        let last = self.size.saturating_sub(1);
        coord
            .gx
            .min(coord.gz)
            .min(last - coord.gx)
            .min(last - coord.gz)
    }

    /// Every tile in row-major order (`gz` outer, `gx` inner).
    pub fn iter(self) -> impl Iterator<Item = GridCoord> {
        let size = self.size;
        (0..size).flat_map(move |gz| (0..size).map(move |gx| GridCoord::new(gx, gz)))
    }

    /// The in-bounds tiles of the 3x3 block centered on `coord` (center included).
    pub fn neighborhood(self, coord: GridCoord) -> impl Iterator<Item = GridCoord> {
        let (cx, cz) = (coord.gx as i64, coord.gz as i64);
        (-1..=1)
            .flat_map(move |dz| (-1..=1).map(move |dx| (cx + dx, cz + dz)))
            .filter_map(move |(gx, gz)| self.checked(gx, gz))
    }
}
