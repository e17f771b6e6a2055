//! River path generation and bridge placement.
//!
//! The river runs the full length of the grid along `z`, one contiguous run of
//! 2 or 3 tiles per row. Its column follows a sine meander plus a steady
//! rightward drift plus per-row noise jitter.

use rand::Rng;

use crate::coords::{GridCoord, GridDims};
use crate::noise::{NoiseChannel, row_noise};

/// Peak sideways swing of the meander, in tiles.
const MEANDER_AMPLITUDE: f64 = 2.5;
/// Meander phase advance per row, in radians.
const MEANDER_FREQUENCY: f64 = 0.35;
/// Rightward drift per row, in tiles.
const DRIFT_PER_ROW: f64 = 0.15;
/// Full range of the per-row column jitter, in tiles.
const JITTER_RANGE: f64 = 1.5;
/// Bridge decks overhang the water by this many tiles in total.
pub const BRIDGE_DECK_MARGIN: usize = 3;

/// Ordered set of river tiles, sorted by row then column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RiverPath {
    tiles: Vec<GridCoord>,
}

impl RiverPath {
    /// A river made of explicit tiles (sorted and deduplicated).
    pub fn from_tiles(mut tiles: Vec<GridCoord>) -> Self {
        tiles.sort_by_key(|c| (c.gz, c.gx));
        tiles.dedup();
        Self { tiles }
    }

    /// All river tiles, by row then column.
    pub fn tiles(&self) -> &[GridCoord] {
        &self.tiles
    }

    /// Number of river tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the river has no tiles at all.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether `coord` is a river tile.
    pub fn contains(&self, coord: GridCoord) -> bool {
        self.tiles
            .binary_search_by_key(&(coord.gz, coord.gx), |c| (c.gz, c.gx))
            .is_ok()
    }

    /// River columns in row `gz`, ascending.
    pub fn row(&self, gz: usize) -> impl Iterator<Item = usize> + '_ {
        let start = self.tiles.partition_point(|c| c.gz < gz);
        self.tiles[start..]
            .iter()
            .take_while(move |c| c.gz == gz)
            .map(|c| c.gx)
    }

    /// `(min, max)` river column in row `gz`, if the row has river tiles.
    pub fn row_span(&self, gz: usize) -> Option<(usize, usize)> {
        let mut cols = self.row(gz);
        let first = cols.next()?;
        let last = cols.last().unwrap_or(first);
        Some((first, last))
    }
}

/// Pick the river's start column from the world's river stream.
///
/// The start lies in the left half so the rightward drift keeps the river on the map.
pub fn river_start_column(dims: GridDims, rng: &mut impl Rng) -> usize {
    let size = dims.size();
    rng.random_range(size / 4..=size * 2 / 5)
}

/// Walk every row and lay down the river.
pub fn generate_river_path(dims: GridDims, start_column: usize) -> RiverPath {
    let size = dims.size() as i64;
    let mut tiles = Vec::with_capacity(dims.size() * 3);

    for gz in 0..dims.size() {
        let z = gz as f64;
        let meander = libm::sin(z * MEANDER_FREQUENCY) * MEANDER_AMPLITUDE;
        let jitter = (row_noise(gz, NoiseChannel::Meander) - 0.5) * JITTER_RANGE;
        let target = start_column as f64 + meander + z * DRIFT_PER_ROW + jitter;

        let width: i64 = if row_noise(gz, NoiseChannel::RiverWidth) < 0.5 { 2 } else { 3 };
        let left = (libm::round(target) as i64 - width / 2).clamp(0, size - width);

        tiles.extend((left..left + width).map(|gx| GridCoord::new(gx as usize, gz)));
    }

    RiverPath { tiles }
}

/// The single river crossing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bridge {
    /// Grid row carrying the bridge.
    pub row: usize,
    /// Leftmost river column under the bridge.
    pub min_col: usize,
    /// Rightmost river column under the bridge.
    pub max_col: usize,
}

impl Bridge {
    /// Column distance between the outermost river tiles.
    pub fn span(&self) -> usize {
        self.max_col - self.min_col
    }

    /// Deck length including the overhang onto both banks.
    pub fn deck_length(&self) -> usize {
        self.span() + BRIDGE_DECK_MARGIN
    }
}

/// Rows eligible for the bridge: `[floor(0.35 * size), floor(0.65 * size))`.
pub fn bridge_band(dims: GridDims) -> std::ops::Range<usize> {
    let size = dims.size();
    size * 35 / 100..size * 65 / 100
}

/// Narrowest crossing in the central band; the first row scanned wins ties.
pub fn find_bridge_location(dims: GridDims, river: &RiverPath) -> Option<Bridge> {
    let mut best: Option<Bridge> = None;
    for row in bridge_band(dims) {
        let Some((min_col, max_col)) = river.row_span(row) else {
            continue;
        };
        let candidate = Bridge {
            row,
            min_col,
            max_col,
        };
        if best.is_none_or(|b| candidate.span() < b.span()) {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{GenerationStream, stream_rng};

    fn river(seed: u64) -> RiverPath {
        let dims = GridDims::default();
        let start = river_start_column(dims, &mut stream_rng(seed, GenerationStream::River));
        generate_river_path(dims, start)
    }

    #[test]
    fn test_every_row_has_two_or_three_tiles() {
        let dims = GridDims::default();
        for seed in 0..50 {
            let river = river(seed);
            for gz in 0..dims.size() {
                let count = river.row(gz).count();
                assert!(
                    count == 2 || count == 3,
                    "seed {seed}: row {gz} has {count} river tiles"
                );
            }
        }
    }

    #[test]
    fn test_rows_are_contiguous_and_in_bounds() {
        let dims = GridDims::default();
        let river = river(7);
        for gz in 0..dims.size() {
            let cols: Vec<usize> = river.row(gz).collect();
            assert!(cols.windows(2).all(|w| w[1] == w[0] + 1), "row {gz}: {cols:?}");
            assert!(cols.iter().all(|&c| c < dims.size()));
        }
    }

    #[test]
    fn test_same_start_same_river() {
        let dims = GridDims::default();
        assert_eq!(generate_river_path(dims, 9), generate_river_path(dims, 9));
    }

    #[test]
    fn test_start_column_in_left_half() {
        let dims = GridDims::default();
        for seed in 0..100 {
            let start = river_start_column(dims, &mut stream_rng(seed, GenerationStream::River));
            assert!((7..=11).contains(&start), "seed {seed}: start {start}");
        }
    }

    #[test]
    fn test_clamped_at_right_edge() {
        let dims = GridDims::new(12);
        let river = generate_river_path(dims, 11);
        for gz in 0..dims.size() {
            assert!(river.row(gz).count() >= 2, "row {gz} lost tiles to clamping");
        }
    }

    #[test]
    fn test_contains_and_span() {
        let river = RiverPath::from_tiles(vec![
            GridCoord::new(5, 1),
            GridCoord::new(4, 1),
            GridCoord::new(6, 1),
            GridCoord::new(9, 2),
        ]);
        assert!(river.contains(GridCoord::new(6, 1)));
        assert!(!river.contains(GridCoord::new(6, 2)));
        assert_eq!(river.row_span(1), Some((4, 6)));
        assert_eq!(river.row_span(2), Some((9, 9)));
        assert_eq!(river.row_span(3), None);
    }

    #[test]
    fn test_bridge_on_empty_river_is_none() {
        let dims = GridDims::default();
        assert_eq!(find_bridge_location(dims, &RiverPath::default()), None);
    }

    #[test]
    fn test_bridge_outside_band_is_none() {
        let dims = GridDims::default();
        let river = RiverPath::from_tiles(vec![GridCoord::new(3, 2), GridCoord::new(4, 25)]);
        assert_eq!(find_bridge_location(dims, &river), None);
    }

    #[test]
    fn test_bridge_row_inside_central_band() {
        let dims = GridDims::default();
        assert_eq!(bridge_band(dims), 9..18);
        for seed in 0..50 {
            let bridge = find_bridge_location(dims, &river(seed)).expect("full river crosses band");
            assert!((9..18).contains(&bridge.row), "seed {seed}: row {}", bridge.row);
        }
    }

    #[test]
    fn test_bridge_picks_narrowest_first() {
        let dims = GridDims::default();
        let mut tiles = Vec::new();
        for gz in 0..dims.size() {
            let width = if gz == 12 || gz == 15 { 2 } else { 3 };
            tiles.extend((10..10 + width).map(|gx| GridCoord::new(gx, gz)));
        }
        let bridge = find_bridge_location(dims, &RiverPath::from_tiles(tiles)).unwrap();
        assert_eq!(bridge, Bridge { row: 12, min_col: 10, max_col: 11 });
        assert_eq!(bridge.deck_length(), 4);
    }
}
