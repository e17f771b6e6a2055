//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest grid side that still leaves an interior for site placement.
const MIN_GRID_SIZE: usize = 8;
/// Largest grid side accepted; the tile index is a flat `Vec`.
const MAX_GRID_SIZE: usize = 512;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid dimensions, biome blending, and seeding.
    pub world: WorldConfig,
    /// Structure site allocation rules.
    pub sites: SiteConfig,
    /// Decoration scatter probabilities.
    pub decoration: DecorationConfig,
    /// Static geometry batching.
    pub batch: BatchConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square tile grid.
    pub grid_size: usize,
    /// Half-width, in tiles, of the jittered band around each quadrant midline.
    pub transition_width: usize,
    /// World seed. `None` draws a fresh seed per run (and logs it for replay).
    pub seed: Option<u64>,
}

/// Site allocator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// A new site must be strictly farther than this (Chebyshev) from every placed site.
    pub spacing: usize,
    /// Tiles within this many rings of the map edge never host a site.
    pub interior_margin: usize,
}

/// Decoration scatter configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecorationConfig {
    /// Per-tile decoration probability in meadow.
    pub meadow_probability: f64,
    /// Per-tile decoration probability in forest.
    pub forest_probability: f64,
    /// Per-tile decoration probability in desert.
    pub desert_probability: f64,
    /// Per-tile decoration probability on non-peak mountain tiles.
    pub mountain_probability: f64,
    /// Outer rings kept clear of tall decorations.
    pub edge_clearance: usize,
}

/// Static geometry batching configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BatchConfig {
    /// Present merged batches right after batching instead of the originals.
    pub start_batched: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Print an ASCII rendering of the grid after generation.
    pub print_map: bool,
    /// Directory for JSON log files. Only used in debug builds.
    pub log_dir: Option<PathBuf>,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: 28,
            transition_width: 3,
            seed: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            spacing: 5,
            interior_margin: 3,
        }
    }
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            meadow_probability: 0.05,
            forest_probability: 0.15,
            desert_probability: 0.08,
            mountain_probability: 0.12,
            edge_clearance: 2,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            start_batched: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            print_map: false,
            log_dir: None,
        }
    }
}

/// Platform config directory for Tessera (e.g. `~/.config/tessera`).
///
/// Falls back to the working directory when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("tessera"))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Validation ---

impl Config {
    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = self.world.grid_size;
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid) {
            return Err(ConfigError::Invalid {
                field: "world.grid_size",
                reason: format!("must be in {MIN_GRID_SIZE}..={MAX_GRID_SIZE}, got {grid}"),
            });
        }
        if self.world.transition_width >= grid / 2 {
            return Err(ConfigError::Invalid {
                field: "world.transition_width",
                reason: format!(
                    "must be smaller than half the grid ({}), got {}",
                    grid / 2,
                    self.world.transition_width
                ),
            });
        }
        if self.sites.interior_margin * 2 >= grid {
            return Err(ConfigError::Invalid {
                field: "sites.interior_margin",
                reason: format!("leaves no interior on a {grid}-tile grid"),
            });
        }

        let probabilities = [
            ("decoration.meadow_probability", self.decoration.meadow_probability),
            ("decoration.forest_probability", self.decoration.forest_probability),
            ("decoration.desert_probability", self.decoration.desert_probability),
            ("decoration.mountain_probability", self.decoration.mountain_probability),
        ];
        for (field, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("probability must be in [0, 1], got {p}"),
                });
            }
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
