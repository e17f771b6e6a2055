//! Command-line argument parsing for Tessera.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tessera command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "tessera", about = "Tessera tile world generator")]
pub struct CliArgs {
    /// World seed; identical seeds reproduce identical worlds.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Side length of the tile grid.
    #[arg(long)]
    pub grid_size: Option<usize>,

    /// Number of structures to place via the site allocator.
    #[arg(long, default_value_t = 6)]
    pub structures: usize,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print an ASCII map of the generated grid.
    #[arg(long)]
    pub print_map: bool,

    /// Leave the original (unbatched) primitives visible after batching.
    #[arg(long)]
    pub unbatched: bool,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = Some(seed);
        }
        if let Some(size) = args.grid_size {
            self.world.grid_size = size;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.print_map {
            self.debug.print_map = true;
        }
        if args.unbatched {
            self.batch.start_batched = false;
        }
    }
}
