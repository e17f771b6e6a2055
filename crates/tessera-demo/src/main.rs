//! Demo binary that generates a Tessera world end to end and reports on it.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p tessera-demo -- --seed 42 --print-map` to see the grid.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tessera_batch::{batch_static, extract_scene};
use tessera_config::{CliArgs, Config, default_config_dir};
use tessera_world::{Biome, World};
use tracing::{error, info, warn};

/// Place up to `count` structures through the find/commit cycle.
fn place_structures(world: &mut World, count: usize) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        let Some(site) = world.find_site() else {
            warn!(placed, requested = count, "no free site left");
            break;
        };
        match world.commit_site(site.x, site.z) {
            Ok(placement) => {
                info!(x = site.x, z = site.z, biome = %placement.biome, "structure placed");
                placed += 1;
            }
            Err(e) => {
                error!(%e, "site commit rejected");
                break;
            }
        }
    }
    placed
}

/// Re-read `config.ron` and report whether it was edited since `loaded` was read.
fn config_changed_on_disk(loaded: &Config, config_dir: &Path) -> bool {
    match loaded.reload(config_dir) {
        Ok(Some(_)) => {
            info!(dir = %config_dir.display(), "config.ron changed during the run; rerun to apply");
            true
        }
        Ok(None) => false,
        Err(e) => {
            warn!(%e, "config.ron could not be re-read");
            false
        }
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let loaded = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut config = loaded.clone();
    config.apply_cli_overrides(&args);

    let log_dir = config.debug.log_dir.clone().unwrap_or_else(|| config_dir.join("logs"));
    tessera_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let mut world = match World::generate(&config) {
        Ok(world) => world,
        Err(e) => {
            error!(%e, "world generation failed");
            return ExitCode::FAILURE;
        }
    };
    info!(seed = world.seed(), "replay with --seed {}", world.seed());

    let placed = place_structures(&mut world, args.structures);
    let counts = world.sites().placement_counts();
    for biome in Biome::ALL {
        info!(%biome, structures = counts[biome.index()], "placement tally");
    }

    let decorations = match world.scatter_decorations() {
        Ok(decorations) => decorations.len(),
        Err(e) => {
            error!(%e, "decoration pass failed");
            return ExitCode::FAILURE;
        }
    };

    let mut batches = batch_static(extract_scene(&world));
    if !config.batch.start_batched {
        batches.show_original();
    }
    let stats = batches.stats();
    info!(
        primitives = stats.primitives,
        batches = stats.batches,
        draws_original = stats.draws_original,
        draws_batched = stats.draws_batched,
        vertices = stats.vertices_batched,
        triangles = stats.triangles_batched,
        "scene batched"
    );
    info!(
        mode = ?batches.mode(),
        draws = batches.visible_draw_units().len(),
        "presentation"
    );
    if config.debug.print_map {
        println!("{}", world.grid().ascii_map());
    }

    info!(
        seed = world.seed(),
        tiles = world.grid().tiles().len(),
        structures = placed,
        decorations,
        bridge = ?world.grid().bridge(),
        "world ready"
    );
    config_changed_on_disk(&loaded, &config_dir);
    ExitCode::SUCCESS
}
