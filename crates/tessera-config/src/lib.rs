//! Configuration system for Tessera.
//!
//! Provides world generation settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, validation, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    BatchConfig, Config, DebugConfig, DecorationConfig, SiteConfig, WorldConfig,
    default_config_dir,
};
pub use error::ConfigError;
