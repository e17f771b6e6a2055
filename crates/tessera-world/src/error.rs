//! World error types.
//!
//! Expected variation (no free site, no bridge, queries off the map) is
//! answered with `Option`s and fallbacks; these errors are caller bugs.

use tessera_config::ConfigError;

/// Contract violations reported by world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A placement was committed at a coordinate outside the grid.
    #[error("coordinate ({x}, {z}) is outside the world grid")]
    OutOfBounds {
        /// World x.
        x: i32,
        /// World z.
        z: i32,
    },

    /// The decoration pass was requested a second time.
    #[error("decorations have already been scattered for this world")]
    AlreadyDecorated,

    /// The configuration cannot produce a world.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
