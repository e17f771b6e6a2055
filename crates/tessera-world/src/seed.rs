//! Deterministic seeded generation utilities.
//!
//! The only coarse random decisions per world (the biome permutation and the
//! river start column) each draw from their own [`ChaCha8Rng`] stream derived
//! from one world seed, so a seed fully reproduces a world.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A named stream of randomness within one world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GenerationStream {
    /// Quadrant-to-biome permutation.
    Biomes,
    /// River start column.
    River,
}

/// Derive a u64 seed for one generation stream from the world seed.
pub fn derive_stream_seed(world_seed: u64, stream: GenerationStream) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    stream.hash(&mut hasher);
    hasher.finish()
}

/// Deterministic RNG for one generation stream.
pub fn stream_rng(world_seed: u64, stream: GenerationStream) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_stream_seed(world_seed, stream))
}

/// Draw a fresh world seed from the thread-local generator.
pub fn fresh_seed() -> u64 {
    rand::rng().random()
}
