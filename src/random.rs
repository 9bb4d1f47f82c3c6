//! Seeded random sources.
//!
//! Every trajectory owns its own generator. Seeds are derived from the
//! run seed and the trajectory coordinates, so a run is reproducible no
//! matter how the worker pool interleaves the trajectories.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derives a well-mixed seed for one `(round, trajectory)` pair.
///
/// SplitMix64 finalizer applied over the combined coordinates.
pub fn derive_seed(seed: u64, round: usize, trajectory: usize) -> u64 {
    let mut z = seed
        ^ (round as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (trajectory as u64).wrapping_add(1).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
