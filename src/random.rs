//! Seeded random number generation.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The generator used by every AMOSA component.
///
/// ChaCha8 produces the same stream on every platform, so a fixed seed
/// yields the same run everywhere.
pub type AmosaRng = ChaCha8Rng;

/// Creates a generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> AmosaRng {
    ChaCha8Rng::seed_from_u64(seed)
}
