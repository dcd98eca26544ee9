//! Identifier generation.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use uuid::{Builder, Uuid};

/// Returns a fresh random UUID v4 as a string.
pub fn generate_identifier() -> String {
    Uuid::new_v4().to_string()
}

/// Source of entity ids for one seeding run.
///
/// The random source gives every run new entities. The seeded source yields
/// the same sequence of version-4 UUIDs for the same seed, which lets repeated
/// runs address the same items.
///
/// Seeded ids end up as item keys, so the seeded stream must not change across
/// `rand` upgrades.
#[derive(Debug)]
pub enum IdGenerator {
    Random,
    Seeded(ChaCha20Rng),
}

impl IdGenerator {
    pub fn random() -> Self {
        IdGenerator::Random
    }

    pub fn seeded(seed: u64) -> Self {
        IdGenerator::Seeded(ChaCha20Rng::seed_from_u64(seed))
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::random, Self::seeded)
    }

    pub fn next_id(&mut self) -> Uuid {
        match self {
            IdGenerator::Random => Uuid::new_v4(),
            IdGenerator::Seeded(rng) => {
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                Builder::from_random_bytes(bytes).into_uuid()
            }
        }
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, IdGenerator::Seeded(_))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::random()
    }
}
