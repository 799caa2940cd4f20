//! Core building blocks for three-party secure computation over a prime
//! field: modular arithmetic, replicated secret sharing and the sum and
//! product protocols.

pub mod field;
pub mod protocols;

/// The rng every party owns for drawing its share blinding.
pub type RngType = rand_chacha::ChaCha12Rng;

/// The seed size of [`RngType`].
pub const SEED_SIZE: usize = std::mem::size_of::<<RngType as rand::SeedableRng>::Seed>();
