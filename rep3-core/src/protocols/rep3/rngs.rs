//! Per-party randomness for share generation.

use eyre::Context;
use rand::{rngs::OsRng, SeedableRng};

use crate::field::PrimeField;
use crate::{RngType, SEED_SIZE};

/// The explicitly owned rng a party draws its share blinding from.
///
/// Every party must seed its own instance independently; shared or
/// predictable seeds let a peer reconstruct the blinding and with it the
/// secret being shared.
#[derive(Debug)]
pub struct Rep3Rand {
    pub(crate) rng: RngType,
}

impl Rep3Rand {
    /// Seeds a fresh rng from the operating system. Failure is fatal:
    /// proceeding without fresh randomness would silently break secrecy.
    pub fn from_os() -> eyre::Result<Self> {
        let rng = RngType::from_rng(OsRng).context("while seeding party rng from the OS")?;
        Ok(Self { rng })
    }

    /// Seeds a deterministic rng. Test use only.
    pub fn from_seed(seed: [u8; SEED_SIZE]) -> Self {
        Self {
            rng: RngType::from_seed(seed),
        }
    }

    /// Draws a uniform field element.
    pub fn random_element(&mut self, field: &PrimeField) -> u64 {
        field.random_element(&mut self.rng)
    }
}
