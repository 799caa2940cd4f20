//! # REP3
//!
//! Replicated secret sharing between exactly three semi-honest parties.
//! A secret `x` is split into an additive triple `(s0, s1, s2)` with
//! `(s0 + s1 + s2) mod P == x`; party `k` is entitled to hold the pair
//! `(s_{k+1}, s_{k+2})` (indices mod 3), so every party holds two of the
//! three shares of every input. This 2-out-of-3 redundancy is what allows
//! a product to be computed from purely local cross terms.

pub mod arithmetic;
pub mod id;
pub mod network;
pub mod rngs;

mod fieldshare;

pub use fieldshare::Rep3FieldShare;
pub use id::PartyID;

use rand::Rng;
use rep3_net::Network;

use crate::field::PrimeField;
use crate::SEED_SIZE;

/// The state a party carries through a protocol session.
pub struct Rep3State {
    /// The id of the party.
    pub id: PartyID,
    /// The field all arithmetic happens in.
    pub field: PrimeField,
    /// The party's own share-blinding rng.
    pub rng: rngs::Rep3Rand,
}

impl Rep3State {
    /// Creates the state for the party behind `net`, seeding its rng from
    /// the operating system. A seeding failure is fatal; there is no
    /// fallback source.
    pub fn new<N: Network>(net: &N, field: PrimeField) -> eyre::Result<Self> {
        let id = PartyID::try_from(net.id())?;
        let rng = rngs::Rep3Rand::from_os()?;
        Ok(Self { id, field, rng })
    }

    /// Creates the state with a fixed seed, reproducing a fixed share
    /// stream. Only meaningful for tests: predictable seeds break secrecy.
    pub fn from_seed<N: Network>(
        net: &N,
        field: PrimeField,
        seed: [u8; SEED_SIZE],
    ) -> eyre::Result<Self> {
        let id = PartyID::try_from(net.id())?;
        let rng = rngs::Rep3Rand::from_seed(seed);
        Ok(Self { id, field, rng })
    }
}

/// Splits `secret` into the additive triple `(s0, s1, s2)`: the first two
/// components are uniform in `[0, P)` and the third is chosen so the triple
/// re-sums to the secret. `secret` must already be reduced into the field.
pub fn additive_shares<R: Rng>(secret: u64, field: &PrimeField, rng: &mut R) -> [u64; 3] {
    debug_assert!(secret < field.modulus());
    let s0 = field.random_element(rng);
    let s1 = field.random_element(rng);
    let s2 = field.sub(secret, field.add(s0, s1));
    [s0, s1, s2]
}

/// Secret-shares `secret` in dealer fashion, returning the replicated pair
/// each of the three parties is entitled to hold.
pub fn share_field_element<R: Rng>(
    secret: u64,
    field: &PrimeField,
    rng: &mut R,
) -> [Rep3FieldShare; 3] {
    let [s0, s1, s2] = additive_shares(secret, field, rng);
    [
        Rep3FieldShare::new(s1, s2),
        Rep3FieldShare::new(s2, s0),
        Rep3FieldShare::new(s0, s1),
    ]
}

/// Reconstructs a shared value from the three parties' replicated pairs.
pub fn combine_field_element(
    share0: Rep3FieldShare,
    share1: Rep3FieldShare,
    share2: Rep3FieldShare,
    field: &PrimeField,
) -> u64 {
    debug_assert_eq!(share0.b, share1.a);
    debug_assert_eq!(share1.b, share2.a);
    debug_assert_eq!(share2.b, share0.a);
    field.add(share0.a, field.add(share1.a, share2.a))
}
