//! Session orchestration for the three-party sum/product calculator.
//!
//! A session runs two computations back to back: the secure sum of all
//! three private inputs, then the secure product of party 0's and party 1's
//! inputs (party 2 helps without contributing an operand). Each party
//! reconstructs both results independently; there is no cross-party
//! agreement round.
#![warn(missing_docs)]

use eyre::{eyre, Context};
use rep3_core::field::PrimeField;
use rep3_core::protocols::rep3::{arithmetic, Rep3State};
use rep3_net::{local::LocalNetwork, Network};
use std::thread;

/// The prime of the reference deployment.
pub const DEFAULT_MODULUS: u64 = 23;

/// One party's independently reconstructed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyResult {
    /// The id of the party that reconstructed these values.
    pub id: usize,
    /// `(x0 + x1 + x2) mod P` as seen by this party.
    pub sum: u64,
    /// `(x0 * x1) mod P` as seen by this party.
    pub product: u64,
}

/// Runs one party's full session over an established network: secure
/// addition first, then secure multiplication. Any channel or randomness
/// failure aborts the session; there is no retry.
pub fn run_party<N: Network>(net: &N, secret: i64, field: PrimeField) -> eyre::Result<PartyResult> {
    let id = net.id();
    let mut state = Rep3State::new(net, field)
        .with_context(|| format!("while setting up protocol state for party {id}"))?;
    let secret = field.reduce(secret);

    let sum = arithmetic::sum(secret, net, &mut state)
        .with_context(|| format!("party {id}: secure addition failed"))?;
    let product = arithmetic::product(secret, net, &mut state)
        .with_context(|| format!("party {id}: secure multiplication failed"))?;

    tracing::debug!("party {id}: session finished, sum={sum} product={product}");
    Ok(PartyResult { id, sum, product })
}

/// Wires three in-process parties together over buffered local channels and
/// runs the full session on each, one thread per party.
///
/// All three threads are joined before returning. If any party failed, the
/// first failure is reported and no partial results are handed out.
pub fn run_local(inputs: [i64; 3], field: PrimeField) -> eyre::Result<[PartyResult; 3]> {
    let nets = LocalNetwork::new_3_parties();
    let mut handles = Vec::with_capacity(3);
    for (net, secret) in nets.into_iter().zip(inputs) {
        handles.push(thread::spawn(move || run_party(&net, secret, field)));
    }

    let mut results = Vec::with_capacity(3);
    let mut failure = None;
    for (id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(result)) => results.push(result),
            Ok(Err(err)) => {
                if failure.is_none() {
                    failure = Some(err.wrap_err(format!("party {id} did not complete")));
                }
            }
            Err(_) => {
                if failure.is_none() {
                    failure = Some(eyre!("party {id} panicked"));
                }
            }
        }
    }
    if let Some(err) = failure {
        return Err(err);
    }
    results
        .try_into()
        .map_err(|_| eyre!("missing party results"))
}
