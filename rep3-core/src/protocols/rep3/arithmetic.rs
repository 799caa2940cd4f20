//! The three-party sum and product protocols on replicated shares.
//!
//! Both operations start with a share-distribution round, after which every
//! party holds two of the three additive shares of every input. Addition
//! then needs only one exchange of locally computed partial sums, while
//! multiplication first forms local cross terms and re-shares the partial
//! product through the addition protocol (degree reduction).

use eyre::Context;
use rep3_net::Network;

use crate::field::PrimeField;

use super::{additive_shares, network, PartyID, Rep3FieldShare, Rep3State};

/// Runs the share-distribution round for this party's `secret`.
///
/// The secret is split into `(s0, s1, s2)` and party `j` receives the pair
/// `(s_{j+1}, s_{j+2})`; we keep our own pair and collect the corresponding
/// pairs the peers send for their secrets. The result is indexed by the id
/// of the party owning the underlying secret. `secret` must already be
/// reduced into the field.
///
/// Both sends are issued before the receives. This cannot deadlock because
/// the [`Network`] contract buffers at least one in-flight frame per
/// direction.
pub fn share_secret<N: Network>(
    secret: u64,
    net: &N,
    state: &mut Rep3State,
) -> eyre::Result<[Rep3FieldShare; 3]> {
    let field = state.field;
    let shares = additive_shares(secret, &field, &mut state.rng.rng);
    let my_id = state.id;
    let next = my_id.next_id();
    let prev = my_id.prev_id();

    let pair_for = |j: PartyID| {
        let j = usize::from(j);
        Rep3FieldShare::new(shares[(j + 1) % 3], shares[(j + 2) % 3])
    };

    network::send(net, next, &pair_for(next)).context("while distributing share pairs")?;
    network::send(net, prev, &pair_for(prev)).context("while distributing share pairs")?;

    let from_next: Rep3FieldShare =
        network::recv(net, next).context("while collecting share pairs")?;
    let from_prev: Rep3FieldShare =
        network::recv(net, prev).context("while collecting share pairs")?;

    let mut held = [Rep3FieldShare::default(); 3];
    held[usize::from(my_id)] = pair_for(my_id);
    held[usize::from(next)] = from_next;
    held[usize::from(prev)] = from_prev;
    Ok(held)
}

/// The partial sum party `k` contributes to a reconstruction: the additive
/// shares with index `k + 1` of all three secrets, which is the first held
/// component of each replicated pair. Across the three parties every index
/// of every triple is counted exactly once.
pub fn partial_sum(held: &[Rep3FieldShare; 3], field: &PrimeField) -> u64 {
    held.iter().fold(0, |acc, share| field.add(acc, share.a))
}

/// The three cross terms party `k` can compute locally from its replicated
/// pairs `(x_{k+1}, x_{k+2})` and `(y_{k+1}, y_{k+2})` of two shared
/// operands. Summed over the parties, the nine cross terms of `x * y` are
/// each counted exactly once.
pub fn partial_product(x: Rep3FieldShare, y: Rep3FieldShare, field: &PrimeField) -> u64 {
    let t = field.add(field.mul(x.a, y.a), field.mul(x.a, y.b));
    field.add(t, field.mul(x.b, y.a))
}

/// Secure addition: every party contributes one secret and all parties
/// learn `(x0 + x1 + x2) mod P` and nothing else.
pub fn sum<N: Network>(secret: u64, net: &N, state: &mut Rep3State) -> eyre::Result<u64> {
    tracing::debug!("party {}: secure addition", state.id);
    let field = state.field;
    let held = share_secret(secret, net, state).context("during share distribution")?;

    let partial = partial_sum(&held, &field);
    let (from_next, from_prev) =
        network::broadcast(net, &partial).context("while exchanging partial sums")?;
    Ok(field.add(partial, field.add(from_next, from_prev)))
}

/// Secure multiplication of party 0's and party 1's secrets; party 2 takes
/// part purely as a helper and its input is replaced by zero.
///
/// After share distribution each party forms its local partial product.
/// That partial is a degree-two sharing of `x0 * x1`, so it is treated as a
/// fresh secret and pushed through [`sum`]: the mandatory degree-reduction
/// round without which chained multiplications would not stay reconstructible.
pub fn product<N: Network>(secret: u64, net: &N, state: &mut Rep3State) -> eyre::Result<u64> {
    tracing::debug!("party {}: secure multiplication", state.id);
    let field = state.field;
    let secret = if state.id == PartyID::ID2 { 0 } else { secret };
    let held = share_secret(secret, net, state).context("during share distribution")?;

    let partial = partial_product(held[0], held[1], &field);
    sum(partial, net, state).context("during degree reduction")
}
