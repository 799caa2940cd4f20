//! Typed send/receive helpers for the REP3 protocol on top of a
//! [`rep3_net::Network`]. Values are bincode-encoded, one value per frame.

use eyre::Context;
use rep3_net::Network;
use serde::{de::DeserializeOwned, Serialize};

use super::PartyID;

/// Sends one value to the given party.
pub fn send<N: Network, F: Serialize>(net: &N, to: PartyID, data: &F) -> eyre::Result<()> {
    let bytes = bincode::serialize(data).context("while serializing value for send")?;
    net.send(usize::from(to), &bytes)
        .with_context(|| format!("while sending to party {to}"))
}

/// Receives one value from the given party.
pub fn recv<N: Network, F: DeserializeOwned>(net: &N, from: PartyID) -> eyre::Result<F> {
    let bytes = net
        .recv(usize::from(from))
        .with_context(|| format!("while receiving from party {from}"))?;
    bincode::deserialize(&bytes).context("while deserializing received frame")
}

/// Sends one value to the party with id = my_id + 1 mod 3.
pub fn send_next<N: Network, F: Serialize>(net: &N, data: &F) -> eyre::Result<()> {
    let id = PartyID::try_from(net.id())?;
    send(net, id.next_id(), data)
}

/// Sends one value to the party with id = my_id + 2 mod 3.
pub fn send_prev<N: Network, F: Serialize>(net: &N, data: &F) -> eyre::Result<()> {
    let id = PartyID::try_from(net.id())?;
    send(net, id.prev_id(), data)
}

/// Receives one value from the party with id = my_id + 1 mod 3.
pub fn recv_next<N: Network, F: DeserializeOwned>(net: &N) -> eyre::Result<F> {
    let id = PartyID::try_from(net.id())?;
    recv(net, id.next_id())
}

/// Receives one value from the party with id = my_id + 2 mod 3.
pub fn recv_prev<N: Network, F: DeserializeOwned>(net: &N) -> eyre::Result<F> {
    let id = PartyID::try_from(net.id())?;
    recv(net, id.prev_id())
}

/// Sends `data` to both peers, then receives one value from each.
/// Returns the values received from the next and the previous party.
///
/// Sends go out before the receives; the [`Network`] buffering contract
/// keeps this pattern deadlock-free even when all parties broadcast at
/// the same time.
pub fn broadcast<N: Network, F: Serialize + DeserializeOwned>(
    net: &N,
    data: &F,
) -> eyre::Result<(F, F)> {
    send_next(net, data)?;
    send_prev(net, data)?;
    let from_next = recv_next(net)?;
    let from_prev = recv_prev(net)?;
    Ok((from_next, from_prev))
}
