//! In-process MPC network.

use crossbeam_channel::{Receiver, Sender};
use eyre::ContextCompat;
use intmap::IntMap;
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use crate::{ConnectionStats, Network, DEFAULT_CONNECTION_TIMEOUT};

// Frames buffered per direction before a send blocks. The protocol relies on
// at least one buffered frame per direction to issue sends before receives.
const CHANNEL_BOUND: usize = 32;

/// Both directions of one pairwise link, as seen from one end.
#[derive(Debug)]
struct Peer {
    tx: Sender<Vec<u8>>,
    rx: Receiver<Vec<u8>>,
    sent: AtomicUsize,
    received: AtomicUsize,
}

/// A MPC network over bounded in-process channels. Backs the single-process
/// session mode and the test suites.
#[derive(Debug)]
pub struct LocalNetwork {
    id: usize,
    timeout: Duration,
    peers: IntMap<usize, Peer>,
}

impl LocalNetwork {
    /// Create new [`LocalNetwork`]s for `num_parties`.
    pub fn new(num_parties: usize) -> Vec<Self> {
        Self::new_with_timeout(num_parties, DEFAULT_CONNECTION_TIMEOUT)
    }

    /// Create new [`LocalNetwork`]s for `num_parties`, setting a timeout.
    pub fn new_with_timeout(num_parties: usize, timeout: Duration) -> Vec<Self> {
        let mut senders = Vec::new();
        let mut receivers = Vec::new();

        for _ in 0..num_parties {
            senders.push(IntMap::new());
            receivers.push(IntMap::new());
        }

        #[allow(clippy::needless_range_loop)]
        for i in 0..num_parties {
            for j in 0..num_parties {
                if i != j {
                    let (tx, rx) = crossbeam_channel::bounded(CHANNEL_BOUND);
                    senders[i].insert(j, tx);
                    receivers[j].insert(i, rx);
                }
            }
        }

        let mut networks = Vec::with_capacity(num_parties);
        for (id, (mut send, mut recv)) in senders.into_iter().zip(receivers).enumerate() {
            let mut peers = IntMap::new();
            for other in 0..num_parties {
                if other == id {
                    continue;
                }
                let tx = send.remove(other).expect("sender was inserted above");
                let rx = recv.remove(other).expect("receiver was inserted above");
                peers.insert(
                    other,
                    Peer {
                        tx,
                        rx,
                        sent: AtomicUsize::default(),
                        received: AtomicUsize::default(),
                    },
                );
            }
            networks.push(LocalNetwork { id, timeout, peers });
        }

        networks
    }

    /// Create new [`LocalNetwork`]s for 3 parties.
    pub fn new_3_parties() -> [Self; 3] {
        Self::new(3).try_into().expect("correct len")
    }
}

impl Network for LocalNetwork {
    fn id(&self) -> usize {
        self.id
    }

    fn send(&self, to: usize, data: &[u8]) -> eyre::Result<()> {
        let peer = self.peers.get(to).context("party id out-of-bounds")?;
        peer.sent.fetch_add(data.len(), Ordering::Relaxed);
        peer.tx.send_timeout(data.to_owned(), self.timeout)?;
        Ok(())
    }

    fn recv(&self, from: usize) -> eyre::Result<Vec<u8>> {
        let peer = self.peers.get(from).context("party id out-of-bounds")?;
        let data = peer.rx.recv_timeout(self.timeout)?;
        peer.received.fetch_add(data.len(), Ordering::Relaxed);
        Ok(data)
    }

    fn get_connection_stats(&self) -> ConnectionStats {
        let mut stats = std::collections::BTreeMap::new();
        for (id, peer) in self.peers.iter() {
            stats.insert(
                id,
                (
                    peer.sent.load(Ordering::Relaxed),
                    peer.received.load(Ordering::Relaxed),
                ),
            );
        }
        ConnectionStats {
            my_id: self.id,
            stats,
        }
    }
}
