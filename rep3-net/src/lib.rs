//! A simple networking layer for three-party MPC protocols.
#![warn(missing_docs)]

use std::{collections::BTreeMap, fmt, time::Duration};

pub mod config;
pub mod local;
pub mod tcp;

/// Default timeout for connection establishment and blocking receives.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Default max length (in bytes) of a single frame.
pub const DEFAULT_MAX_FRAME_LENGTH: usize = 1024 * 1024;

/// A reliable, ordered, point-to-point network between the parties of a
/// protocol session.
///
/// Delivery is FIFO per direction. Implementations must buffer at least one
/// in-flight frame per direction, so a protocol round may issue all of its
/// sends before any receive without risking a mutual-blocking deadlock.
pub trait Network: Send {
    /// Returns the id of this party.
    fn id(&self) -> usize;

    /// Sends a frame to the party with the given id. Blocks until the frame
    /// has been handed off to the transport.
    fn send(&self, to: usize, data: &[u8]) -> eyre::Result<()>;

    /// Receives the next frame from the party with the given id. Blocks
    /// until a frame arrives or the network's timeout elapses.
    fn recv(&self, from: usize) -> eyre::Result<Vec<u8>>;

    /// Returns the sent/received byte counts for every peer connection.
    fn get_connection_stats(&self) -> ConnectionStats;
}

/// Sent/received byte counts per peer connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStats {
    /// The id of the party these stats belong to.
    pub my_id: usize,
    /// Maps peer id to (sent, received) bytes.
    pub stats: BTreeMap<usize, (usize, usize)>,
}

impl fmt::Display for ConnectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, (sent, recv)) in &self.stats {
            writeln!(
                f,
                "Party {} <-> {}: SENT {} bytes, RECV {} bytes",
                self.my_id, id, sent, recv
            )?;
        }
        Ok(())
    }
}
