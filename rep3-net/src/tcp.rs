//! TCP MPC network.

use std::{
    cmp::Ordering,
    io::{Read, Write},
    net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs},
    sync::atomic::AtomicUsize,
    time::{Duration, Instant},
};

use byteorder::{BigEndian, ReadBytesExt as _, WriteBytesExt as _};
use crossbeam_channel::Receiver;
use eyre::ContextCompat;
use intmap::IntMap;
use parking_lot::Mutex;
use socket2::{Domain, Socket, TcpKeepalive, Type};

use crate::{
    config::NetworkConfig, ConnectionStats, Network, DEFAULT_CONNECTION_TIMEOUT,
    DEFAULT_MAX_FRAME_LENGTH,
};

/// One established pairwise connection. Sends go through the shared stream,
/// receives are decoupled by a reader thread feeding a bounded queue.
#[derive(Debug)]
struct TcpPeer {
    stream: Mutex<TcpStream>,
    rx: Receiver<eyre::Result<Vec<u8>>>,
    sent: AtomicUsize,
    received: AtomicUsize,
}

/// A MPC network over [`TcpStream`]s, one connection per pair of parties.
/// Frames are length-prefixed; a reader thread per connection keeps at
/// least one received frame buffered per direction.
#[derive(Debug)]
pub struct TcpNetwork {
    id: usize,
    timeout: Duration,
    max_frame_length: usize,
    peers: IntMap<usize, TcpPeer>,
}

impl TcpNetwork {
    /// Establishes connections to all other parties per the provided
    /// [`NetworkConfig`]. The party with the lower id connects, the other
    /// one accepts.
    pub fn new(config: NetworkConfig) -> eyre::Result<Self> {
        config.check_config()?;
        let id = config.my_id;
        let bind_addr = config.bind_addr;
        let timeout = config.timeout.unwrap_or(DEFAULT_CONNECTION_TIMEOUT);
        let max_frame_length = config.max_frame_length.unwrap_or(DEFAULT_MAX_FRAME_LENGTH);

        let listener = Self::bind(bind_addr, timeout)?;
        tracing::trace!("party {id}: listening on {bind_addr}");

        let mut peers = IntMap::new();
        for party in &config.parties {
            match id.cmp(&party.id) {
                Ordering::Less => {
                    let addr = party
                        .address
                        .to_socket_addrs()?
                        .next()
                        .context("while converting to SocketAddr")?;
                    let start = Instant::now();
                    let mut stream = loop {
                        if let Ok(stream) = TcpStream::connect_timeout(&addr, timeout) {
                            break stream;
                        }
                        std::thread::sleep(Duration::from_millis(50));
                        if start.elapsed() > timeout {
                            eyre::bail!("timeout while connecting to party {} at {addr}", party.id);
                        }
                    };
                    stream.set_write_timeout(Some(timeout))?;
                    stream.set_nodelay(true)?;
                    stream.write_u64::<BigEndian>(id as u64)?;
                    tracing::trace!("party {id}: connected to party {}", party.id);
                    peers.insert(party.id, Self::spawn_reader(stream, max_frame_length));
                }
                Ordering::Greater => {
                    let (stream, _) = listener.accept()?;
                    // disable the accept read_timeout again, receives are
                    // driven by the queue timeout instead
                    let socket = Socket::from(stream);
                    socket.set_read_timeout(None)?;
                    let mut stream = TcpStream::from(socket);
                    stream.set_write_timeout(Some(timeout))?;
                    stream.set_nodelay(true)?;
                    let other_id = stream.read_u64::<BigEndian>()? as usize;
                    if config.parties.iter().all(|p| p.id != other_id) {
                        eyre::bail!("unexpected connection from unknown party {other_id}");
                    }
                    tracing::trace!("party {id}: accepted connection from party {other_id}");
                    peers.insert(other_id, Self::spawn_reader(stream, max_frame_length));
                }
                Ordering::Equal => continue,
            }
        }

        Ok(Self {
            id,
            timeout,
            max_frame_length,
            peers,
        })
    }

    fn bind(bind_addr: SocketAddr, timeout: Duration) -> eyre::Result<TcpListener> {
        let domain = match bind_addr {
            SocketAddr::V4(_) => Domain::IPV4,
            SocketAddr::V6(_) => Domain::IPV6,
        };
        let socket = Socket::new(domain, Type::STREAM, None)?;
        socket.set_reuse_address(true)?;
        if bind_addr.is_ipv6() {
            socket.set_only_v6(false)?;
        }
        // a read_timeout on the listener bounds the time spent in accept
        // when a party never shows up
        socket.set_read_timeout(Some(timeout))?;
        let keepalive = TcpKeepalive::new().with_interval(Duration::from_secs(1));
        socket.set_tcp_keepalive(&keepalive)?;
        socket.bind(&bind_addr.into())?;
        socket.listen(128)?;
        Ok(TcpListener::from(socket))
    }

    fn spawn_reader(stream: TcpStream, max_frame_length: usize) -> TcpPeer {
        let mut read_stream = stream.try_clone().expect("can clone stream");
        let (tx, rx) = crossbeam_channel::bounded(32);
        std::thread::spawn(move || loop {
            let data = read_next_frame(&mut read_stream, max_frame_length);
            let failed = data.is_err();
            if tx.send(data).is_err() || failed {
                break;
            }
        });
        TcpPeer {
            stream: Mutex::new(stream),
            rx,
            sent: AtomicUsize::default(),
            received: AtomicUsize::default(),
        }
    }
}

impl Network for TcpNetwork {
    fn id(&self) -> usize {
        self.id
    }

    fn send(&self, to: usize, data: &[u8]) -> eyre::Result<()> {
        if data.len() > self.max_frame_length {
            eyre::bail!("frame len {} > max {}", data.len(), self.max_frame_length);
        }
        let peer = self.peers.get(to).context("party id out-of-bounds")?;
        peer.sent
            .fetch_add(data.len(), std::sync::atomic::Ordering::Relaxed);
        let mut stream = peer.stream.lock();
        stream.write_u64::<BigEndian>(data.len() as u64)?;
        stream.write_all(data)?;
        Ok(())
    }

    fn recv(&self, from: usize) -> eyre::Result<Vec<u8>> {
        let peer = self.peers.get(from).context("party id out-of-bounds")?;
        let data = peer.rx.recv_timeout(self.timeout)??;
        peer.received
            .fetch_add(data.len(), std::sync::atomic::Ordering::Relaxed);
        Ok(data)
    }

    fn get_connection_stats(&self) -> ConnectionStats {
        let mut stats = std::collections::BTreeMap::new();
        for (id, peer) in self.peers.iter() {
            stats.insert(
                id,
                (
                    peer.sent.load(std::sync::atomic::Ordering::Relaxed),
                    peer.received.load(std::sync::atomic::Ordering::Relaxed),
                ),
            );
        }
        ConnectionStats {
            my_id: self.id,
            stats,
        }
    }
}

fn read_next_frame(stream: &mut TcpStream, max_frame_length: usize) -> eyre::Result<Vec<u8>> {
    let len = stream.read_u64::<BigEndian>()? as usize;
    if len > max_frame_length {
        eyre::bail!("frame len {len} > max {max_frame_length}");
    }
    let mut data = vec![0; len];
    stream.read_exact(&mut data)?;
    Ok(data)
}
