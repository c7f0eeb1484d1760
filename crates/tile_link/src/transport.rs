//! Socket bridge between one remote device and two in-process queues.
//!
//! A background thread accepts exactly one client, then spawns the writer and
//! turns itself into the reader. Inbound lines land on an unbounded channel
//! the consumer drains once per tick; outbound lines are written in queue
//! order, one flush per line.

use std::{
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    net::{Shutdown, SocketAddr, TcpListener, TcpStream},
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::{LinkError, Result};

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportConfig {
    pub bind_addr: SocketAddr,
    /// How often the accept loop checks for a client and for shutdown
    pub accept_poll_interval: Duration,
    /// Give up waiting for a client after this long
    pub accept_timeout: Option<Duration>,
    /// Granularity at which a blocked reader notices shutdown
    pub read_timeout: Option<Duration>,
    /// Longer lines are dropped up to the next newline
    pub max_line_len: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            accept_poll_interval: Duration::from_millis(50),
            accept_timeout: None,
            read_timeout: Some(Duration::from_millis(250)),
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

#[derive(Debug, Default)]
pub struct TransportStats {
    lines_received: AtomicU64,
    lines_sent: AtomicU64,
    lines_dropped: AtomicU64,
}

impl TransportStats {
    pub fn lines_received(&self) -> u64 {
        self.lines_received.load(Ordering::Relaxed)
    }

    pub fn lines_sent(&self) -> u64 {
        self.lines_sent.load(Ordering::Relaxed)
    }

    pub fn lines_dropped(&self) -> u64 {
        self.lines_dropped.load(Ordering::Relaxed)
    }
}

#[derive(Default)]
struct Shared {
    shutdown: AtomicBool,
    connected: AtomicBool,
    stream: Mutex<Option<TcpStream>>,
    peer: Mutex<Option<SocketAddr>>,
    writer: Mutex<Option<JoinHandle<()>>>,
    stats: TransportStats,
}

impl Shared {
    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

pub struct Transport {
    local_addr: SocketAddr,
    inbound: Receiver<String>,
    outbound: Sender<String>,
    shutdown_tx: Option<Sender<()>>,
    accept_thread: Option<JoinHandle<()>>,
    shared: Arc<Shared>,
}

impl Transport {
    /// Bind the listener and start waiting for a client in the background.
    pub fn start(config: &TransportConfig) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).map_err(|source| LinkError::Bind {
            addr: config.bind_addr,
            source,
        })?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;
        log::info!("awaiting connection on {local_addr}");

        let (inbound_tx, inbound) = unbounded();
        let (outbound, outbound_rx) = unbounded();
        let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
        let shared = Arc::new(Shared::default());

        let thread_shared = shared.clone();
        let thread_config = config.clone();
        let accept_thread = thread::Builder::new()
            .name("tile-link-accept".to_string())
            .spawn(move || {
                let Some((stream, peer)) = accept_one(&listener, &thread_config, &thread_shared) else {
                    return;
                };
                drop(listener);
                serve(stream, peer, &thread_config, thread_shared, inbound_tx, outbound_rx, shutdown_rx);
            })
            .map_err(|err| LinkError::ThreadSpawn(err.to_string()))?;

        Ok(Self {
            local_addr,
            inbound,
            outbound,
            shutdown_tx: Some(shutdown_tx),
            accept_thread: Some(accept_thread),
            shared,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        *self.shared.peer.lock()
    }

    /// True once the connection (or the wait for one) is over.
    pub fn is_finished(&self) -> bool {
        self.accept_thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    pub fn inbound(&self) -> &Receiver<String> {
        &self.inbound
    }

    pub fn outbound(&self) -> &Sender<String> {
        &self.outbound
    }

    /// Queue a line for the device. Lines queued before a client connects are
    /// sent once it does.
    pub fn send(&self, line: impl Into<String>) {
        if self.outbound.send(line.into()).is_err() {
            log::debug!("writer gone, outbound line dropped");
        }
    }

    pub fn stats(&self) -> &TransportStats {
        &self.shared.stats
    }

    /// Stop both threads and close the socket. Unsent lines are discarded.
    pub fn shutdown(&mut self) {
        let Some(accept_thread) = self.accept_thread.take() else {
            return;
        };
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shutdown_tx.take();
        if let Some(stream) = self.shared.stream.lock().take() {
            if let Err(err) = stream.shutdown(Shutdown::Both) {
                log::debug!("socket shutdown: {err}");
            }
        }

        if accept_thread.join().is_err() {
            log::error!("reader thread panicked");
        }
        let writer = self.shared.writer.lock().take();
        if let Some(writer) = writer {
            if writer.join().is_err() {
                log::error!("writer thread panicked");
            }
        }
        self.shared.connected.store(false, Ordering::SeqCst);
        log::info!("transport on {} shut down", self.local_addr);
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn accept_one(listener: &TcpListener, config: &TransportConfig, shared: &Shared) -> Option<(TcpStream, SocketAddr)> {
    let started = Instant::now();
    loop {
        if shared.is_shutdown() {
            return None;
        }
        match listener.accept() {
            Ok((stream, peer)) => {
                log::info!("accepted connection from {peer}");
                return Some((stream, peer));
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                if config.accept_timeout.is_some_and(|timeout| started.elapsed() >= timeout) {
                    log::warn!("no client connected within {:?}, giving up", config.accept_timeout);
                    return None;
                }
                thread::sleep(config.accept_poll_interval);
            }
            Err(err) => {
                log::error!("accept failed: {err}");
                return None;
            }
        }
    }
}

fn serve(
    stream: TcpStream,
    peer: SocketAddr,
    config: &TransportConfig,
    shared: Arc<Shared>,
    inbound: Sender<String>,
    outbound: Receiver<String>,
    shutdown: Receiver<()>,
) {
    let prepared = stream
        .set_nonblocking(false)
        .and_then(|_| stream.set_read_timeout(config.read_timeout))
        .and_then(|_| Ok((stream.try_clone()?, stream.try_clone()?)));
    let (write_half, control) = match prepared {
        Ok(halves) => halves,
        Err(err) => {
            log::error!("could not set up connection to {peer}: {err}");
            return;
        }
    };

    *shared.stream.lock() = Some(control);
    *shared.peer.lock() = Some(peer);
    shared.connected.store(true, Ordering::SeqCst);
    if shared.is_shutdown() {
        if let Some(control) = shared.stream.lock().take() {
            let _ = control.shutdown(Shutdown::Both);
        }
        shared.connected.store(false, Ordering::SeqCst);
        return;
    }

    let writer_shared = shared.clone();
    let writer = thread::Builder::new()
        .name("tile-link-writer".to_string())
        .spawn(move || write_lines(write_half, &outbound, &shutdown, &writer_shared));
    match writer {
        Ok(handle) => *shared.writer.lock() = Some(handle),
        Err(err) => log::error!("failed to spawn writer thread: {err}"),
    }

    read_lines(stream, config.max_line_len, &inbound, &shared);
    shared.connected.store(false, Ordering::SeqCst);
}

fn read_lines(stream: TcpStream, max_line_len: usize, inbound: &Sender<String>, shared: &Shared) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    // set while skipping the rest of an oversized line
    let mut discarding = false;
    loop {
        let room = (max_line_len + 1).saturating_sub(buf.len()) as u64;
        match (&mut reader).take(room).read_until(b'\n', &mut buf) {
            Ok(0) => {
                if !discarding && !buf.is_empty() && !deliver(&buf, inbound, shared) {
                    return;
                }
                log::info!("connection closed by peer");
                return;
            }
            Ok(_) if buf.ends_with(b"\n") => {
                if discarding {
                    discarding = false;
                } else if !deliver(&buf, inbound, shared) {
                    return;
                }
                buf.clear();
            }
            Ok(_) if buf.len() > max_line_len => {
                if !discarding {
                    log::warn!("dropping inbound line longer than {max_line_len} bytes");
                    shared.stats.lines_dropped.fetch_add(1, Ordering::Relaxed);
                    discarding = true;
                }
                buf.clear();
            }
            Ok(_) => {
                if discarding {
                    buf.clear();
                }
            }
            // read timeout: keep the partial line and look at the flag
            Err(err) if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {}
            Err(err) => {
                if shared.is_shutdown() {
                    log::debug!("reader stopped by shutdown: {err}");
                } else {
                    log::error!("error while reading from device: {err}");
                }
                return;
            }
        }
        if shared.is_shutdown() {
            log::debug!("reader stopped by shutdown");
            return;
        }
    }
}

/// Returns false once the inbound queue is gone.
fn deliver(buf: &[u8], inbound: &Sender<String>, shared: &Shared) -> bool {
    let line = decode_line(buf);
    if line.is_empty() {
        return true;
    }
    shared.stats.lines_received.fetch_add(1, Ordering::Relaxed);
    if inbound.send(line).is_err() {
        log::info!("inbound queue closed, reader stopping");
        return false;
    }
    true
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

fn write_lines(stream: TcpStream, outbound: &Receiver<String>, shutdown: &Receiver<()>, shared: &Shared) {
    let mut writer = BufWriter::new(stream);
    while !shared.is_shutdown() {
        select! {
            recv(outbound) -> line => {
                let Ok(line) = line else {
                    return;
                };
                if let Err(err) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
                    log::error!("error while writing to device: {err}");
                    return;
                }
                shared.stats.lines_sent.fetch_add(1, Ordering::Relaxed);
            }
            recv(shutdown) -> _ => break,
        }
    }
    log::debug!("writer stopped");
}
