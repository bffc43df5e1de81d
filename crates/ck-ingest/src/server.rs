//! Loopback TCP listener feeding [`StreamSample`]s to the session thread.

use crate::protocol::{StreamSample, parse_line};
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_INGEST_PORT: u16 = 9000;

#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub bind: IpAddr,
    /// `0` picks an ephemeral port.
    pub port: u16,
    /// Sleep between accept polls.
    pub poll_interval: Duration,
    /// Connection read timeout; bounds how long a reader ignores `stop()`.
    pub read_timeout: Duration,
    /// Longer lines are dropped up to their newline.
    pub max_line_len: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_INGEST_PORT,
            poll_interval: Duration::from_millis(50),
            read_timeout: Duration::from_millis(200),
            max_line_len: 1 << 20,
        }
    }
}

/// Running listener. Samples are only sent, never applied, here: the owner
/// of the receiving end is the single writer of curve state.
pub struct IngestServer {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    accept_thread: Option<JoinHandle<()>>,
}

impl IngestServer {
    pub fn start(config: IngestConfig, samples: Sender<StreamSample>) -> std::io::Result<Self> {
        let listener = TcpListener::bind((config.bind, config.port))?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;
        let running = Arc::new(AtomicBool::new(true));

        let flag = Arc::clone(&running);
        let accept_thread = std::thread::Builder::new()
            .name("ck-ingest-accept".to_string())
            .spawn(move || accept_loop(listener, config, flag, samples))?;

        info!(addr = %local_addr, "Ingest listener started");
        Ok(Self {
            local_addr,
            running,
            accept_thread: Some(accept_thread),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop accepting. Connection threads are not joined; they exit on their
    /// next read timeout.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.accept_thread.take() {
            if handle.join().is_err() {
                warn!("Ingest accept thread panicked");
            }
            info!(addr = %self.local_addr, "Ingest listener stopped");
        }
    }
}

impl Drop for IngestServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn accept_loop(
    listener: TcpListener,
    config: IngestConfig,
    running: Arc<AtomicBool>,
    samples: Sender<StreamSample>,
) {
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, peer)) => {
                debug!(%peer, "Ingest connection");
                let flag = Arc::clone(&running);
                let tx = samples.clone();
                let timeout = config.read_timeout;
                let max_line_len = config.max_line_len;
                let spawned = std::thread::Builder::new()
                    .name(format!("ck-ingest-{peer}"))
                    .spawn(move || {
                        if let Err(e) =
                            handle_connection(stream, timeout, max_line_len, &flag, &tx)
                        {
                            debug!(%peer, error = %e, "Ingest connection closed");
                        }
                    });
                if let Err(e) = spawned {
                    warn!(error = %e, "Failed to spawn ingest connection thread");
                }
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                std::thread::sleep(config.poll_interval);
            }
            Err(e) => {
                warn!(error = %e, "Ingest accept error");
                std::thread::sleep(config.poll_interval);
            }
        }
    }
}

fn handle_connection(
    stream: TcpStream,
    timeout: Duration,
    max_line_len: usize,
    running: &AtomicBool,
    samples: &Sender<StreamSample>,
) -> std::io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(timeout))?;
    let mut reader = BufReader::new(stream);
    // Raw bytes, so a UTF-8 sequence cut by a timeout survives until the rest arrives.
    let mut line: Vec<u8> = Vec::new();
    let mut discarding = false;

    while running.load(Ordering::SeqCst) {
        let limit = (max_line_len + 1).saturating_sub(line.len()) as u64;
        match (&mut reader).take(limit).read_until(b'\n', &mut line) {
            Ok(0) => {
                if !discarding && !line.is_empty() {
                    forward(&line, samples);
                }
                break;
            }
            Ok(_) => {
                let complete = line.last() == Some(&b'\n');
                if discarding {
                    discarding = !complete;
                    line.clear();
                } else if complete {
                    if !forward(&line, samples) {
                        // Receiver gone: nobody left to apply samples.
                        return Ok(());
                    }
                    line.clear();
                } else if line.len() > max_line_len {
                    warn!(max_line_len, "Dropping overlong ingest line");
                    discarding = true;
                    line.clear();
                } else {
                    // Unterminated last line before EOF.
                    forward(&line, samples);
                    break;
                }
            }
            // A partial line stays buffered across timeouts.
            Err(ref e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Parse one line and send its samples. `false` once the receiver is gone.
fn forward(line: &[u8], samples: &Sender<StreamSample>) -> bool {
    let Ok(text) = std::str::from_utf8(line) else {
        debug!(len = line.len(), "Dropping ingest line that is not UTF-8");
        return true;
    };
    parse_line(text)
        .into_iter()
        .all(|sample| samples.send(sample).is_ok())
}
