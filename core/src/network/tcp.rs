use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use netsweep_common::error::{self, Result, ScanError};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// How a single TCP handshake attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handshake {
    /// The three-way handshake completed.
    Established,
    /// The peer answered with a reset.
    Refused,
    /// No usable answer: timeout, unreachable, reset mid-way, ...
    Failed,
}

impl Handshake {
    /// A refusal still proves that something answered at that address.
    pub fn host_answered(self) -> bool {
        matches!(self, Handshake::Established | Handshake::Refused)
    }
}

/// Attempts one TCP handshake against `target`, bounded by `limit`.
///
/// No data is exchanged: the stream is dropped as soon as the outcome is
/// known, and a timed-out attempt drops its half-open socket with the future.
/// Only socket exhaustion on the local machine is returned as an error.
pub async fn handshake(target: SocketAddr, limit: Duration) -> Result<Handshake> {
    match timeout(limit, TcpStream::connect(target)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Ok(Handshake::Established)
        }
        Ok(Err(err)) => classify(target, err),
        Err(_elapsed) => {
            trace!(%target, "handshake timed out");
            Ok(Handshake::Failed)
        }
    }
}

fn classify(target: SocketAddr, err: io::Error) -> Result<Handshake> {
    if err.kind() == io::ErrorKind::ConnectionRefused {
        return Ok(Handshake::Refused);
    }
    if error::is_resource_exhaustion(&err) {
        return Err(ScanError::ResourceExhausted {
            addr: target,
            source: err,
        });
    }
    trace!(%target, error = %err, "handshake failed");
    Ok(Handshake::Failed)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
