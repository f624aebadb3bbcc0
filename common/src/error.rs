use std::io;
use std::net::SocketAddr;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Every failure a scan can report to its caller.
///
/// Ordinary transport failures (timeouts, refusals, unreachable hosts) are
/// never represented here: probes downgrade them to a negative result.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid target '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("invalid port list '{input}': {reason}")]
    InvalidPorts { input: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no interface available for LAN discovery: {0}")]
    NoLanInterface(String),

    /// The host ran out of sockets or buffers. This means the concurrency
    /// bound is too high for this machine, not that `addr` is down.
    #[error("socket resources exhausted while connecting to {addr}: {source}")]
    ResourceExhausted {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("scan cancelled")]
    Cancelled,

    #[error("worker task failed: {0}")]
    Worker(String),
}

impl ScanError {
    pub fn invalid_target(input: &str, reason: impl Into<String>) -> Self {
        ScanError::InvalidTarget {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_ports(input: &str, reason: impl Into<String>) -> Self {
        ScanError::InvalidPorts {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(target_os = "linux")]
const EXHAUSTION_CODES: &[i32] = &[23, 24, 105]; // ENFILE, EMFILE, ENOBUFS
#[cfg(target_os = "macos")]
const EXHAUSTION_CODES: &[i32] = &[23, 24, 55];
#[cfg(windows)]
const EXHAUSTION_CODES: &[i32] = &[10024, 10055]; // WSAEMFILE, WSAENOBUFS
#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
const EXHAUSTION_CODES: &[i32] = &[];

/// Whether a connect error means the local machine is out of socket resources.
pub fn is_resource_exhaustion(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::OutOfMemory {
        return true;
    }
    err.raw_os_error()
        .is_some_and(|code| EXHAUSTION_CODES.contains(&code))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
