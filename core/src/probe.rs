//! Single-address reachability checks.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use netsweep_common::error::{Result, ScanError};
use netsweep_common::ports::PortList;
use tokio::time::timeout;

use crate::network::tcp;

/// Decides whether one address is up.
///
/// Implementations must not fail on transport errors: timeouts, refusals and
/// unreachable destinations all resolve to `Ok(false)`. `Err` is reserved for
/// faults of the local machine, such as running out of sockets.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: Ipv4Addr, limit: Duration) -> Result<bool>;
}

/// Reachability through TCP handshakes.
///
/// Every probe port is knocked on at once, and the host counts as up as soon
/// as one of them completes a handshake or actively refuses it. `limit`
/// bounds the whole probe, not each knock.
#[derive(Debug, Clone)]
pub struct TcpProber {
    probe_ports: PortList,
}

impl TcpProber {
    pub fn new(probe_ports: PortList) -> Self {
        Self { probe_ports }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(PortList::probe_defaults())
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: Ipv4Addr, limit: Duration) -> Result<bool> {
        let mut knocks: FuturesUnordered<_> = self
            .probe_ports
            .iter()
            .map(|port| tcp::handshake(SocketAddr::new(IpAddr::V4(addr), port), limit))
            .collect();

        let verdict = async {
            while let Some(outcome) = knocks.next().await {
                if outcome?.host_answered() {
                    return Ok(true);
                }
            }
            Ok::<bool, ScanError>(false)
        };

        match timeout(limit, verdict).await {
            Ok(result) => result,
            Err(_elapsed) => Ok(false),
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
