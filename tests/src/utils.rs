use std::collections::{BTreeSet, HashSet};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use netsweep_common::error::Result;
use netsweep_core::port_check::PortChecker;
use netsweep_core::probe::Prober;

/// In-memory network: a fixed set of live hosts and open sockets.
///
/// Every probe and port check is counted so tests can assert how many
/// workers a phase launched.
#[derive(Default)]
pub struct SimulatedNetwork {
    live: BTreeSet<Ipv4Addr>,
    open: HashSet<(Ipv4Addr, u16)>,
    latency: Duration,
    probes: AtomicUsize,
    checks: AtomicUsize,
}

impl SimulatedNetwork {
    pub fn new(live: impl IntoIterator<Item = Ipv4Addr>) -> Self {
        Self {
            live: live.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_open_port(mut self, addr: Ipv4Addr, port: u16) -> Self {
        self.open.insert((addr, port));
        self
    }

    /// Every answer is delayed by `latency`, so workers overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }

    async fn respond(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl Prober for SimulatedNetwork {
    async fn probe(&self, addr: Ipv4Addr, _limit: Duration) -> Result<bool> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.respond().await;
        Ok(self.live.contains(&addr))
    }
}

#[async_trait]
impl PortChecker for SimulatedNetwork {
    async fn check_port(&self, addr: Ipv4Addr, port: u16, _limit: Duration) -> Result<bool> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.respond().await;
        Ok(self.open.contains(&(addr, port)))
    }
}

/// Shorthand for an address in `10.0.0.0/24`.
pub fn lab(host: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 0, 0, host)
}
