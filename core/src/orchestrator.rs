//! # Scan Orchestrator
//!
//! Runs the two-phase pipeline: sweep the configured range for live hosts,
//! then check the configured ports of each host.
//!
//! Hosts are port-scanned one after another in ascending address order, while
//! the ports of a single host are checked concurrently. Output order is
//! therefore deterministic: addresses ascending, ports in list order.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use netsweep_common::config::ScanConfig;
use netsweep_common::error::Result;
use netsweep_common::network::host::HostReport;
use netsweep_common::network::range::Ipv4Range;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};

use crate::port_check::{PortChecker, TcpPortChecker};
use crate::port_scan::PortScanner;
use crate::probe::{Prober, TcpProber};
use crate::sweep::{HostFoundCallback, HostSweeper};

/// Receives scan progress as it happens, in presentation order.
pub trait ScanListener: Send {
    fn sweep_started(&mut self, _range: &Ipv4Range) {}
    fn sweep_finished(&mut self, _hosts: &[Ipv4Addr]) {}
    fn host_scanned(&mut self, _report: &HostReport) {}
}

/// Listener that ignores every event.
pub struct Silent;

impl ScanListener for Silent {}

/// Result of a complete scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub range: Ipv4Range,
    /// Reachable hosts, ascending.
    pub hosts: Vec<HostReport>,
    /// Number of addresses probed during the sweep.
    pub probed: usize,
    pub elapsed: Duration,
}

pub struct ScanOrchestrator<P: Prober + ?Sized + 'static, C: PortChecker + ?Sized + 'static> {
    config: ScanConfig,
    sweeper: HostSweeper<P>,
    scanner: PortScanner<C>,
}

impl ScanOrchestrator<TcpProber, TcpPortChecker> {
    /// Orchestrator wired to real TCP probes.
    pub fn tcp(config: ScanConfig) -> Self {
        let prober = Arc::new(TcpProber::new(config.probe_ports.clone()));
        Self::new(config, prober, Arc::new(TcpPortChecker))
    }
}

impl<P: Prober + ?Sized + 'static, C: PortChecker + ?Sized + 'static> ScanOrchestrator<P, C> {
    pub fn new(config: ScanConfig, prober: Arc<P>, checker: Arc<C>) -> Self {
        let sweeper = HostSweeper::new(prober).with_max_concurrency(config.max_concurrency);
        let scanner = PortScanner::new(checker).with_max_concurrency(config.max_concurrency);
        Self {
            config,
            sweeper,
            scanner,
        }
    }

    pub fn with_host_found_callback(mut self, callback: HostFoundCallback) -> Self {
        self.sweeper = self.sweeper.with_host_found_callback(callback);
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Runs the scan until it completes or `cancel` fires.
    ///
    /// The configuration is validated before anything is sent, so a bad
    /// setting is reported once instead of by every worker.
    pub async fn run(&self, cancel: &CancellationToken, listener: &mut dyn ScanListener) -> Result<ScanReport> {
        self.config.validate()?;

        let started = Instant::now();
        let range = self.config.range;

        listener.sweep_started(&range);
        let hosts = self
            .sweeper
            .sweep(range, self.config.probe_timeout, cancel)
            .instrument(info_span!("sweep", %range))
            .await?;
        listener.sweep_finished(&hosts);

        let mut reports: Vec<HostReport> = Vec::with_capacity(hosts.len());
        for address in hosts {
            let ports = self
                .scanner
                .scan_ports(address, &self.config.ports, self.config.port_timeout, cancel)
                .instrument(info_span!("ports", %address))
                .await?;

            let report = HostReport::new(address, ports);
            listener.host_scanned(&report);
            reports.push(report);
        }

        let elapsed = started.elapsed();
        debug!(hosts = reports.len(), ?elapsed, "scan complete");

        Ok(ScanReport {
            range,
            hosts: reports,
            probed: range.len(),
            elapsed,
        })
    }

    /// Runs without cancellation or listener.
    pub async fn run_to_completion(&self) -> Result<ScanReport> {
        self.run(&CancellationToken::new(), &mut Silent).await
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
