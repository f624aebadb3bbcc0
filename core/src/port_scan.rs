use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use netsweep_common::config::DEFAULT_MAX_CONCURRENCY;
use netsweep_common::error::{Result, ScanError};
use netsweep_common::network::host::PortResult;
use netsweep_common::ports::PortList;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::port_check::PortChecker;
use crate::sweep::barrier;

/// Checks a list of ports on one host, all at once.
pub struct PortScanner<C: PortChecker + ?Sized + 'static> {
    checker: Arc<C>,
    max_concurrency: usize,
}

impl<C: PortChecker + ?Sized + 'static> PortScanner<C> {
    pub fn new(checker: Arc<C>) -> Self {
        Self {
            checker,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Returns one result per requested port, in the order of `ports`.
    ///
    /// Checks finish in any order; results are only read once every check
    /// has returned. Closed ports are reported, never omitted.
    pub async fn scan_ports(
        &self,
        addr: Ipv4Addr,
        ports: &PortList,
        port_timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<PortResult>> {
        if ports.is_empty() {
            return Ok(Vec::new());
        }

        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let phase = cancel.child_token();

        let handles: Vec<JoinHandle<Result<PortResult>>> = ports
            .iter()
            .map(|port| {
                let checker = Arc::clone(&self.checker);
                let permits = Arc::clone(&permits);
                let phase = phase.clone();

                tokio::spawn(async move {
                    let _permit = tokio::select! {
                        biased;
                        _ = phase.cancelled() => return Err(ScanError::Cancelled),
                        permit = permits.acquire() => permit.map_err(|e| ScanError::Worker(e.to_string()))?,
                    };

                    let open = tokio::select! {
                        biased;
                        _ = phase.cancelled() => return Err(ScanError::Cancelled),
                        open = checker.check_port(addr, port, port_timeout) => open,
                    };

                    match open {
                        Ok(open) => Ok(PortResult::new(addr, port, open)),
                        Err(err) => {
                            phase.cancel();
                            Err(err)
                        }
                    }
                })
            })
            .collect();

        let results = barrier(handles).await?;

        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        debug!(%addr, open = results.iter().filter(|r| r.open()).count(), "port scan finished");
        Ok(results)
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
