//! # Host Sweep
//!
//! Finds the live hosts of an address range by probing every address at once.
//!
//! One task is spawned per candidate address. Probes run unsynchronized; a
//! host that answers is inserted into a shared, mutex-guarded ordered set, and
//! the lock covers that insert only. The sweep then waits on every join handle
//! before reading the set, so no result is returned until the whole range has
//! been probed.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use netsweep_common::config::DEFAULT_MAX_CONCURRENCY;
use netsweep_common::error::{Result, ScanError};
use netsweep_common::network::host::HostResult;
use netsweep_common::network::range::Ipv4Range;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::probe::Prober;

/// Invoked with the running total each time a new host is found.
pub type HostFoundCallback = Arc<dyn Fn(usize) + Send + Sync>;

type ReachableSet = Arc<Mutex<BTreeSet<Ipv4Addr>>>;

pub struct HostSweeper<P: Prober + ?Sized + 'static> {
    prober: Arc<P>,
    max_concurrency: usize,
    on_host_found: Option<HostFoundCallback>,
}

impl<P: Prober + ?Sized + 'static> HostSweeper<P> {
    pub fn new(prober: Arc<P>) -> Self {
        Self {
            prober,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            on_host_found: None,
        }
    }

    /// Caps the number of probes in flight.
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_host_found_callback(mut self, callback: HostFoundCallback) -> Self {
        self.on_host_found = Some(callback);
        self
    }

    /// Probes every address of `range` and returns the reachable ones in
    /// ascending order.
    ///
    /// A failed probe only means "unreachable" and never stops the sweep.
    /// The sweep fails as a whole when the local machine runs out of sockets,
    /// when a worker panics, or when `cancel` fires; partial results are
    /// discarded in every case.
    pub async fn sweep(
        &self,
        range: Ipv4Range,
        probe_timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<Vec<Ipv4Addr>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let reachable: ReachableSet = Arc::new(Mutex::new(BTreeSet::new()));
        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        // Aborts the remaining probes of this sweep on a fatal error without
        // touching the caller's token.
        let phase = cancel.child_token();

        let handles: Vec<JoinHandle<Result<HostResult>>> = range
            .to_iter()
            .map(|address| {
                let prober = Arc::clone(&self.prober);
                let reachable = Arc::clone(&reachable);
                let permits = Arc::clone(&permits);
                let phase = phase.clone();
                let on_found = self.on_host_found.clone();

                tokio::spawn(async move {
                    let outcome = probe_one(&*prober, address, probe_timeout, &permits, &phase).await;
                    if matches!(outcome, Err(ScanError::ResourceExhausted { .. })) {
                        phase.cancel();
                    }
                    let result = outcome?;

                    if result.reachable {
                        let found = {
                            let mut set = reachable.lock().unwrap_or_else(PoisonError::into_inner);
                            set.insert(address);
                            set.len()
                        };
                        debug!(%address, "host is up");
                        if let Some(callback) = on_found {
                            callback(found);
                        }
                    }
                    Ok(result)
                })
            })
            .collect();

        let launched = handles.len();
        barrier(handles).await?;

        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let set = reachable.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(launched, found = set.len(), "sweep finished");
        Ok(set.iter().copied().collect())
    }
}

async fn probe_one<P: Prober + ?Sized>(
    prober: &P,
    address: Ipv4Addr,
    probe_timeout: Duration,
    permits: &Semaphore,
    cancel: &CancellationToken,
) -> Result<HostResult> {
    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ScanError::Cancelled),
        permit = permits.acquire() => permit.map_err(|e| ScanError::Worker(e.to_string()))?,
    };

    let reachable = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ScanError::Cancelled),
        reachable = prober.probe(address, probe_timeout) => reachable?,
    };

    Ok(HostResult::new(address, reachable))
}

/// Barrier over a phase: waits for every handle, then reports the most
/// relevant failure. A fatal error outranks the cancellations it caused.
pub(crate) async fn barrier<T>(handles: Vec<JoinHandle<Result<T>>>) -> Result<Vec<T>> {
    let mut outputs: Vec<T> = Vec::with_capacity(handles.len());
    let mut fatal: Option<ScanError> = None;
    let mut cancelled = false;

    for handle in handles {
        match handle.await {
            Ok(Ok(output)) => outputs.push(output),
            Ok(Err(ScanError::Cancelled)) => cancelled = true,
            Ok(Err(err)) => {
                fatal.get_or_insert(err);
            }
            Err(join_err) => {
                fatal.get_or_insert(ScanError::Worker(join_err.to_string()));
            }
        }
    }

    match (fatal, cancelled) {
        (Some(err), _) => Err(err),
        (None, true) => Err(ScanError::Cancelled),
        (None, false) => Ok(outputs),
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
