use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use netsweep_common::error::ScanError;
use netsweep_common::network::range::Ipv4Range;
use netsweep_core::probe::TcpProber;
use netsweep_core::sweep::HostSweeper;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::utils::{SimulatedNetwork, lab};

const TIMEOUT: Duration = Duration::from_millis(100);

fn lab_range() -> Ipv4Range {
    Ipv4Range::new(lab(1), lab(254))
}

#[tokio::test]
async fn sweep_finds_exactly_the_live_hosts() {
    let net = Arc::new(SimulatedNetwork::new([lab(9), lab(5)]));
    let sweeper = HostSweeper::new(Arc::clone(&net));

    let hosts = sweeper
        .sweep(lab_range(), TIMEOUT, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(hosts, vec![lab(5), lab(9)]);
    assert_eq!(net.probes(), 254);
}

#[tokio::test]
async fn repeated_sweeps_agree() {
    let net = Arc::new(SimulatedNetwork::new([lab(200), lab(3), lab(42)]).with_latency(Duration::from_millis(2)));
    let sweeper = HostSweeper::new(net);
    let cancel = CancellationToken::new();

    let first = sweeper.sweep(lab_range(), TIMEOUT, &cancel).await.unwrap();
    let second = sweeper.sweep(lab_range(), TIMEOUT, &cancel).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first, vec![lab(3), lab(42), lab(200)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_responder_in_a_full_subnet_is_counted() {
    let net = Arc::new(SimulatedNetwork::new(lab_range().to_iter()).with_latency(Duration::from_millis(5)));
    let sweeper = HostSweeper::new(Arc::clone(&net));

    let hosts = sweeper
        .sweep(lab_range(), TIMEOUT, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(hosts.len(), 254);
    assert!(hosts.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(hosts.first(), Some(&lab(1)));
    assert_eq!(hosts.last(), Some(&lab(254)));
}

#[tokio::test]
async fn one_probe_per_address() {
    let range = Ipv4Range::new(Ipv4Addr::new(172, 16, 0, 250), Ipv4Addr::new(172, 16, 1, 9));
    let net = Arc::new(SimulatedNetwork::default());
    let sweeper = HostSweeper::new(Arc::clone(&net)).with_max_concurrency(7);

    let hosts = sweeper.sweep(range, TIMEOUT, &CancellationToken::new()).await.unwrap();

    assert!(hosts.is_empty());
    assert_eq!(net.probes(), range.len());
    assert_eq!(net.probes(), 16);
}

#[tokio::test]
async fn empty_range_probes_nothing() {
    let net = Arc::new(SimulatedNetwork::new([lab(1)]));
    let sweeper = HostSweeper::new(Arc::clone(&net));
    let empty = Ipv4Range::new(lab(10), lab(9));

    let hosts = sweeper.sweep(empty, TIMEOUT, &CancellationToken::new()).await.unwrap();

    assert!(hosts.is_empty());
    assert_eq!(net.probes(), 0);
}

#[tokio::test]
async fn cancelling_mid_sweep_discards_results() {
    let net = Arc::new(SimulatedNetwork::new([lab(1)]).with_latency(Duration::from_secs(5)));
    let sweeper = HostSweeper::new(net);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = sweeper.sweep(lab_range(), TIMEOUT, &cancel).await;

    assert!(matches!(result, Err(ScanError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn loopback_host_is_discovered_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let prober = Arc::new(TcpProber::new(netsweep_common::ports::PortList::new([port])));
    let sweeper = HostSweeper::new(prober);

    let hosts = sweeper
        .sweep(
            Ipv4Range::single(Ipv4Addr::LOCALHOST),
            Duration::from_millis(500),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(hosts, vec![Ipv4Addr::LOCALHOST]);
}
