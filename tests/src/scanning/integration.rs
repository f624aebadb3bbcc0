use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use netsweep_common::config::ScanConfig;
use netsweep_common::error::ScanError;
use netsweep_common::network::host::PortState;
use netsweep_common::network::range::Ipv4Range;
use netsweep_common::ports::PortList;
use netsweep_core::orchestrator::ScanOrchestrator;
use netsweep_core::port_check::TcpPortChecker;
use netsweep_core::port_scan::PortScanner;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::utils::{SimulatedNetwork, lab};

fn lab_config() -> ScanConfig {
    ScanConfig::default().with_range(Ipv4Range::new(lab(1), lab(254)))
}

#[tokio::test]
async fn end_to_end_over_simulated_network() {
    let net = Arc::new(SimulatedNetwork::new([lab(5), lab(9)]).with_open_port(lab(9), 80));
    let orchestrator = ScanOrchestrator::new(lab_config(), Arc::clone(&net), Arc::clone(&net));

    let report = orchestrator.run_to_completion().await.unwrap();

    let hosts: Vec<String> = report.hosts.iter().map(|h| h.address.to_string()).collect();
    assert_eq!(hosts, ["10.0.0.5", "10.0.0.9"]);
    assert_eq!(report.probed, 254);

    let nine = &report.hosts[1];
    assert_eq!(nine.ports.len(), 6);
    assert_eq!(nine.open_ports().collect::<Vec<_>>(), vec![80]);
    assert!(report.hosts[0].ports.iter().all(|p| p.state == PortState::Closed));
    assert_eq!(net.checks(), 12);
}

#[tokio::test]
async fn scan_reports_every_port_once() {
    let net = Arc::new(
        SimulatedNetwork::default()
            .with_open_port(lab(7), 8080)
            .with_open_port(lab(7), 22)
            .with_latency(Duration::from_millis(3)),
    );
    let scanner = PortScanner::new(Arc::clone(&net));
    let ports = PortList::default();

    let results = scanner
        .scan_ports(lab(7), &ports, Duration::from_millis(100), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(results.len(), ports.len());
    let order: Vec<u16> = results.iter().map(|r| r.port).collect();
    assert_eq!(order, ports.as_slice());
    let open: Vec<u16> = results.iter().filter(|r| r.open()).map(|r| r.port).collect();
    assert_eq!(open, vec![22, 8080]);
}

#[tokio::test]
async fn empty_port_list_still_lists_hosts() {
    let net = Arc::new(SimulatedNetwork::new([lab(5)]));
    let config = lab_config().with_ports(PortList::empty());
    let orchestrator = ScanOrchestrator::new(config, Arc::clone(&net), Arc::clone(&net));

    let report = orchestrator.run_to_completion().await.unwrap();

    assert_eq!(report.hosts.len(), 1);
    assert!(report.hosts[0].ports.is_empty());
    assert_eq!(net.checks(), 0);
}

#[tokio::test]
async fn invalid_config_fails_before_probing() {
    let net = Arc::new(SimulatedNetwork::new([lab(5)]));
    let config = ScanConfig {
        port_timeout: Duration::ZERO,
        ..lab_config()
    };
    let orchestrator = ScanOrchestrator::new(config, Arc::clone(&net), Arc::clone(&net));

    let result = orchestrator.run_to_completion().await;

    assert!(matches!(result, Err(ScanError::InvalidConfig(_))));
    assert_eq!(net.probes(), 0);
}

#[tokio::test]
async fn loopback_ports_are_classified() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open = listener.local_addr().unwrap().port();

    // Bind then drop to get a port that is almost certainly closed.
    let closed = {
        let tmp = TcpListener::bind("127.0.0.1:0").await.unwrap();
        tmp.local_addr().unwrap().port()
    };

    let scanner = PortScanner::new(Arc::new(TcpPortChecker));
    let results = scanner
        .scan_ports(
            Ipv4Addr::LOCALHOST,
            &PortList::new([closed, open]),
            Duration::from_millis(500),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].port, closed);
    assert_eq!(results[0].state, PortState::Closed);
    assert_eq!(results[1].port, open);
    assert_eq!(results[1].state, PortState::Open);
}
