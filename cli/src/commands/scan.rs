use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Context;
use colored::*;
use netsweep_common::config::Config;
use netsweep_common::network::host::{HostReport, PortState};
use netsweep_common::network::range::Ipv4Range;
use netsweep_common::network::target::Target;
use netsweep_common::success;
use netsweep_core::orchestrator::{ScanListener, ScanOrchestrator, ScanReport};
use tokio_util::sync::CancellationToken;

use crate::commands::ScanArgs;
use crate::terminal::{colors, print, spinner};

pub async fn scan(target: Target, args: ScanArgs, cfg: &Config) -> anyhow::Result<()> {
    let range = target.resolve().context("could not resolve scan target")?;
    let scan_cfg = args.into_config(range);

    let orchestrator = ScanOrchestrator::tcp(scan_cfg)
        .with_host_found_callback(Arc::new(spinner::report_discovery_progress));

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    let mut listener = TerminalListener::new(cfg.quiet);
    let result = orchestrator.run(&cancel, &mut listener).await;

    ctrl_c.abort();
    spinner::stop();

    let report = result.context("scan aborted")?;
    print_summary(&report, cfg.quiet);
    Ok(())
}

/// Renders each phase as soon as the orchestrator reports it.
struct TerminalListener {
    q_level: u8,
    idx: usize,
}

impl TerminalListener {
    fn new(q_level: u8) -> Self {
        Self { q_level, idx: 0 }
    }
}

impl ScanListener for TerminalListener {
    fn sweep_started(&mut self, range: &Ipv4Range) {
        print::header("sweeping for hosts", self.q_level);
        if self.q_level < 2 {
            print::print_status(format!("Probing {} addresses ({})", range.len(), range));
            spinner::start(format!("Probing {} addresses...", range.len()));
        }
    }

    fn sweep_finished(&mut self, hosts: &[Ipv4Addr]) {
        spinner::stop();
        if hosts.is_empty() {
            if self.q_level == 0 {
                print::no_results();
            }
            return;
        }
        print::header("port scan", self.q_level);
    }

    fn host_scanned(&mut self, report: &HostReport) {
        if self.q_level > 1 {
            return;
        }
        if self.idx > 0 {
            print::print("");
        }
        print::tree_head(self.idx, &report.address.to_string());
        print::as_tree_one_level(&port_lines(report));
        self.idx += 1;
    }
}

fn port_lines(report: &HostReport) -> Vec<(String, ColoredString)> {
    report
        .ports
        .iter()
        .map(|port| {
            let state = match port.state {
                PortState::Open => port.state.to_string().color(colors::PORT_OPEN).bold(),
                PortState::Closed => port.state.to_string().color(colors::PORT_CLOSED),
            };
            (format!("{}/tcp", port.port), state)
        })
        .collect()
}

fn print_summary(report: &ScanReport, q_level: u8) {
    let hosts = report.hosts.len();
    let elapsed = format!("{:.2}s", report.elapsed.as_secs_f64());

    if q_level > 0 {
        success!("{hosts} active hosts identified in {elapsed}");
        return;
    }

    let open: usize = report.hosts.iter().map(|h| h.open_ports().count()).sum();
    print::fat_separator();
    print::centerln(&format!(
        "{} active hosts identified in {}, {} open ports",
        hosts.to_string().green().bold(),
        elapsed.color(colors::ACCENT),
        open.to_string().green().bold()
    ));
    print::end_of_program();
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use netsweep_common::network::host::PortResult;

    #[test]
    fn port_lines_follow_list_order() {
        let addr = Ipv4Addr::new(10, 0, 0, 9);
        let report = HostReport::new(
            addr,
            vec![
                PortResult::new(addr, 21, false),
                PortResult::new(addr, 80, true),
                PortResult::new(addr, 3389, false),
            ],
        );

        let lines = port_lines(&report);
        let keys: Vec<&str> = lines.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["21/tcp", "80/tcp", "3389/tcp"]);
        assert_eq!(&*lines[1].1, "open");
        assert_eq!(&*lines[0].1, "closed");
    }
}
