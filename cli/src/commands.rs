pub mod menu;
pub mod scan;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use netsweep_common::config::{
    DEFAULT_MAX_CONCURRENCY, DEFAULT_PORT_TIMEOUT, DEFAULT_PROBE_TIMEOUT, DEFAULT_TARGET,
    ScanConfig,
};
use netsweep_common::network::range::Ipv4Range;
use netsweep_common::network::target::Target;
use netsweep_common::ports::PortList;

#[derive(Parser)]
#[command(name = "netsweep")]
#[command(version)]
#[command(about = "Sweeps an IPv4 range for live hosts and checks their TCP ports.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Reduce output, repeat for less
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long, global = true)]
    pub no_banner: bool,

    /// Increase log verbosity, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive menu
    #[command(alias = "m")]
    Menu,
    /// Sweep a range and scan the ports of every live host
    #[command(alias = "s")]
    Scan {
        /// Host, range (a.b.c.1-254), CIDR, base+count or `lan`
        #[arg(default_value = DEFAULT_TARGET)]
        target: Target,
        #[command(flatten)]
        args: ScanArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Ports checked on every live host, e.g. 22,80,8000-8010
    #[arg(short, long, default_value_t = PortList::default())]
    pub ports: PortList,

    /// Host probe timeout in milliseconds
    #[arg(long = "timeout", value_name = "MS", default_value_t = DEFAULT_PROBE_TIMEOUT.as_millis() as u64)]
    pub probe_timeout_ms: u64,

    /// Port connect timeout in milliseconds
    #[arg(long = "port-timeout", value_name = "MS", default_value_t = DEFAULT_PORT_TIMEOUT.as_millis() as u64)]
    pub port_timeout_ms: u64,

    /// Ports used to decide whether a host is up
    #[arg(long, default_value_t = PortList::probe_defaults())]
    pub probe_ports: PortList,

    /// Maximum sockets in flight at once
    #[arg(short, long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub concurrency: usize,
}

impl Default for ScanArgs {
    fn default() -> Self {
        Self {
            ports: PortList::default(),
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT.as_millis() as u64,
            port_timeout_ms: DEFAULT_PORT_TIMEOUT.as_millis() as u64,
            probe_ports: PortList::probe_defaults(),
            concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl ScanArgs {
    pub fn into_config(self, range: Ipv4Range) -> ScanConfig {
        ScanConfig {
            range,
            ports: self.ports,
            probe_ports: self.probe_ports,
            probe_timeout: Duration::from_millis(self.probe_timeout_ms),
            port_timeout: Duration::from_millis(self.port_timeout_ms),
            max_concurrency: self.concurrency,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_well_formed() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = CommandLine::try_parse_from(["netsweep"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn scan_defaults_match_scan_config() {
        let cli = CommandLine::try_parse_from(["netsweep", "scan"]).unwrap();
        let Some(Commands::Scan { target, args }) = cli.command else {
            panic!("expected scan");
        };
        let cfg = args.into_config(target.resolve().unwrap());
        assert_eq!(cfg, ScanConfig::default());
    }

    #[test]
    fn scan_flags_are_applied() {
        let cli = CommandLine::try_parse_from([
            "netsweep", "s", "10.0.0.0/30", "--ports", "22,80", "--timeout", "50",
            "--port-timeout", "200", "-c", "8", "-q", "--no-banner",
        ])
        .unwrap();
        assert_eq!(cli.quiet, 1);
        assert!(cli.no_banner);

        let Some(Commands::Scan { target, args }) = cli.command else {
            panic!("expected scan");
        };
        let cfg = args.into_config(target.resolve().unwrap());
        assert_eq!(cfg.range.len(), 2);
        assert_eq!(cfg.ports.as_slice(), &[22, 80]);
        assert_eq!(cfg.probe_timeout, Duration::from_millis(50));
        assert_eq!(cfg.port_timeout, Duration::from_millis(200));
        assert_eq!(cfg.max_concurrency, 8);
    }

    #[test]
    fn bad_ports_are_rejected_by_the_parser() {
        assert!(CommandLine::try_parse_from(["netsweep", "scan", "--ports", "0"]).is_err());
        assert!(CommandLine::try_parse_from(["netsweep", "scan", "10.0.0.300"]).is_err());
    }
}
