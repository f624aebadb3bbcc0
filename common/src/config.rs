use std::net::Ipv4Addr;
use std::time::Duration;

use crate::error::{Result, ScanError};
use crate::network::range::Ipv4Range;
use crate::ports::PortList;

/// Target used when none is given: the first 254 hosts of `192.168.1.0/24`.
pub const DEFAULT_TARGET: &str = "192.168.1.0/24";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(100);
pub const DEFAULT_PORT_TIMEOUT: Duration = Duration::from_millis(1_000);
/// Enough permits for a whole /24 to be probed at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 256;
/// Largest sweep accepted, a /16.
pub const MAX_RANGE_LEN: usize = 1 << 16;

/// Presentation switches for the terminal front end.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Hides the banner.
    pub no_banner: bool,
    /// `0` prints everything, `1` hides headers, `2` prints only the summary.
    pub quiet: u8,
}

/// Everything a scan needs, passed explicitly into the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Addresses swept for live hosts.
    pub range: Ipv4Range,
    /// Ports checked on every live host, in display order.
    pub ports: PortList,
    /// Ports used by the TCP prober to decide whether a host is up.
    pub probe_ports: PortList,
    pub probe_timeout: Duration,
    pub port_timeout: Duration,
    /// Upper bound on sockets in flight at once.
    pub max_concurrency: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            range: Ipv4Range::new(Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 254)),
            ports: PortList::default(),
            probe_ports: PortList::probe_defaults(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            port_timeout: DEFAULT_PORT_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl ScanConfig {
    pub fn with_range(mut self, range: Ipv4Range) -> Self {
        self.range = range;
        self
    }

    pub fn with_ports(mut self, ports: PortList) -> Self {
        self.ports = ports;
        self
    }

    /// Checks the configuration once, before any worker is launched.
    pub fn validate(&self) -> Result<()> {
        if self.range.len() > MAX_RANGE_LEN {
            return Err(ScanError::InvalidConfig(format!(
                "range {} holds {} addresses, at most {MAX_RANGE_LEN} are allowed",
                self.range,
                self.range.len()
            )));
        }
        if self.probe_timeout.is_zero() {
            return Err(ScanError::InvalidConfig("probe timeout must be positive".into()));
        }
        if self.port_timeout.is_zero() {
            return Err(ScanError::InvalidConfig("port timeout must be positive".into()));
        }
        if self.max_concurrency == 0 {
            return Err(ScanError::InvalidConfig("concurrency must be at least 1".into()));
        }
        if self.probe_ports.is_empty() {
            return Err(ScanError::InvalidConfig("at least one probe port is required".into()));
        }
        if self.ports.iter().chain(self.probe_ports.iter()).any(|p| p == 0) {
            return Err(ScanError::InvalidConfig("port 0 cannot be scanned".into()));
        }
        Ok(())
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
