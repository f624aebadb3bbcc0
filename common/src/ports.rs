//! Ordered, duplicate-free port lists.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScanError};

/// Well-known ports checked on every reachable host: FTP, SSH, HTTP, HTTPS,
/// RDP and HTTP-alt.
pub const DEFAULT_PORTS: [u16; 6] = [21, 22, 80, 443, 3389, 8080];

/// Ports a host is knocked on to decide whether it is up.
pub const DEFAULT_PROBE_PORTS: [u16; 4] = [443, 80, 22, 445];

/// An ordered list of ports. The first occurrence of a port fixes its
/// position, later duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortList(Vec<u16>);

impl PortList {
    pub fn new(ports: impl IntoIterator<Item = u16>) -> Self {
        let mut list: Vec<u16> = Vec::new();
        for port in ports {
            if !list.contains(&port) {
                list.push(port);
            }
        }
        Self(list)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn probe_defaults() -> Self {
        Self::new(DEFAULT_PROBE_PORTS)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }

    /// Position of `port` in the list.
    pub fn position(&self, port: u16) -> Option<usize> {
        self.0.iter().position(|&p| p == port)
    }
}

impl Default for PortList {
    fn default() -> Self {
        Self::new(DEFAULT_PORTS)
    }
}

impl fmt::Display for PortList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(u16::to_string).collect();
        write!(f, "{}", joined.join(","))
    }
}

impl FromStr for PortList {
    type Err = ScanError;

    /// Parses "21,22,80" and inclusive spans such as "8000-8010".
    fn from_str(s: &str) -> Result<Self> {
        let mut ports: Vec<u16> = Vec::new();

        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo = parse_port(lo.trim(), s)?;
                    let hi = parse_port(hi.trim(), s)?;
                    if hi < lo {
                        return Err(ScanError::invalid_ports(s, format!("span {part} is reversed")));
                    }
                    ports.extend(lo..=hi);
                }
                None => ports.push(parse_port(part, s)?),
            }
        }

        Ok(Self::new(ports))
    }
}

fn parse_port(part: &str, original: &str) -> Result<u16> {
    let port = part
        .parse::<u16>()
        .map_err(|e| ScanError::invalid_ports(original, format!("'{part}': {e}")))?;
    if port == 0 {
        return Err(ScanError::invalid_ports(original, "port 0 cannot be scanned"));
    }
    Ok(port)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
