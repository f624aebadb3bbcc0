//! # Scan Target Model
//!
//! Defines the possible inputs for a host sweep.
//!
//! A target is one of:
//! * A single IPv4 address (host).
//! * An IPv4 range (e.g. `192.168.1.1-100`).
//! * A CIDR block (e.g. `192.168.1.0/24`).
//! * A base address plus a host count (e.g. `192.168.1.0+254`).
//! * The local LAN (detected from the primary interface).

use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::error::{Result, ScanError};
use crate::network::interface;
use crate::network::range::{self, Ipv4Range};
use crate::{info, warn};

/// Represents the address range handed to the sweeper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// The private IPv4 subnet of the primary LAN interface.
    Lan,
    /// A single specific host.
    Host { target_addr: Ipv4Addr },
    /// A range of IPv4 addresses.
    Range { ipv4_range: Ipv4Range },
}

impl FromStr for Target {
    type Err = ScanError;

    /// Parses a string into a `Target`.
    ///
    /// Supported formats:
    /// * **Keyword**: "lan" (case-insensitive).
    /// * **Host**: single IPv4 address (e.g. "192.168.1.5").
    /// * **Range**: "Start-End" (e.g. "192.168.1.1-50", "192.168.1.1-192.168.1.50").
    /// * **CIDR**: "Network/Prefix" (e.g. "192.168.1.0/24").
    /// * **Count**: "Base+Count" (e.g. "192.168.1.0+254").
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.eq_ignore_ascii_case("lan") {
            return Ok(Target::Lan);
        }

        if let Some(target) = parse_host(s)? {
            return Ok(target);
        }

        if let Some(target) = parse_ip_range(s)? {
            return Ok(target);
        }

        if let Some(target) = parse_cidr_range(s)? {
            return Ok(target);
        }

        if let Some(target) = parse_base_count(s)? {
            return Ok(target);
        }

        Err(ScanError::invalid_target(s, "expected an IPv4 address, range, CIDR block or 'lan'"))
    }
}

impl Target {
    /// Converts the target into the concrete range to sweep.
    pub fn resolve(self) -> Result<Ipv4Range> {
        match self {
            Target::Lan => lan_range(),
            Target::Host { target_addr } => Ok(Ipv4Range::single(target_addr)),
            Target::Range { ipv4_range } => Ok(ipv4_range),
        }
    }
}

fn lan_range() -> Result<Ipv4Range> {
    let net = interface::get_lan_network()?
        .ok_or_else(|| ScanError::NoLanInterface("no private IPv4 network found".into()))?;

    let range = range::cidr_range(net.ip(), net.prefix())?;
    if range.len() == 1 {
        warn!("Network too small to strip broadcast, scanning full range.");
    }
    info!("Searching for hosts from {} to {}", range.start_addr, range.end_addr);
    Ok(range)
}

/// Parses a single IP address. IPv6 input is recognised only to reject it.
fn parse_host(s: &str) -> Result<Option<Target>> {
    match s.parse::<IpAddr>() {
        Ok(IpAddr::V4(target_addr)) => Ok(Some(Target::Host { target_addr })),
        Ok(IpAddr::V6(_)) => Err(ScanError::invalid_target(s, "IPv6 targets are not supported")),
        Err(_) => Ok(None),
    }
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
fn parse_ip_range(s: &str) -> Result<Option<Target>> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let start_addr = start_str
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|e| ScanError::invalid_target(s, format!("invalid start IP '{start_str}': {e}")))?;

    let end_addr = parse_range_end_addr(end_str.trim(), &start_addr, s)?;

    if end_addr < start_addr {
        return Err(ScanError::invalid_target(s, "range ends before it starts"));
    }

    let ipv4_range = Ipv4Range::new(start_addr, end_addr);
    Ok(Some(Target::Range { ipv4_range }))
}

/// Helper to parse the end address of a range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end_addr(end_str: &str, start_addr: &Ipv4Addr, original_s: &str) -> Result<Ipv4Addr> {
    if let Ok(full_addr) = end_str.parse::<Ipv4Addr>() {
        return Ok(full_addr);
    }

    if end_str.is_empty() {
        return Err(ScanError::invalid_target(original_s, "end of range cannot be empty"));
    }

    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet_str| octet_str.parse::<u8>())
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|e| ScanError::invalid_target(original_s, format!("invalid end range '{end_str}': {e}")))?;

    if partial_octets.len() > 4 {
        return Err(ScanError::invalid_target(original_s, "end range has too many octets"));
    }

    let mut end_octets = start_addr.octets();
    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(Ipv4Addr::from(end_octets))
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr_range(s: &str) -> Result<Option<Target>> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Ok(None);
    };

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| ScanError::invalid_target(s, format!("invalid IP '{ip_str}': {e}")))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| ScanError::invalid_target(s, format!("invalid prefix '{prefix_str}': {e}")))?;

    let ipv4_range = range::cidr_range(ipv4_addr, prefix)?;

    Ok(Some(Target::Range { ipv4_range }))
}

/// Parses "Base+Count" like "192.168.1.0+254".
fn parse_base_count(s: &str) -> Result<Option<Target>> {
    let Some((base_str, count_str)) = s.split_once('+') else {
        return Ok(None);
    };

    let base = base_str
        .trim()
        .parse::<Ipv4Addr>()
        .map_err(|e| ScanError::invalid_target(s, format!("invalid base '{base_str}': {e}")))?;

    let count = count_str
        .trim()
        .parse::<u32>()
        .map_err(|e| ScanError::invalid_target(s, format!("invalid count '{count_str}': {e}")))?;

    let ipv4_range = Ipv4Range::from_base(base, count)?;
    Ok(Some(Target::Range { ipv4_range }))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
