use std::fmt;
use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::{Result, ScanError};

/// An inclusive run of IPv4 addresses.
///
/// A range whose end lies before its start is empty; iterating it yields
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn single(addr: Ipv4Addr) -> Self {
        Self::new(addr, addr)
    }

    /// The `count` host addresses following `base`, e.g. `192.168.1.0` and
    /// `254` give `192.168.1.1 - 192.168.1.254`.
    pub fn from_base(base: Ipv4Addr, count: u32) -> Result<Self> {
        let base_u32: u32 = base.into();
        let start = base_u32
            .checked_add(1)
            .ok_or_else(|| ScanError::invalid_target(&base.to_string(), "no addresses after base"))?;
        let end = base_u32.checked_add(count).ok_or_else(|| {
            ScanError::invalid_target(&format!("{base}+{count}"), "range runs past 255.255.255.255")
        })?;
        Ok(Self::new(Ipv4Addr::from(start), Ipv4Addr::from(end)))
    }

    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if end < start {
            0
        } else {
            (end - start) as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.start_addr <= addr && addr <= self.end_addr
    }

    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(Ipv4Addr::from)
    }
}

impl fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        write!(f, "{} - {}", self.start_addr, self.end_addr)
    }
}

/// Usable host addresses of a CIDR block.
///
/// Network and broadcast addresses are stripped, except for `/31` and `/32`
/// where every address is a host.
pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> Result<Ipv4Range> {
    let network = Ipv4Network::new(ip, prefix)
        .map_err(|e| ScanError::invalid_target(&format!("{ip}/{prefix}"), e.to_string()))?;
    let start: u32 = network.network().into();
    let end: u32 = network.broadcast().into();

    if prefix >= 31 {
        return Ok(Ipv4Range::new(start.into(), end.into()));
    }

    Ok(Ipv4Range::new((start + 1).into(), (end - 1).into()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
