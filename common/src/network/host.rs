use std::fmt;
use std::net::Ipv4Addr;

/// Outcome of probing a single address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostResult {
    pub address: Ipv4Addr,
    pub reachable: bool,
}

impl HostResult {
    pub fn new(address: Ipv4Addr, reachable: bool) -> Self {
        Self { address, reachable }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortState {
    Open,
    Closed,
}

impl From<bool> for PortState {
    fn from(open: bool) -> Self {
        if open { PortState::Open } else { PortState::Closed }
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortState::Open => write!(f, "open"),
            PortState::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of one connection attempt against `address:port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortResult {
    pub address: Ipv4Addr,
    pub port: u16,
    pub state: PortState,
}

impl PortResult {
    pub fn new(address: Ipv4Addr, port: u16, open: bool) -> Self {
        Self {
            address,
            port,
            state: open.into(),
        }
    }

    pub fn open(&self) -> bool {
        self.state == PortState::Open
    }
}

/// A reachable host together with the state of every port checked on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    pub address: Ipv4Addr,
    pub ports: Vec<PortResult>,
}

impl HostReport {
    pub fn new(address: Ipv4Addr, ports: Vec<PortResult>) -> Self {
        Self { address, ports }
    }

    pub fn open_ports(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().filter(|p| p.open()).map(|p| p.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_sort_numerically() {
        let mut ips: Vec<Ipv4Addr> = ["10.0.0.10", "10.0.0.9", "10.0.0.100", "9.255.255.255"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ips.sort();
        let sorted: Vec<String> = ips.iter().map(Ipv4Addr::to_string).collect();
        assert_eq!(sorted, ["9.255.255.255", "10.0.0.9", "10.0.0.10", "10.0.0.100"]);
    }

    #[test]
    fn open_ports_filters_closed() {
        let addr = Ipv4Addr::new(10, 0, 0, 9);
        let report = HostReport::new(
            addr,
            vec![
                PortResult::new(addr, 22, false),
                PortResult::new(addr, 80, true),
                PortResult::new(addr, 443, true),
            ],
        );
        assert_eq!(report.open_ports().collect::<Vec<_>>(), vec![80, 443]);
        assert_eq!(report.ports[0].state.to_string(), "closed");
    }
}
