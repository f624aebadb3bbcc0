use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use netsweep_common::error::Result;

use crate::network::tcp::{self, Handshake};

/// Decides whether one port of one host accepts connections.
///
/// Refused, reset, unreachable and timed-out attempts are all `Ok(false)`.
#[async_trait]
pub trait PortChecker: Send + Sync {
    async fn check_port(&self, addr: Ipv4Addr, port: u16, limit: Duration) -> Result<bool>;
}

/// Connect-scan: a port is open when the TCP handshake completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpPortChecker;

#[async_trait]
impl PortChecker for TcpPortChecker {
    async fn check_port(&self, addr: Ipv4Addr, port: u16, limit: Duration) -> Result<bool> {
        let target = SocketAddr::new(IpAddr::V4(addr), port);
        let outcome = tcp::handshake(target, limit).await?;
        Ok(outcome == Handshake::Established)
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
