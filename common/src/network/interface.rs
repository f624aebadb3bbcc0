//! Local subnet detection for the `lan` target.

use pnet::datalink::{self, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

use crate::error::Result;
use crate::utils::interface::NetworkInterfaceExtension;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface was filtered out as "not physical" by the provided logic.
    NotPhysical,
    /// The interface does not support broadcast.
    NotBroadcast,
    /// The interface is a point-to-point link (e.g. a VPN).
    IsPointToPoint,
    /// The interface has no private IPv4 address.
    NoValidLanIp,
}

/// Finds the primary LAN interface and returns its private IPv4 network.
pub fn get_lan_network() -> Result<Option<Ipv4Network>> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces()
        .into_iter()
        .filter(|interface| is_viable_lan_interface(interface, is_physical).is_ok())
        .collect();

    let Some(interface) = select_best_lan_interface(interfaces, is_wired) else {
        return Ok(None);
    };

    Ok(interface.get_private_ipv4_net())
}

fn is_viable_lan_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> std::result::Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() || !is_physical(interface) {
        return Err(ViabilityError::NotPhysical);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    let has_private_v4 = interface
        .ips
        .iter()
        .any(|net| matches!(net, IpNetwork::V4(v4) if v4.ip().is_private()));
    if !has_private_v4 {
        return Err(ViabilityError::NoValidLanIp);
    }

    Ok(())
}

fn select_best_lan_interface(
    interfaces: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<NetworkInterface> {
    interfaces
        .iter()
        .find(|&interface| is_wired(interface))
        .or(interfaces.first())
        .cloned()
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
fn is_physical(interface: &NetworkInterface) -> bool {
    std::path::Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
}

#[cfg(target_os = "linux")]
fn is_wireless(interface: &NetworkInterface) -> bool {
    std::path::Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
}

// No cheap hardware check elsewhere: trust the interface flags.
#[cfg(not(target_os = "linux"))]
fn is_physical(_interface: &NetworkInterface) -> bool {
    true
}

#[cfg(not(target_os = "linux"))]
fn is_wireless(interface: &NetworkInterface) -> bool {
    interface.name.starts_with("wl")
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
    use pnet::util::MacAddr;

    const IFF_UP: u32 = 1;
    const IFF_BROADCAST: u32 = 1 << 1;
    const IFF_LOOPBACK: u32 = 1 << 3;
    const IFF_POINTTOPOINT: u32 = 1 << 4;

    fn create_mock_interface(name: &str, ips: Vec<IpNetwork>, flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: "An interface".to_string(),
            index: 0,
            mac: Some(MacAddr(0x1, 0x2, 0x3, 0x4, 0x5, 0x6)),
            ips,
            flags,
        }
    }

    fn private_ips() -> Vec<IpNetwork> {
        vec![IpNetwork::V4("192.168.1.100/24".parse().unwrap())]
    }

    fn always_physical(_: &NetworkInterface) -> bool {
        true
    }

    #[test]
    fn is_viable_lan_interface_should_succeed() {
        let interface = create_mock_interface("eth0", private_ips(), IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&interface, always_physical), Ok(()));
    }

    #[test]
    fn is_viable_lan_interface_should_fail_when_down() {
        let interface = create_mock_interface("eth0", private_ips(), IFF_BROADCAST);
        assert_eq!(
            is_viable_lan_interface(&interface, always_physical),
            Err(ViabilityError::IsDown)
        );
    }

    #[test]
    fn is_viable_lan_interface_should_fail_for_loopback() {
        let interface =
            create_mock_interface("lo", private_ips(), IFF_UP | IFF_BROADCAST | IFF_LOOPBACK);
        assert_eq!(
            is_viable_lan_interface(&interface, always_physical),
            Err(ViabilityError::NotPhysical)
        );
    }

    #[test]
    fn is_viable_lan_interface_should_fail_for_vpn() {
        let interface =
            create_mock_interface("tun0", private_ips(), IFF_UP | IFF_BROADCAST | IFF_POINTTOPOINT);
        assert_eq!(
            is_viable_lan_interface(&interface, always_physical),
            Err(ViabilityError::IsPointToPoint)
        );
    }

    #[test]
    fn is_viable_lan_interface_should_fail_without_private_ipv4() {
        let ips = vec![
            IpNetwork::V4("8.8.8.8/24".parse().unwrap()),
            IpNetwork::V6("fe80::1/64".parse().unwrap()),
        ];
        let interface = create_mock_interface("eth0", ips, IFF_UP | IFF_BROADCAST);
        assert_eq!(
            is_viable_lan_interface(&interface, always_physical),
            Err(ViabilityError::NoValidLanIp)
        );
    }

    #[test]
    fn select_best_prefers_wired() {
        let wlan = create_mock_interface("wlan0", private_ips(), IFF_UP | IFF_BROADCAST);
        let eth = create_mock_interface("eth0", private_ips(), IFF_UP | IFF_BROADCAST);
        let selected = select_best_lan_interface(vec![wlan, eth], |i| i.name.starts_with("eth"));
        assert_eq!(selected.unwrap().name, "eth0");
    }

    #[test]
    fn select_best_falls_back_to_first() {
        let wlan = create_mock_interface("wlan0", private_ips(), IFF_UP | IFF_BROADCAST);
        let selected = select_best_lan_interface(vec![wlan], |_| false);
        assert_eq!(selected.unwrap().name, "wlan0");
        assert!(select_best_lan_interface(vec![], |_| true).is_none());
    }
}
