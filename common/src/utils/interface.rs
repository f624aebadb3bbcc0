use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    fn get_private_ipv4_net(&self) -> Option<Ipv4Network>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| match ip {
                IpNetwork::V4(ipv4) => Some(*ipv4),
                IpNetwork::V6(_) => None,
            })
            .collect()
    }

    fn get_private_ipv4_net(&self) -> Option<Ipv4Network> {
        self.get_ipv4_nets()
            .into_iter()
            .find(|net| net.ip().is_private() && !net.ip().is_loopback())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_private_network_over_public() {
        let interface = NetworkInterface {
            name: "eth0".into(),
            description: String::new(),
            index: 2,
            mac: None,
            ips: vec![
                IpNetwork::V4("203.0.113.7/24".parse().unwrap()),
                IpNetwork::V6("fe80::1/64".parse().unwrap()),
                IpNetwork::V4("10.1.2.3/16".parse().unwrap()),
            ],
            flags: 0,
        };
        assert_eq!(interface.get_ipv4_nets().len(), 2);
        let net = interface.get_private_ipv4_net().unwrap();
        assert_eq!(net.prefix(), 16);
    }
}
