use crate::error::{DesignError, Result};
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use std::fmt;

/// Address family a CIDR is resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

/// Resolve a CIDR into a (network, mask-or-prefix) pair.
///
/// IPv4 yields a dotted-decimal mask, IPv6 yields the prefix length.
/// The address part is returned as written; host bits are not cleared.
pub fn resolve(cidr: &str, family: AddressFamily) -> Result<(String, String)> {
    match family {
        AddressFamily::Ipv4 => net_and_mask(cidr),
        AddressFamily::Ipv6 => net_and_prefixlen(cidr),
    }
}

/// Split an IPv4 CIDR into its address and dotted-decimal netmask
pub fn net_and_mask(cidr: &str) -> Result<(String, String)> {
    let net: Ipv4Network = match parse(cidr)? {
        IpNetwork::V4(net) => net,
        IpNetwork::V6(_) => return Err(wrong_family(cidr, AddressFamily::Ipv4)),
    };

    Ok((net.ip().to_string(), net.mask().to_string()))
}

/// Split an IPv6 CIDR into its address and prefix length
pub fn net_and_prefixlen(cidr: &str) -> Result<(String, String)> {
    let net: Ipv6Network = match parse(cidr)? {
        IpNetwork::V6(net) => net,
        IpNetwork::V4(_) => return Err(wrong_family(cidr, AddressFamily::Ipv6)),
    };

    Ok((net.ip().to_string(), net.prefix().to_string()))
}

fn parse(cidr: &str) -> Result<IpNetwork> {
    cidr.parse::<IpNetwork>()
        .map_err(|e| DesignError::InvalidCidr {
            cidr: cidr.to_string(),
            reason: e.to_string(),
        })
}

fn wrong_family(cidr: &str, expected: AddressFamily) -> DesignError {
    DesignError::InvalidCidr {
        cidr: cidr.to_string(),
        reason: format!("expected an {expected} network"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_net_and_mask() {
        let (net, mask) = net_and_mask("10.0.0.0/24").unwrap();
        assert_eq!(net, "10.0.0.0");
        assert_eq!(mask, "255.255.255.0");

        let (net, mask) = net_and_mask("192.168.100.0/22").unwrap();
        assert_eq!(net, "192.168.100.0");
        assert_eq!(mask, "255.255.252.0");
    }

    #[test]
    fn test_ipv4_host_bits_kept() {
        let (net, mask) = net_and_mask("10.0.0.5/24").unwrap();
        assert_eq!(net, "10.0.0.5");
        assert_eq!(mask, "255.255.255.0");
    }

    #[test]
    fn test_ipv6_net_and_prefixlen() {
        let (net, prefix) = net_and_prefixlen("fd00:1::/64").unwrap();
        assert_eq!(net, "fd00:1::");
        assert_eq!(prefix, "64");
    }

    #[test]
    fn test_resolve_dispatches_on_family() {
        assert_eq!(
            resolve("172.16.0.0/12", AddressFamily::Ipv4).unwrap(),
            ("172.16.0.0".to_string(), "255.240.0.0".to_string())
        );
        assert_eq!(
            resolve("2001:db8::/48", AddressFamily::Ipv6).unwrap(),
            ("2001:db8::".to_string(), "48".to_string())
        );
    }

    #[test]
    fn test_malformed_cidr() {
        for bad in ["not-a-cidr", "10.0.0.0/33", "10.0.0.0/", ""] {
            let err = net_and_mask(bad).unwrap_err();
            assert!(matches!(err, DesignError::InvalidCidr { .. }), "{bad} accepted");
        }
        assert!(net_and_prefixlen("fd00::/129").is_err());
    }

    #[test]
    fn test_family_mismatch() {
        let err = net_and_mask("fd00::/64").unwrap_err();
        assert!(err.to_string().contains("expected an IPv4 network"));

        let err = net_and_prefixlen("10.0.0.0/8").unwrap_err();
        assert!(err.to_string().contains("expected an IPv6 network"));
    }
}
