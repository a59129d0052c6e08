use crate::cidr;
use crate::error::{DesignError, Result};
use crate::interface::NicConfig;
use tracing::debug;

/// Inputs for the traffic filter attached to a NIC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    /// Name of the filter set to reference
    pub name: String,
    /// Address the guest is allowed to send from
    pub primary_addr: String,
    pub dhcp_server: Option<String>,
    pub ra_server: Option<String>,
    /// Let the guest reach other hosts on its own networks
    pub allow_same_net: bool,
    pub ipv4_cidr: Option<String>,
    pub ipv6_cidr: Option<String>,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, primary_addr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_addr: primary_addr.into(),
            dhcp_server: None,
            ra_server: None,
            allow_same_net: false,
            ipv4_cidr: None,
            ipv6_cidr: None,
        }
    }

    #[must_use]
    pub fn with_dhcp_server(mut self, addr: impl Into<String>) -> Self {
        self.dhcp_server = Some(addr.into());
        self
    }

    #[must_use]
    pub fn with_ra_server(mut self, addr: impl Into<String>) -> Self {
        self.ra_server = Some(addr.into());
        self
    }

    #[must_use]
    pub fn with_ipv4_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.ipv4_cidr = Some(cidr.into());
        self
    }

    #[must_use]
    pub fn with_ipv6_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.ipv6_cidr = Some(cidr.into());
        self
    }

    /// CIDRs are only turned into filter parameters when this is set
    #[must_use]
    pub fn allow_same_net(mut self, allow: bool) -> Self {
        self.allow_same_net = allow;
        self
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Populate the traffic filter of an interface.
///
/// Parameters are appended in a fixed order:
/// IP, DHCPSERVER, RASERVER, PROJNET/PROJMASK, PROJNET6/PROJMASK6.
///
/// The record is mutated as the parameters are built. A malformed CIDR
/// aborts with [`DesignError::InvalidCidr`] after the earlier parameters
/// were already appended, so the record must be discarded on error.
#[tracing::instrument(name = "vif.filter", skip(conf, spec), fields(filter = %spec.name))]
pub fn set_host_backend_filter(conf: &mut NicConfig, spec: &FilterSpec) -> Result<()> {
    if conf.filter_name.is_some() {
        return Err(DesignError::ConfigurationConflict {
            existing: "traffic filter",
            requested: "traffic filter",
        });
    }

    conf.filter_name = Some(spec.name.clone());
    conf.add_filter_param("IP", spec.primary_addr.as_str());

    if let Some(dhcp) = present(spec.dhcp_server.as_ref()) {
        conf.add_filter_param("DHCPSERVER", dhcp);
    }

    if let Some(ra) = present(spec.ra_server.as_ref()) {
        conf.add_filter_param("RASERVER", ra);
    }

    if spec.allow_same_net {
        if let Some(v4) = present(spec.ipv4_cidr.as_ref()) {
            let (net, mask) = cidr::net_and_mask(v4)?;
            conf.add_filter_param("PROJNET", net);
            conf.add_filter_param("PROJMASK", mask);
        }

        if let Some(v6) = present(spec.ipv6_cidr.as_ref()) {
            let (net, prefix) = cidr::net_and_prefixlen(v6)?;
            conf.add_filter_param("PROJNET6", net);
            conf.add_filter_param("PROJMASK6", prefix);
        }
    }

    debug!(params = conf.filter_params.len(), "traffic filter configured");

    Ok(())
}
