use crate::error::{DesignError, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Virtual port type written for OpenVSwitch backed interfaces
pub const VPORT_TYPE_OPENVSWITCH: &str = "openvswitch";

/// Host-side technology the guest NIC is plugged into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Linux software bridge
    Bridge,
    /// Externally configured tap device
    Ethernet,
    /// OpenVSwitch bridge
    OvsBridge,
}

impl BackendKind {
    /// Interface type as the hypervisor names it. OpenVSwitch ports are
    /// bridges with a virtual port type attached.
    pub fn net_type(self) -> &'static str {
        match self {
            BackendKind::Bridge | BackendKind::OvsBridge => "bridge",
            BackendKind::Ethernet => "ethernet",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            BackendKind::Bridge => "bridge backend",
            BackendKind::Ethernet => "ethernet backend",
            BackendKind::OvsBridge => "openvswitch backend",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Bridge => write!(f, "Bridge"),
            BackendKind::Ethernet => write!(f, "Ethernet"),
            BackendKind::OvsBridge => write!(f, "OvsBridge"),
        }
    }
}

impl Serialize for BackendKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.net_type())
    }
}

/// Guest network interface definition, populated by the designer
/// functions and then handed to the domain serializer.
///
/// Field names serialize under the hypervisor's attribute names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NicConfig {
    #[serde(rename = "mac_addr", skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(rename = "net_type", skip_serializing_if = "Option::is_none")]
    pub backend_kind: Option<BackendKind>,
    #[serde(rename = "source_dev", skip_serializing_if = "Option::is_none")]
    pub source_device: Option<String>,
    #[serde(rename = "target_dev", skip_serializing_if = "Option::is_none")]
    pub target_device: Option<String>,
    #[serde(rename = "vporttype", skip_serializing_if = "Option::is_none")]
    pub vport_type: Option<String>,
    #[serde(rename = "vportparams", skip_serializing_if = "Vec::is_empty")]
    pub vport_params: Vec<(String, String)>,
    /// Always `Some("")` once a backend is applied; custom qemu network
    /// scripts are never allowed.
    #[serde(rename = "script", skip_serializing_if = "Option::is_none")]
    pub launch_script: Option<String>,
    #[serde(rename = "filtername", skip_serializing_if = "Option::is_none")]
    pub filter_name: Option<String>,
    #[serde(rename = "filterparams", skip_serializing_if = "Vec::is_empty")]
    pub filter_params: Vec<(String, String)>,
}

impl NicConfig {
    /// Create an empty interface record
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vport_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vport_params.push((key.into(), value.into()));
    }

    pub fn add_filter_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.filter_params.push((key.into(), value.into()));
    }

    /// First value recorded for a filter parameter
    pub fn filter_param(&self, key: &str) -> Option<&str> {
        self.filter_params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check that the record carries everything the serializer needs.
    ///
    /// Only presence is checked; values are passed through as given.
    pub fn validate(&self) -> Result<()> {
        if self.mac_address.is_none() {
            return Err(DesignError::Incomplete("MAC address is not set"));
        }

        let Some(kind) = self.backend_kind else {
            return Err(DesignError::Incomplete("no host backend configured"));
        };

        match kind {
            BackendKind::Bridge | BackendKind::OvsBridge => {
                if self.source_device.is_none() {
                    return Err(DesignError::Incomplete("bridge backend has no source device"));
                }
            }
            BackendKind::Ethernet => {
                if self.target_device.is_none() {
                    return Err(DesignError::Incomplete("ethernet backend has no target device"));
                }
            }
        }

        let has_vport = self.vport_type.is_some() || !self.vport_params.is_empty();
        if kind == BackendKind::OvsBridge && !has_vport {
            return Err(DesignError::Incomplete("openvswitch backend has no virtual port"));
        }
        if kind != BackendKind::OvsBridge && has_vport {
            return Err(DesignError::Incomplete(
                "virtual port set on a non-openvswitch backend",
            ));
        }

        if self.launch_script.as_deref() != Some("") {
            return Err(DesignError::Incomplete("launch script must be disabled"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridged() -> NicConfig {
        NicConfig {
            mac_address: Some("52:54:00:12:34:56".to_string()),
            backend_kind: Some(BackendKind::Bridge),
            source_device: Some("br0".to_string()),
            launch_script: Some(String::new()),
            ..NicConfig::default()
        }
    }

    #[test]
    fn test_new_is_empty() {
        let conf = NicConfig::new();
        assert!(conf.mac_address.is_none());
        assert!(conf.backend_kind.is_none());
        assert!(conf.vport_params.is_empty());
        assert!(conf.filter_params.is_empty());
    }

    #[test]
    fn test_net_type() {
        assert_eq!(BackendKind::Bridge.net_type(), "bridge");
        assert_eq!(BackendKind::OvsBridge.net_type(), "bridge");
        assert_eq!(BackendKind::Ethernet.net_type(), "ethernet");
    }

    #[test]
    fn test_filter_params_keep_duplicates() {
        let mut conf = NicConfig::new();
        conf.add_filter_param("IP", "10.0.0.5");
        conf.add_filter_param("IP", "10.0.0.6");

        assert_eq!(conf.filter_params.len(), 2);
        assert_eq!(conf.filter_param("IP"), Some("10.0.0.5"));
        assert_eq!(conf.filter_param("DHCPSERVER"), None);
    }

    #[test]
    fn test_validate_complete_bridge() {
        assert!(bridged().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_mac() {
        let conf = NicConfig {
            mac_address: None,
            ..bridged()
        };
        let err = conf.validate().unwrap_err();
        assert!(err.to_string().contains("MAC address"));
    }

    #[test]
    fn test_validate_missing_backend() {
        let conf = NicConfig {
            mac_address: Some("52:54:00:12:34:56".to_string()),
            ..NicConfig::default()
        };
        assert!(conf.validate().is_err());
    }

    #[test]
    fn test_validate_ethernet_needs_target() {
        let conf = NicConfig {
            backend_kind: Some(BackendKind::Ethernet),
            source_device: None,
            ..bridged()
        };
        let err = conf.validate().unwrap_err();
        assert!(err.to_string().contains("target device"));
    }

    #[test]
    fn test_validate_vport_only_on_ovs() {
        let mut conf = bridged();
        conf.vport_type = Some(VPORT_TYPE_OPENVSWITCH.to_string());
        assert!(conf.validate().is_err());

        conf.backend_kind = Some(BackendKind::OvsBridge);
        conf.add_vport_param("interfaceid", "a1b2");
        assert!(conf.validate().is_ok());
    }

    #[test]
    fn test_validate_script_disabled() {
        let conf = NicConfig {
            launch_script: Some("/etc/qemu-ifup".to_string()),
            ..bridged()
        };
        assert!(conf.validate().is_err());
    }
}
