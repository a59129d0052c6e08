use crate::error::{DesignError, Result};
use crate::interface::{BackendKind, NicConfig, VPORT_TYPE_OPENVSWITCH};
use tracing::{debug, warn};

/// Host-side attachment of a NIC. Exactly one is applied per interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostBackend {
    /// Plug into a Linux software bridge
    Bridge { bridge: String, tap: Option<String> },
    /// Use an externally configured tap device.
    ///
    /// The tap name is mandatory here: nothing else will create the device,
    /// so the hypervisor cannot pick a name for it.
    Ethernet { tap: String },
    /// Plug into an OpenVSwitch bridge
    OvsBridge {
        bridge: String,
        interface_id: String,
        tap: Option<String>,
    },
}

impl HostBackend {
    pub fn bridge(bridge: impl Into<String>) -> Self {
        HostBackend::Bridge {
            bridge: bridge.into(),
            tap: None,
        }
    }

    pub fn ethernet(tap: impl Into<String>) -> Self {
        HostBackend::Ethernet { tap: tap.into() }
    }

    pub fn ovs(bridge: impl Into<String>, interface_id: impl Into<String>) -> Self {
        HostBackend::OvsBridge {
            bridge: bridge.into(),
            interface_id: interface_id.into(),
            tap: None,
        }
    }

    /// Name the tap device for bridge and OpenVSwitch backends.
    /// Ethernet backends already carry their required tap and are unchanged.
    #[must_use]
    pub fn with_tap(mut self, name: impl Into<String>) -> Self {
        match &mut self {
            HostBackend::Bridge { tap, .. } | HostBackend::OvsBridge { tap, .. } => {
                *tap = Some(name.into());
            }
            HostBackend::Ethernet { .. } => {}
        }
        self
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            HostBackend::Bridge { .. } => BackendKind::Bridge,
            HostBackend::Ethernet { .. } => BackendKind::Ethernet,
            HostBackend::OvsBridge { .. } => BackendKind::OvsBridge,
        }
    }
}

/// Populate the host backend details of an interface.
///
/// Refuses to touch a record that already has a backend. Every variant
/// disables the launch script.
pub fn set_host_backend(conf: &mut NicConfig, backend: &HostBackend) -> Result<()> {
    if let Some(existing) = conf.backend_kind {
        return Err(DesignError::ConfigurationConflict {
            existing: existing.label(),
            requested: backend.kind().label(),
        });
    }

    match backend {
        HostBackend::Bridge { bridge, tap } => {
            conf.source_device = Some(bridge.clone());
            set_optional_tap(conf, tap.as_deref());
        }
        HostBackend::Ethernet { tap } => {
            // libvirt discourages unmanaged devices and taints the domain
            warn!(
                tap = %tap,
                "ethernet backend bypasses managed bridging, domain will be marked tainted"
            );
            conf.target_device = Some(tap.clone());
        }
        HostBackend::OvsBridge {
            bridge,
            interface_id,
            tap,
        } => {
            conf.source_device = Some(bridge.clone());
            conf.vport_type = Some(VPORT_TYPE_OPENVSWITCH.to_string());
            conf.add_vport_param("interfaceid", interface_id.as_str());
            set_optional_tap(conf, tap.as_deref());
        }
    }

    conf.backend_kind = Some(backend.kind());
    conf.launch_script = Some(String::new());

    debug!(
        kind = %backend.kind(),
        source_dev = ?conf.source_device,
        target_dev = ?conf.target_device,
        "host backend configured"
    );

    Ok(())
}

/// An empty or absent tap name leaves device naming to the hypervisor
fn set_optional_tap(conf: &mut NicConfig, tap: Option<&str>) {
    if let Some(tap) = tap.filter(|t| !t.is_empty()) {
        conf.target_device = Some(tap.to_string());
    }
}

pub fn set_host_backend_bridge(
    conf: &mut NicConfig,
    bridge: &str,
    tap: Option<&str>,
) -> Result<()> {
    let mut backend = HostBackend::bridge(bridge);
    if let Some(tap) = tap {
        backend = backend.with_tap(tap);
    }
    set_host_backend(conf, &backend)
}

pub fn set_host_backend_ethernet(conf: &mut NicConfig, tap: &str) -> Result<()> {
    set_host_backend(conf, &HostBackend::ethernet(tap))
}

pub fn set_host_backend_ovs(
    conf: &mut NicConfig,
    bridge: &str,
    interface_id: &str,
    tap: Option<&str>,
) -> Result<()> {
    let mut backend = HostBackend::ovs(bridge, interface_id);
    if let Some(tap) = tap {
        backend = backend.with_tap(tap);
    }
    set_host_backend(conf, &backend)
}
