use crate::interface::NicConfig;
use tracing::debug;

/// Guest-visible identity of a NIC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontend {
    /// MAC address, passed through unvalidated
    pub mac_address: String,
    /// Emulated device model (virtio, e1000, ...)
    pub model: Option<String>,
    /// Backend driver hint (vhost, qemu, ...)
    pub driver: Option<String>,
}

impl Frontend {
    pub fn new(mac_address: impl Into<String>) -> Self {
        Self {
            mac_address: mac_address.into(),
            model: None,
            driver: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = Some(driver.into());
        self
    }
}

/// Populate the guest frontend details of an interface.
///
/// The MAC is always overwritten; model and driver are only written when
/// provided, otherwise whatever the record already holds is kept.
pub fn set_guest_frontend(conf: &mut NicConfig, frontend: &Frontend) {
    conf.mac_address = Some(frontend.mac_address.clone());

    if let Some(model) = &frontend.model {
        conf.model = Some(model.clone());
    }
    if let Some(driver) = &frontend.driver {
        conf.driver_name = Some(driver.clone());
    }

    debug!(
        mac = %frontend.mac_address,
        model = ?frontend.model,
        driver = ?frontend.driver,
        "guest frontend configured"
    );
}
