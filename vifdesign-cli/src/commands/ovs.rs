use super::{FilterArgs, FrontendArgs, OutputFormat};
use anyhow::Result;
use tracing::debug;
use uuid::Uuid;
use vifdesign_common::HostBackend;

pub fn execute(
    frontend: &FrontendArgs,
    bridge: String,
    interface_id: Option<String>,
    tap: Option<String>,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let interface_id = interface_id.unwrap_or_else(|| {
        let id = Uuid::new_v4().to_string();
        debug!(interface_id = %id, "generated OpenVSwitch interface id");
        id
    });

    let mut backend = HostBackend::ovs(bridge, interface_id);
    if let Some(tap) = tap {
        backend = backend.with_tap(tap);
    }

    super::run(frontend, &backend, filter, format)
}
