use super::{FilterArgs, FrontendArgs, OutputFormat};
use anyhow::Result;
use vifdesign_common::HostBackend;

pub fn execute(
    frontend: &FrontendArgs,
    bridge: String,
    tap: Option<String>,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut backend = HostBackend::bridge(bridge);
    if let Some(tap) = tap {
        backend = backend.with_tap(tap);
    }

    super::run(frontend, &backend, filter, format)
}
