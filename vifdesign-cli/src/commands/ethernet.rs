use super::{FilterArgs, FrontendArgs, OutputFormat};
use anyhow::Result;
use vifdesign_common::HostBackend;

pub fn execute(
    frontend: &FrontendArgs,
    tap: String,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    super::run(frontend, &HostBackend::ethernet(tap), filter, format)
}
