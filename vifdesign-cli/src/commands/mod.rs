pub mod bridge;
pub mod ethernet;
pub mod ovs;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tabled::{Table, Tabled};
use tracing::info;
use vifdesign_common::designer::{set_guest_frontend, set_host_backend, set_host_backend_filter};
use vifdesign_common::{BackendKind, FilterSpec, Frontend, HostBackend, NicConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Guest-visible NIC identity
#[derive(Debug, Args)]
pub struct FrontendArgs {
    /// MAC address of the guest NIC
    #[arg(long)]
    pub mac: String,

    /// Emulated device model (e.g. virtio, e1000)
    #[arg(long)]
    pub model: Option<String>,

    /// Backend driver hint (e.g. vhost, qemu)
    #[arg(long)]
    pub driver: Option<String>,
}

impl FrontendArgs {
    fn to_frontend(&self) -> Frontend {
        let mut frontend = Frontend::new(self.mac.as_str());
        if let Some(model) = &self.model {
            frontend = frontend.with_model(model.as_str());
        }
        if let Some(driver) = &self.driver {
            frontend = frontend.with_driver(driver.as_str());
        }
        frontend
    }
}

/// Traffic filter, applied only when --filter is given
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Name of the traffic filter to reference
    #[arg(long, requires = "ip")]
    pub filter: Option<String>,

    /// Address the guest may send from
    #[arg(long, requires = "filter")]
    pub ip: Option<String>,

    /// DHCP server the guest may talk to
    #[arg(long, requires = "filter")]
    pub dhcp_server: Option<String>,

    /// Router advertisement server the guest may listen to
    #[arg(long, requires = "filter")]
    pub ra_server: Option<String>,

    /// Allow traffic to the guest's own networks
    #[arg(long, requires = "filter")]
    pub allow_same_net: bool,

    /// IPv4 network of the guest, e.g. 10.0.0.0/24
    #[arg(long, requires = "filter")]
    pub ipv4_cidr: Option<String>,

    /// IPv6 network of the guest, e.g. fd00::/64
    #[arg(long, requires = "filter")]
    pub ipv6_cidr: Option<String>,
}

impl FilterArgs {
    fn to_filter_spec(&self) -> Option<FilterSpec> {
        let name = self.filter.as_deref()?;
        let ip = self.ip.as_deref()?;

        let mut spec = FilterSpec::new(name, ip).allow_same_net(self.allow_same_net);
        if let Some(dhcp) = &self.dhcp_server {
            spec = spec.with_dhcp_server(dhcp.as_str());
        }
        if let Some(ra) = &self.ra_server {
            spec = spec.with_ra_server(ra.as_str());
        }
        if let Some(cidr) = &self.ipv4_cidr {
            spec = spec.with_ipv4_cidr(cidr.as_str());
        }
        if let Some(cidr) = &self.ipv6_cidr {
            spec = spec.with_ipv6_cidr(cidr.as_str());
        }
        Some(spec)
    }
}

/// Build an interface record from the command line and print it
pub fn run(
    frontend: &FrontendArgs,
    backend: &HostBackend,
    filter: &FilterArgs,
    format: OutputFormat,
) -> Result<()> {
    let conf = build(frontend, backend, filter)?;
    info!(kind = %backend.kind(), "interface definition built");
    println!("{}", render(&conf, format)?);
    Ok(())
}

fn build(frontend: &FrontendArgs, backend: &HostBackend, filter: &FilterArgs) -> Result<NicConfig> {
    let mut conf = NicConfig::new();

    set_guest_frontend(&mut conf, &frontend.to_frontend());
    set_host_backend(&mut conf, backend).context("Failed to configure host backend")?;

    if let Some(spec) = filter.to_filter_spec() {
        set_host_backend_filter(&mut conf, &spec)
            .with_context(|| format!("Failed to configure traffic filter {}", spec.name))?;
    }

    conf.validate().context("Interface definition is incomplete")?;

    Ok(conf)
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn row(field: &str, value: impl Into<String>) -> FieldRow {
    FieldRow {
        field: field.to_string(),
        value: value.into(),
    }
}

fn render(conf: &NicConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(conf).context("Failed to serialize interface definition")
        }
        OutputFormat::Table => Ok(render_table(conf)),
    }
}

fn render_table(conf: &NicConfig) -> String {
    let optional = [
        ("mac_addr", conf.mac_address.as_deref()),
        ("model", conf.model.as_deref()),
        ("driver_name", conf.driver_name.as_deref()),
        ("net_type", conf.backend_kind.map(BackendKind::net_type)),
        ("source_dev", conf.source_device.as_deref()),
        ("target_dev", conf.target_device.as_deref()),
        ("vporttype", conf.vport_type.as_deref()),
        ("script", conf.launch_script.as_deref()),
        ("filtername", conf.filter_name.as_deref()),
    ];

    let mut rows: Vec<FieldRow> = optional
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| row(field, v)))
        .collect();
    rows.extend(
        conf.vport_params
            .iter()
            .map(|(k, v)| row(&format!("vport {k}"), v.as_str())),
    );

    let mut out = Table::new(rows).to_string();

    if !conf.filter_params.is_empty() {
        let params: Vec<FieldRow> = conf
            .filter_params
            .iter()
            .map(|(k, v)| row(k, v.as_str()))
            .collect();
        out.push_str("\n\nFilter parameters:\n");
        out.push_str(&Table::new(params).to_string());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontend() -> FrontendArgs {
        FrontendArgs {
            mac: "52:54:00:12:34:56".to_string(),
            model: Some("virtio".to_string()),
            driver: None,
        }
    }

    fn no_filter() -> FilterArgs {
        FilterArgs {
            filter: None,
            ip: None,
            dhcp_server: None,
            ra_server: None,
            allow_same_net: false,
            ipv4_cidr: None,
            ipv6_cidr: None,
        }
    }

    #[test]
    fn test_build_without_filter() {
        let conf = build(&frontend(), &HostBackend::bridge("br0"), &no_filter()).unwrap();

        assert_eq!(conf.model.as_deref(), Some("virtio"));
        assert_eq!(conf.source_device.as_deref(), Some("br0"));
        assert!(conf.filter_name.is_none());
    }

    #[test]
    fn test_build_with_filter() {
        let filter = FilterArgs {
            filter: Some("clean-traffic".to_string()),
            ip: Some("10.0.0.5".to_string()),
            allow_same_net: true,
            ipv4_cidr: Some("10.0.0.0/24".to_string()),
            ..no_filter()
        };

        let conf = build(&frontend(), &HostBackend::ethernet("tap0"), &filter).unwrap();

        assert_eq!(conf.filter_param("PROJMASK"), Some("255.255.255.0"));
    }

    #[test]
    fn test_build_reports_bad_cidr() {
        let filter = FilterArgs {
            filter: Some("clean-traffic".to_string()),
            ip: Some("10.0.0.5".to_string()),
            allow_same_net: true,
            ipv4_cidr: Some("not-a-cidr".to_string()),
            ..no_filter()
        };

        let err = build(&frontend(), &HostBackend::bridge("br0"), &filter).unwrap_err();

        assert!(format!("{err:#}").contains("invalid CIDR 'not-a-cidr'"));
    }

    #[test]
    fn test_render_table_lists_filter_params() {
        let filter = FilterArgs {
            filter: Some("clean-traffic".to_string()),
            ip: Some("10.0.0.5".to_string()),
            dhcp_server: Some("10.0.0.1".to_string()),
            ..no_filter()
        };
        let conf = build(&frontend(), &HostBackend::ovs("br-int", "id-1"), &filter).unwrap();

        let table = render(&conf, OutputFormat::Table).unwrap();

        assert!(table.contains("vport interfaceid"));
        assert!(table.contains("Filter parameters:"));
        assert!(table.contains("DHCPSERVER"));
    }

    #[test]
    fn test_render_json() {
        let conf = build(&frontend(), &HostBackend::ethernet("tap0"), &no_filter()).unwrap();

        let json = render(&conf, OutputFormat::Json).unwrap();

        assert!(json.contains("\"net_type\": \"ethernet\""));
        assert!(json.contains("\"target_dev\": \"tap0\""));
    }
}
