mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{FilterArgs, FrontendArgs, OutputFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vifdesign")]
#[command(version = "0.1.0")]
#[command(about = "Build guest network interface definitions", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "json", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach the interface to a Linux bridge
    Bridge {
        #[command(flatten)]
        frontend: FrontendArgs,

        /// Bridge name
        #[arg(long)]
        bridge: String,

        /// Tap device name (generated by the hypervisor when omitted)
        #[arg(long)]
        tap: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Use an externally configured tap device
    Ethernet {
        #[command(flatten)]
        frontend: FrontendArgs,

        /// Tap device name
        #[arg(long)]
        tap: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Attach the interface to an OpenVSwitch bridge
    Ovs {
        #[command(flatten)]
        frontend: FrontendArgs,

        /// Bridge name
        #[arg(long)]
        bridge: String,

        /// OpenVSwitch interface id (a random UUID when omitted)
        #[arg(long)]
        interface_id: Option<String>,

        /// Tap device name (generated by the hypervisor when omitted)
        #[arg(long)]
        tap: Option<String>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the rendered interface
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bridge {
            frontend,
            bridge,
            tap,
            filter,
        } => {
            commands::bridge::execute(&frontend, bridge, tap, &filter, cli.format)?;
        }
        Commands::Ethernet {
            frontend,
            tap,
            filter,
        } => {
            commands::ethernet::execute(&frontend, tap, &filter, cli.format)?;
        }
        Commands::Ovs {
            frontend,
            bridge,
            interface_id,
            tap,
            filter,
        } => {
            commands::ovs::execute(&frontend, bridge, interface_id, tap, &filter, cli.format)?;
        }
    }

    Ok(())
}
