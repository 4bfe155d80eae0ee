//! Network Inspector CLI
//!
//! Prints the active network snapshot as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! netinspect                          # typed snapshot
//! netinspect inspect --format bridge  # flat plugin-style map
//! netinspect capabilities
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use netinspect::{logging, platform, to_bridge_map, Config};

#[derive(Parser)]
#[command(name = "netinspect")]
#[command(about = "Inspect the active network interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file; without it NETINSPECT_CONFIG_PATH and
    /// ~/.binks/netinspect.toml are tried in turn
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a snapshot of the active network
    Inspect {
        /// Output shape
        #[arg(long, value_enum, default_value_t = OutputFormat::Snapshot)]
        format: OutputFormat,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Show which capability-gated fields this host can report
    Capabilities,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Typed snapshot (camelCase keys)
    Snapshot,
    /// Flat key-value map (dns1/dns2, hasWifi, rssi, ...)
    Bridge,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    logging::init_tracing("netinspect", &config.logging)?;
    match &config.loaded_from {
        Some(path) => tracing::info!("Loaded config from {}", path.display()),
        None => tracing::debug!("Using default configuration"),
    }

    let inspector = platform::host_inspector(&config);

    let command = cli.command.unwrap_or(Commands::Inspect {
        format: OutputFormat::Snapshot,
        pretty: false,
    });

    let (value, pretty) = match command {
        Commands::Inspect { format, pretty } => {
            let snapshot = inspector
                .inspect()
                .map_err(|e| anyhow::anyhow!("Error getting network config: {}", e))?;
            let value = match format {
                OutputFormat::Snapshot => serde_json::to_value(&snapshot)?,
                OutputFormat::Bridge => serde_json::Value::Object(to_bridge_map(&snapshot)),
            };
            (value, pretty)
        }
        Commands::Capabilities => (serde_json::to_value(inspector.capabilities())?, true),
    };

    let output = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", output);

    Ok(())
}
