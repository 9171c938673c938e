use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mesh_steward::{
    ClusterId, CommandIndex, Config, DeviceRegistry, IeeeAddress, NetworkAddress, StandardCatalog,
};

/// Steward - device registry and command catalog for a mesh coordinator
#[derive(Parser)]
#[command(name = "steward", version, about)]
struct Cli {
    /// Path to the device database
    #[arg(long, env = "STEWARD_DB_PATH", global = true)]
    db: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect or edit the paired device registry
    #[command(subcommand)]
    Devices(DevicesCommand),
    /// Show the command identifiers each cluster accepts
    Catalog {
        /// Only show this cluster (decimal or 0x-prefixed hex)
        #[arg(short, long, value_parser = parse_cluster)]
        cluster: Option<ClusterId>,
    },
}

#[derive(Subcommand)]
enum DevicesCommand {
    /// List all paired devices
    List,
    /// Show a device by long address
    Show {
        /// Long address, e.g. 00:11:22:33:44:55:66:77
        ieee: IeeeAddress,
    },
    /// Find a device by short address
    Find {
        /// Short address, e.g. 0x1234
        nwk: NetworkAddress,
    },
    /// Forget a device
    Remove {
        /// Long address, e.g. 00:11:22:33:44:55:66:77
        ieee: IeeeAddress,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,mesh_steward=info",
        1 => "info,mesh_steward=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let fatal = e
                .downcast_ref::<mesh_steward::Error>()
                .is_some_and(mesh_steward::Error::is_fatal);
            if fatal {
                tracing::error!("fatal: {e:#}, refusing to continue without a durable registry");
            } else {
                tracing::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;

    match cli.command {
        Command::Devices(cmd) => {
            let path = cli.db.unwrap_or(config.registry.path);
            let registry = DeviceRegistry::open(&path)?;
            devices(&registry, cmd)
        }
        Command::Catalog { cluster } => {
            catalog(cluster, &config);
            Ok(())
        }
    }
}

fn devices(registry: &DeviceRegistry, cmd: DevicesCommand) -> anyhow::Result<()> {
    match cmd {
        DevicesCommand::List => {
            if registry.is_empty() {
                println!("No paired devices");
                return Ok(());
            }
            for device in registry.list() {
                println!(
                    "{}  {}  {} {}",
                    device.ieee_address,
                    device.network_address,
                    device.manufacturer.as_deref().unwrap_or("-"),
                    device.model.as_deref().unwrap_or("-"),
                );
            }
        }
        DevicesCommand::Show { ieee } => {
            let device = registry
                .get(ieee)
                .ok_or_else(|| anyhow::anyhow!("no device with long address {ieee}"))?;
            println!("{}", serde_json::to_string_pretty(&device)?);
        }
        DevicesCommand::Find { nwk } => {
            let device = registry
                .get_by_short_address(nwk)
                .ok_or_else(|| anyhow::anyhow!("no device with short address {nwk}"))?;
            println!("{}", serde_json::to_string_pretty(&device)?);
        }
        DevicesCommand::Remove { ieee } => {
            if !registry.exists(ieee) {
                anyhow::bail!("no device with long address {ieee}");
            }
            registry.remove(ieee)?;
            println!("Removed {ieee}");
        }
    }
    Ok(())
}

fn catalog(filter: Option<ClusterId>, config: &Config) {
    let index = CommandIndex::build(&StandardCatalog);
    println!("Reply timeout: {}s", config.commands.timeout.as_secs());

    let mut current = None;
    for (cluster, shape, id) in index.entries() {
        if filter.is_some_and(|f| f != cluster) {
            continue;
        }
        if current != Some(cluster) {
            current = Some(cluster);
            println!(
                "\n0x{:04x} {}",
                cluster.0,
                cluster.name().unwrap_or("Unknown")
            );
        }
        println!("  0x{id:02x}  {shape}");
    }
}

fn parse_cluster(s: &str) -> Result<ClusterId, String> {
    let parsed = s.strip_prefix("0x").map_or_else(
        || s.parse::<u16>(),
        |hex| u16::from_str_radix(hex, 16),
    );
    parsed
        .map(ClusterId)
        .map_err(|e| format!("invalid cluster id '{s}': {e}"))
}
