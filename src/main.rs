//! Znode Supervisor - runs a single child process driven by a watched coordination node.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use znode_supervisor::config::{ConfigLoader, SupervisorConfig};
use znode_supervisor::display;
use znode_supervisor::supervisor::Supervisor;

#[derive(Parser)]
#[command(
    name = "znode-supervisor",
    about = "Supervise a single child process driven by a watched coordination-service node",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Supervise the child command until the coordination session dies.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Comma-separated coordination endpoints (host:port,...).
        #[arg(long)]
        endpoints: Option<String>,
        /// Path of the node to watch.
        #[arg(long)]
        node: Option<String>,
        /// Child command to run while the node has data.
        #[arg(trailing_var_arg = true)]
        child_command: Vec<String>,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Merge CLI overrides into the loaded configuration.
fn apply_overrides(
    mut config: SupervisorConfig,
    endpoints: Option<String>,
    node: Option<String>,
    child_command: Vec<String>,
) -> SupervisorConfig {
    if let Some(endpoints) = endpoints {
        config.endpoints = endpoints.split(',').map(str::to_string).collect();
    }
    if let Some(node) = node {
        config.node_path = node;
    }
    if !child_command.is_empty() {
        config.command = child_command;
    }
    config
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            endpoints,
            node,
            child_command,
        } => {
            let loader = config.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
            let config = match loader.load() {
                Ok(config) => apply_overrides(config, endpoints, node, child_command),
                Err(e) => {
                    display::print_error(&e.to_string());
                    std::process::exit(1);
                }
            };
            if let Err(e) = config.validate() {
                display::print_error(&e.to_string());
                std::process::exit(1);
            }

            tracing::info!(
                endpoints = %config.endpoint_string(),
                node = %config.node_path,
                command = %display::render_command(&config.command),
                session_timeout_ms = config.session_timeout_ms,
                "Starting znode supervisor"
            );

            let supervisor = Supervisor::spawn(&config);
            tracing::warn!(
                "No coordination client is linked in this build; deliver watcher \
                 callbacks through Supervisor::handle"
            );

            tokio::select! {
                reason = supervisor.run() => {
                    tracing::info!(%reason, "Session closed, exiting");
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupt received, exiting");
                }
            }
        }
    }
}
