//! rterm CLI
//!
//! Interactive terminal for serial ports and SSH sessions opened by a remote
//! connection service:
//! - `serial` / `ssh` open a connection and relay the local terminal to it
//! - `profile` manages saved connection presets

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rt_core::config::{default_config_path, ProfileStore};
use rt_core::types::{DEFAULT_BAUD, DEFAULT_SERIAL_PORT, DEFAULT_SSH_PORT};
use rt_core::{ConnectionParams, RelayError};
use rterm::commands;
use rterm::output::print_error;

/// Exit status when the remote connection could not be established
const EXIT_ESTABLISHMENT: u8 = 2;

#[derive(Parser)]
#[command(name = "rterm")]
#[command(author, version, about = "Interactive terminal for remote serial and SSH connections")]
#[command(propagate_version = true)]
struct Cli {
    /// Address of the remote connection service, URI or host:port (overrides config)
    #[arg(short, long, global = true, env = "RTERM_TARGET")]
    target: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a serial port on the remote service and attach
    Serial(SerialArgs),

    /// Open an SSH session through the remote service and attach
    Ssh(SshArgs),

    /// Manage saved connection profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(clap::Args)]
struct SerialArgs {
    /// Serial device path on the remote host
    #[arg(short, long, default_value = DEFAULT_SERIAL_PORT)]
    port: String,
    /// Baud rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD)]
    baud: u32,
}

impl From<SerialArgs> for ConnectionParams {
    fn from(args: SerialArgs) -> Self {
        ConnectionParams::serial(args.port, args.baud)
    }
}

#[derive(clap::Args)]
struct SshArgs {
    /// Host to connect to
    #[arg(long)]
    host: String,
    /// SSH port
    #[arg(short, long, default_value_t = DEFAULT_SSH_PORT)]
    port: u16,
    /// Login user
    #[arg(short, long)]
    user: String,
    /// Login password
    #[arg(long, env = "RTERM_SSH_PASSWORD", hide_env_values = true, default_value = "")]
    password: String,
}

impl From<SshArgs> for ConnectionParams {
    fn from(args: SshArgs) -> Self {
        ConnectionParams::ssh(args.host, args.port, args.user, args.password)
    }
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List saved profiles
    List,
    /// Save a serial profile
    SaveSerial {
        /// Profile name
        name: String,
        #[command(flatten)]
        args: SerialArgs,
    },
    /// Save an SSH profile
    SaveSsh {
        /// Profile name
        name: String,
        #[command(flatten)]
        args: SshArgs,
    },
    /// Delete a saved profile
    Delete {
        /// Profile name
        name: String,
    },
    /// Connect using a saved profile
    Use {
        /// Profile name
        name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    // Stdout carries the remote's output, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e.to_string());
            for cause in e.chain().skip(1) {
                tracing::debug!("Caused by: {}", cause);
            }
            exit_code(&e)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(default_config_path);
    let mut store = ProfileStore::open(&config_path)?;

    let mut config = store.config().clone();
    if let Some(target) = cli.target {
        config.target = target;
    }

    match cli.command {
        Commands::Serial(args) => {
            let params = ConnectionParams::from(args);
            commands::connect_command(&config, params.into()).await?;
        }
        Commands::Ssh(args) => {
            let params = ConnectionParams::from(args);
            commands::connect_command(&config, params.into()).await?;
        }
        Commands::Profile { action } => match action {
            ProfileAction::List => commands::profile_list(&store),
            ProfileAction::SaveSerial { name, args } => {
                commands::profile_save(&mut store, &name, args.into())?;
            }
            ProfileAction::SaveSsh { name, args } => {
                commands::profile_save(&mut store, &name, args.into())?;
            }
            ProfileAction::Delete { name } => commands::profile_delete(&mut store, &name)?,
            ProfileAction::Use { name } => {
                commands::profile_use(&store, &config, &name).await?;
            }
        },
    }

    Ok(())
}

/// Map a failure to the process exit status
fn exit_code(err: &anyhow::Error) -> ExitCode {
    let establishment = err
        .downcast_ref::<RelayError>()
        .is_some_and(RelayError::is_establishment);

    if establishment {
        ExitCode::from(EXIT_ESTABLISHMENT)
    } else {
        ExitCode::FAILURE
    }
}
