use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use thermostat_skill::api::ApiServerBuilder;
use thermostat_skill::{Config, IntentDispatcher};

/// Thermostat - voice skill gateway for a remote thermostat
#[derive(Parser)]
#[command(name = "thermostat", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to the user config directory)
    #[arg(short, long, env = "THERMOSTAT_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the invocation endpoint (default)
    Serve,
    /// Dispatch a single request envelope and print the response
    Invoke {
        /// Path to the request JSON; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,thermostat_skill=info",
        1 => "info,thermostat_skill=debug",
        2 => "debug",
        _ => "trace",
    };

    // stdout is reserved for `invoke` output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Invoke { file } => invoke(&config, file.as_deref()).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        port = config.server.port,
        device_url = %config.device.base_url,
        device_id = %config.device.device_id,
        "starting thermostat skill"
    );

    if config.skill.application_id.is_none() {
        tracing::warn!("no application id configured, accepting requests from any application");
    }

    let dispatcher = IntentDispatcher::from_config(&config)?;
    let server = ApiServerBuilder::new(dispatcher, config.server.port)
        .application_check(config.skill.application_id.is_some())
        .device(config.device)
        .build();

    server.run().await?;
    Ok(())
}

async fn invoke(config: &Config, file: Option<&Path>) -> anyhow::Result<()> {
    let json = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let dispatcher = IntentDispatcher::from_config(config)?;

    match dispatcher.handle_json(&json).await? {
        Some(response) => println!("{response}"),
        None => tracing::info!("request acknowledged without content"),
    }

    Ok(())
}
