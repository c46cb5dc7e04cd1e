use anyhow::{Context, bail};
use clap::Parser;
use sbconnect::cli::{Cli, OutputFormat};
use sbconnect::{config, inspect, logger};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let app_config = config::load_config(cli.config.as_deref())?;

    logger::setup_logger(app_config.logging(), cli.log_level.as_deref())
        .context("Failed to initialize logging")?;

    let Some(connection_string) = cli
        .connection_string
        .as_deref()
        .or_else(|| app_config.connection_string())
    else {
        bail!(
            "No connection string given. Pass --connection-string, set SBCONNECT__CONNECTION_STRING, or add connection_string to the config file."
        );
    };

    let report = inspect(connection_string).map_err(|e| anyhow::anyhow!(e.user_message()))?;

    match cli.format.unwrap_or_else(|| app_config.format()) {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to render report")?
        ),
    }

    Ok(())
}
