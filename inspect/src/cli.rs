//! Command-line interface definitions.
//!
//! ```text
//! sbconnect --connection-string "Endpoint=sb://ns.servicebus.windows.net/;SharedAccessKeyName=Root;SharedAccessKey=..."
//! SBCONNECT__CONNECTION_STRING="..." sbconnect --format json
//! ```

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

/// Inspect a Service Bus connection string without connecting anywhere.
///
/// Prints the settings with secrets masked, the resolved management, runtime
/// and secure token service endpoints, and the credential mode that would be
/// used.
#[derive(Debug, Parser)]
#[command(name = "sbconnect", author, version)]
pub struct Cli {
    /// Connection string to inspect. Overrides the configuration file and
    /// `SBCONNECT__CONNECTION_STRING`.
    #[arg(long, short = 'c')]
    pub connection_string: Option<String>,

    /// Configuration file. Defaults to `sbconnect/config.toml` in the user
    /// configuration directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log level (trace, debug, info, warn, error). Overrides the
    /// configuration file.
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
