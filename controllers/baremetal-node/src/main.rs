//! Bare Metal Node Controller
//!
//! Brings a single Ironic node in line with a declarative parameter document:
//! - state `present`: registers the node and its ports, or patches drift
//! - state `absent`: unregisters the node and its ports
//!
//! The JSON result goes to stdout; logs go to stderr.

mod config;
mod error;
mod mapping;
mod outcome;
mod patch;
mod reconciler;
#[cfg(test)]
mod test_utils;

use crate::config::ClientConfig;
use crate::error::ControllerError;
use crate::outcome::{failure_json, ReconcileOutcome};
use crate::reconciler::Reconciler;
use clap::{Parser, Subcommand};
use node_spec::BaremetalNodeSpec;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "baremetal-node", version, about = "Enroll or remove an Ironic bare metal node")]
struct Cli {
    /// YAML file with Ironic connection settings
    #[arg(long, global = true, env = "IRONIC_CONFIG")]
    config: Option<PathBuf>,

    /// Ironic API microversion, overrides the config file
    #[arg(long, global = true, env = "IRONIC_API_VERSION")]
    api_version: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the node described by a parameter file (YAML or JSON)
    Apply {
        /// Parameter document
        params: PathBuf,
    },

    /// Print the JSON schema of the parameter document
    Schema,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema => match serde_json::to_string_pretty(&node_spec::parameter_schema()) {
            Ok(schema) => {
                println!("{schema}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to render schema: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Apply { params } => {
            match apply(&params, cli.config.as_deref(), cli.api_version).await {
                Ok(outcome) => {
                    println!("{}", outcome.to_json());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Reconciliation failed: {}", e);
                    println!("{}", failure_json(&e.to_string()));
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn apply(
    params: &Path,
    config_path: Option<&Path>,
    api_version: Option<String>,
) -> Result<ReconcileOutcome, ControllerError> {
    let spec = BaremetalNodeSpec::from_path(params)?;

    let mut config = ClientConfig::load(config_path)?;
    if let Some(api_version) = api_version {
        config.api_version = api_version;
    }

    info!("Configuration:");
    info!("  Ironic URL: {}", config.url.as_deref().unwrap_or_default());
    info!("  API version: {}", config.api_version);

    let client = config.build_client()?;
    let reconciler = Reconciler::new(Box::new(client));
    let outcome = reconciler.reconcile_node(&spec).await?;

    info!("Node reconciled (changed: {})", outcome.changed());
    Ok(outcome)
}
