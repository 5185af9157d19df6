//! rolegate CLI
//!
//! Evaluates permission checks against a policy loaded from configuration.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rolegate::{
    config::{AppConfig, LogFormat, load_config},
    roles::{Identity, parse_mode},
};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// rolegate - role-based CRUD permission checks
#[derive(Parser, Debug)]
#[command(name = "rolegate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "ROLEGATE_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error), overrides the config file
    #[arg(long, env = "ROLEGATE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether the given roles may act in a mode
    Check {
        /// Mode name (create, read, update, delete, crud) or descriptor
        #[arg(short, long)]
        mode: String,

        /// Role name (repeatable)
        #[arg(short, long = "role")]
        roles: Vec<String>,

        /// Identity as JSON: a role string, a list of roles, or an object
        /// with a `roles` list (repeatable)
        #[arg(long = "identity")]
        identities: Vec<String>,
    },

    /// Decode a `<level:4> <group> <name>` mode descriptor
    ParseMode { descriptor: String },
}

fn init_logging(config: &AppConfig, level: Option<&str>) {
    let level = level.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let layer = match config.logging.format {
        LogFormat::Pretty => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();
}

fn run_check(
    config: &AppConfig,
    mode: &str,
    roles: &[String],
    identities: &[String],
) -> anyhow::Result<bool> {
    let mut checked: Vec<Identity<'_>> =
        roles.iter().map(|r| Identity::from(r.as_str())).collect();
    for raw in identities {
        let value: serde_json::Value = serde_json::from_str(raw)
            .with_context(|| format!("identity is not valid JSON: {}", raw))?;
        checked.push(Identity::from_json(&value));
    }

    let decision = config
        .policy
        .check(mode, &checked)
        .inspect_err(|e| error!(error = %e, "Permission check failed"))?;
    info!(mode, decision = ?decision, "Permission checked");
    Ok(decision.is_allowed())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    init_logging(&config, args.log_level.as_deref());

    match args.command {
        Command::Check {
            mode,
            roles,
            identities,
        } => {
            if run_check(&config, &mode, &roles, &identities)? {
                println!("allowed");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("denied");
                Ok(ExitCode::from(1))
            }
        }
        Command::ParseMode { descriptor } => {
            let mode = parse_mode(&descriptor)?;
            println!("level: {}", mode.level());
            println!("group: {}", mode.group());
            println!("name:  {}", mode.name());
            Ok(ExitCode::SUCCESS)
        }
    }
}
