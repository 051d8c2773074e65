//! Command-line interface definitions.

pub mod check;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Error;

/// lazyhost - Automation daemon for storage hosts.
#[derive(Parser, Debug)]
#[command(name = "lazyhost")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `run` with default arguments.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the enabled modules until interrupted
    Run(RunArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `lazyhost check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            config: PathBuf::from("config.toml"),
            log_level: None,
            json_logs: false,
        }
    }
}

/// Print an error to stderr, one configuration problem per line.
pub fn report_error(err: &Error) {
    match err {
        Error::Config(config) if config.problems().len() > 1 => {
            eprintln!("Configuration errors:");
            for problem in config.problems() {
                eprintln!("  - {problem}");
            }
        }
        Error::Config(config) => eprintln!("Configuration error: {config}"),
        other => eprintln!("Error: {other}"),
    }
}
