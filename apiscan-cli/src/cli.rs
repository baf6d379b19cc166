//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// apiscan -- public API surface reports for JVM artifacts.
///
/// Use `apiscan <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "apiscan", version, about, long_about = None)]
pub struct Cli {
    /// Path to the apiscan.toml configuration file.
    #[arg(short, long, default_value = "apiscan.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan artifacts and write one API report per artifact.
    Scan(ScanArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Scan JAR/ZIP archives or class directories.
///
/// Values given here override the `[scanner]` section of the config file.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Artifacts to scan (default: `scanner.artifacts` from the config).
    pub artifacts: Vec<PathBuf>,

    /// Dependency location used for type resolution only (repeatable).
    #[arg(short = 'p', long = "classpath")]
    pub classpath: Vec<PathBuf>,

    /// Directory that receives the reports.
    #[arg(short = 'd', long)]
    pub output_dir: Option<PathBuf>,

    /// Skip an artifact when a direct supertype cannot be resolved.
    #[arg(long)]
    pub strict: bool,

    /// Leave synthetic and bridge members out of the reports.
    #[arg(long)]
    pub exclude_synthetic: bool,

    /// Maximum number of artifacts scanned in parallel.
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Exit with code 4 when any artifact was skipped.
    #[arg(long)]
    pub fail_on_skip: bool,
}

// ---- config ----

/// Manage apiscan configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, scanner).
        #[arg(long)]
        section: Option<String>,
    },
}
