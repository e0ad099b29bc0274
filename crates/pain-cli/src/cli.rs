//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pain-harmonise",
    version,
    about = "Harmonise pain survey datasets onto canonical codes and metadata",
    long_about = "Recode, restructure and validate each configured survey variant,\n\
                  then write the cleaned rows with merged column metadata.\n\
                  Variants that fail validation are reported and not written."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Directory holding variables.toml and variants.toml.
    ///
    /// Defaults to $PAIN_STANDARDS_DIR, then the bundled standards/ directory.
    #[arg(long = "standards-dir", value_name = "DIR", global = true)]
    pub standards_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Harmonise raw datasets and write the processed outputs.
    Run(RunArgs),

    /// List canonical variable definitions.
    Variables,

    /// List configured dataset variants and their rule sets.
    Variants,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Variant to process (repeatable; default: every configured variant).
    #[arg(long = "variant", value_name = "NAME")]
    pub variants: Vec<String>,

    /// Directory containing the raw <source>.csv files.
    #[arg(long = "raw-dir", value_name = "DIR", default_value = "data/raw")]
    pub raw_dir: PathBuf,

    /// Directory receiving processed files.
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        default_value = "data/processed"
    )]
    pub output_dir: PathBuf,

    /// Validate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write every validation report as JSON to this path.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
