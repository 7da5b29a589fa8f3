//! CLI definition using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "geolab")]
#[command(version)]
#[command(about = "Rock and soil index properties from laboratory weighings")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text, json, csv)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also render the report to this PDF file
    #[arg(long, global = true)]
    pub pdf: Option<PathBuf>,

    /// Report metadata (project, sample id, ...) as JSON
    #[arg(long, global = true)]
    pub meta: Option<PathBuf>,

    /// Validation thresholds as TOML
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rock specimen, buoyancy method
    Rock(SampleArgs),

    /// Paraffin-coated soil specimen with flask specific gravity
    Soil(SampleArgs),
}

/// Where the weighings come from
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// JSON file with the weighings, or `-` for stdin
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Prompt for each weighing
    #[arg(long, conflicts_with = "input")]
    pub interactive: bool,
}

impl SampleArgs {
    /// True when the input should be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input.as_deref().is_some_and(|p| p.as_os_str() == "-")
    }
}
