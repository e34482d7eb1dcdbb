//! CLI argument definitions for forge

use clap::{Parser, Subcommand, ValueEnum};
use saros_core::constants::DEFAULT_MAX_GAP_YEARS;
use saros_core::EclipseKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "forge")]
#[command(about = "Saros eclipse catalog data pipeline")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check per-series source data for coverage, sequence, and spacing defects
    Check(CheckArgs),

    /// Build the binary catalog tables from per-series source data
    Build(BuildArgs),

    /// Export a merged solar+lunar CSV listing from built catalogs
    Export(ExportArgs),
}

/// Eclipse kind selector for subcommands that can run on one kind.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum KindArg {
    Solar,
    Lunar,
}

impl KindArg {
    pub fn to_kind(self) -> EclipseKind {
        match self {
            KindArg::Solar => EclipseKind::Solar,
            KindArg::Lunar => EclipseKind::Lunar,
        }
    }
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Directory of per-series source data (<kind>/<saros>/eclipses.jsonl)
    #[arg(long)]
    pub data_dir: PathBuf,

    /// Check only this kind (default: both)
    #[arg(long)]
    pub kind: Option<KindArg>,

    /// Largest tolerated spacing between series members, in years
    #[arg(long, default_value_t = DEFAULT_MAX_GAP_YEARS)]
    pub max_gap_years: f64,
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Directory of per-series source data
    #[arg(long)]
    pub data_dir: PathBuf,

    /// Output directory; tables land in <out-dir>/<kind>/
    #[arg(long)]
    pub out_dir: PathBuf,

    /// Build only this kind (default: both)
    #[arg(long)]
    pub kind: Option<KindArg>,

    /// First Saros number to include
    #[arg(long, default_value = "1")]
    pub first: u8,

    /// Last Saros number to include
    #[arg(long, default_value = "180")]
    pub last: u8,

    /// Also generate embedded Rust modules into this directory
    #[arg(long)]
    pub emit_embedded: Option<PathBuf>,

    /// Identifier suffix for generated embedded modules
    #[arg(long, default_value = "full")]
    pub label: String,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Directory containing the built solar/ and lunar/ catalogs
    #[arg(long)]
    pub db_dir: PathBuf,

    /// Export only this kind (default: both)
    #[arg(long)]
    pub kind: Option<KindArg>,

    /// First day to include, YYYY-MM-DD (leading '-' for BCE years).
    /// Omit for all data.
    pub start: Option<String>,

    /// Last day to include, YYYY-MM-DD (whole day is included)
    pub end: Option<String>,

    /// Output CSV file; stdout when omitted
    pub output: Option<PathBuf>,
}
