//! Forge: Saros eclipse catalog data pipeline CLI
//!
//! Checks scraped per-series eclipse data, builds the binary catalog
//! tables (hosted files and embedded Rust modules), and exports merged
//! CSV listings.

mod build_db;
mod check;
mod cli;
mod export;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        eprintln!("Verbose mode enabled");
    }

    match &cli.command {
        Commands::Check(args) => {
            let defects = check::run(args, &cli)?;
            if defects > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Build(args) => build_db::run(args, &cli),
        Commands::Export(args) => export::run(args, &cli),
    }
}
