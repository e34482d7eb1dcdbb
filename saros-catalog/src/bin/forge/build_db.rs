//! Build the binary catalog tables from per-series source data.
//!
//! For each selected kind: load and rank every series in the requested
//! Saros range, encode the three tables, and write them atomically under
//! `<out-dir>/<kind>/`. With `--emit-embedded` the same tables are also
//! rendered as Rust static-array modules for firmware use.

use crate::cli::{BuildArgs, Cli};
use anyhow::Context;
use saros_catalog::build::{self, embed, CatalogTables, SarosRange};
use saros_core::EclipseKind;
use std::fs;
use std::time::Instant;

pub fn run(args: &BuildArgs, cli: &Cli) -> anyhow::Result<()> {
    let range = SarosRange {
        first: args.first,
        last: args.last,
    };
    anyhow::ensure!(
        (1..=180).contains(&args.first) && (1..=180).contains(&args.last) && args.first <= args.last,
        "invalid saros range {}..={}",
        args.first,
        args.last
    );
    anyhow::ensure!(
        args.data_dir.exists(),
        "data directory not found: {:?}",
        args.data_dir
    );

    print_plan(args, range, cli);
    let start = Instant::now();

    let kinds: Vec<EclipseKind> = match args.kind {
        Some(k) => vec![k.to_kind()],
        None => vec![EclipseKind::Solar, EclipseKind::Lunar],
    };

    for &kind in &kinds {
        println!("Building {} tables...", kind);
        let tables = build::build_tables(&args.data_dir, kind, range)
            .with_context(|| format!("failed to build {} catalog", kind))?;
        build::write_catalog(&tables, &args.out_dir)
            .with_context(|| format!("failed to write {} catalog", kind))?;
        print_stats(&tables);

        if let Some(embed_dir) = &args.emit_embedded {
            fs::create_dir_all(embed_dir)
                .with_context(|| format!("failed to create {:?}", embed_dir))?;
            let path = embed::write_module(&tables, &args.label, embed_dir)?;
            println!("Embedded module: {:?}", path);
        }
    }

    println!("\nDone in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn print_plan(args: &BuildArgs, range: SarosRange, cli: &Cli) {
    println!("=== Build Catalog ===");
    println!("Data directory: {:?}", args.data_dir);
    println!("Output directory: {:?}", args.out_dir);
    match args.kind {
        Some(k) => println!("Kind: {:?}", k.to_kind()),
        None => println!("Kind: both"),
    }
    println!("Saros range: {}..={}", range.first, range.last);
    match &args.emit_embedded {
        Some(dir) => println!("Embedded modules: {:?} (label {:?})", dir, args.label),
        None => println!("Embedded modules: no"),
    }
    println!("Verbose: {}", cli.verbose);
    println!();
}

fn print_stats(tables: &CatalogTables) {
    let populated = tables
        .series_slots()
        .iter()
        .filter(|slot| !slot.is_empty())
        .count();
    let bytes = tables.times_bytes().len()
        + tables.info_bytes().len()
        + tables.series_bytes().len();
    println!("  Eclipses: {}", tables.len());
    println!("  Populated series: {}/{}", populated, tables.range().len());
    println!("  Table bytes: {}", bytes);
}
