//! Source-data integrity check.
//!
//! Runs every check for the selected kinds and prints one report per
//! kind. Returns the total defect count; `main` turns a nonzero count
//! into exit status 1 so CI can gate catalog builds on clean data.

use crate::cli::{CheckArgs, Cli};
use saros_catalog::build::sanity::{check_kind, SanityOptions, SanityReport};
use saros_core::EclipseKind;

pub fn run(args: &CheckArgs, cli: &Cli) -> anyhow::Result<usize> {
    print_plan(args, cli);

    let options = SanityOptions {
        max_gap_years: args.max_gap_years,
    };
    let kinds: Vec<EclipseKind> = match args.kind {
        Some(k) => vec![k.to_kind()],
        None => vec![EclipseKind::Solar, EclipseKind::Lunar],
    };

    let mut total = 0;
    for &kind in &kinds {
        let report = check_kind(&args.data_dir, kind, options);
        print_report(&report, cli.verbose);
        total += report.defect_count();
    }

    if total == 0 {
        println!("\nAll checks passed.");
    } else {
        println!("\n{} defect(s) found.", total);
    }
    Ok(total)
}

fn print_plan(args: &CheckArgs, cli: &Cli) {
    println!("=== Check Source Data ===");
    println!("Data directory: {:?}", args.data_dir);
    match args.kind {
        Some(k) => println!("Kind: {:?}", k.to_kind()),
        None => println!("Kind: both"),
    }
    println!("Max gap: {:.2} years", args.max_gap_years);
    println!("Verbose: {}", cli.verbose);
    println!();
}

fn print_report(report: &SanityReport, verbose: bool) {
    println!("--- {} ---", report.kind);
    if report.is_clean() {
        println!("clean");
        return;
    }

    if !report.missing_series.is_empty() {
        println!("Missing series ({}):", report.missing_series.len());
        for saros in &report.missing_series {
            println!("  saros {}: no records", saros);
        }
    }
    if !report.file_errors.is_empty() {
        println!("Unreadable series files ({}):", report.file_errors.len());
        for defect in &report.file_errors {
            println!("  saros {}: {}", defect.saros_number, defect.message);
        }
    }
    if !report.sequence_gaps.is_empty() {
        println!("Sequence gaps ({}):", report.sequence_gaps.len());
        for gap in &report.sequence_gaps {
            println!(
                "  saros {}: rel {} -> {} (delta {})",
                gap.saros_number, gap.before_rel, gap.after_rel, gap.delta
            );
            if verbose {
                println!("    between {} and {}", gap.before_date, gap.after_date);
            }
        }
    }
    if !report.time_gaps.is_empty() {
        println!("Time gaps ({}):", report.time_gaps.len());
        for gap in &report.time_gaps {
            println!(
                "  saros {}: {:.1} years between {} and {}",
                gap.saros_number, gap.gap_years, gap.before_date, gap.after_date
            );
        }
    }
}
