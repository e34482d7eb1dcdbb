//! Export built catalogs as a merged CSV listing.
//!
//! Columns: `saros_number,type,date,time` with the kind folded into the
//! type column (`S [T+]` solar, `L [Nb]` lunar), dates as `DD.MM.YYYY`
//! and times as `HH:MM:SS`. The end date is inclusive of its whole day.

use crate::cli::{Cli, ExportArgs, KindArg};
use anyhow::Context;
use saros_catalog::query::{merge_events, EclipseEvent, LunarCatalog, SolarCatalog};
use saros_core::julian::{parse_date, unix_to_calendar};
use saros_core::constants::SECONDS_PER_DAY;
use saros_core::EclipseKind;
use std::fs::File;
use std::io::{self, BufWriter, Write};

pub fn run(args: &ExportArgs, cli: &Cli) -> anyhow::Result<()> {
    let start = match &args.start {
        Some(s) => parse_date(s).with_context(|| format!("invalid start date {:?}", s))?,
        None => i64::MIN,
    };
    let end = match &args.end {
        Some(s) => {
            let midnight = parse_date(s).with_context(|| format!("invalid end date {:?}", s))?;
            midnight + SECONDS_PER_DAY - 1
        }
        None => i64::MAX,
    };

    if cli.verbose {
        eprintln!("Export window: {}..={}", start, end);
    }

    let events = collect_events(args, start, end)?;

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create {:?}", path))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };
    write_csv(&mut out, &events)?;
    out.flush()?;

    match &args.output {
        Some(path) => eprintln!("Wrote {} eclipses to {:?}", events.len(), path),
        None => eprintln!("{} eclipses", events.len()),
    }
    Ok(())
}

fn collect_events(args: &ExportArgs, start: i64, end: i64) -> anyhow::Result<Vec<EclipseEvent>> {
    let solar_dir = args.db_dir.join(EclipseKind::Solar.dir_name());
    let lunar_dir = args.db_dir.join(EclipseKind::Lunar.dir_name());

    match args.kind {
        Some(KindArg::Solar) => {
            let solar = SolarCatalog::open(&solar_dir)
                .with_context(|| format!("failed to open solar catalog in {:?}", solar_dir))?;
            Ok(solar
                .range(start, end)
                .map(|entry| {
                    let info = solar.info(entry.index).expect("index from range query");
                    EclipseEvent {
                        timestamp: entry.timestamp,
                        kind: EclipseKind::Solar,
                        saros_number: info.saros_number,
                        type_code: info.type_code,
                    }
                })
                .collect())
        }
        Some(KindArg::Lunar) => {
            let lunar = LunarCatalog::open(&lunar_dir)
                .with_context(|| format!("failed to open lunar catalog in {:?}", lunar_dir))?;
            Ok(lunar
                .range(start, end)
                .map(|entry| {
                    let info = lunar.info(entry.index).expect("index from range query");
                    EclipseEvent {
                        timestamp: entry.timestamp,
                        kind: EclipseKind::Lunar,
                        saros_number: info.saros_number,
                        type_code: info.type_code,
                    }
                })
                .collect())
        }
        None => {
            let solar = SolarCatalog::open(&solar_dir)
                .with_context(|| format!("failed to open solar catalog in {:?}", solar_dir))?;
            let lunar = LunarCatalog::open(&lunar_dir)
                .with_context(|| format!("failed to open lunar catalog in {:?}", lunar_dir))?;
            Ok(merge_events(&solar, &lunar, start, end))
        }
    }
}

fn write_csv<W: Write>(out: &mut W, events: &[EclipseEvent]) -> io::Result<()> {
    writeln!(out, "saros_number,type,date,time")?;
    for event in events {
        let cal = unix_to_calendar(event.timestamp);
        writeln!(
            out,
            "{},{} [{}],{:02}.{:02}.{:04},{:02}:{:02}:{:02}",
            event.saros_number,
            event.kind.prefix(),
            event.type_label(),
            cal.day,
            cal.month,
            cal.year,
            cal.hour,
            cal.minute,
            cal.second
        )?;
    }
    Ok(())
}
