//! Pre-build integrity checks over the per-series source files.
//!
//! The checker walks every Saros number for one kind and accumulates
//! defects instead of stopping at the first: a scrape problem usually
//! shows up in many series at once, and one report per kind is what the
//! operator wants to read. Nothing here aborts — unreadable or
//! unparseable files are themselves defects in the report.

use crate::build::{load_series_file, series_file_path, SourceRecord};
use saros_core::constants::{DEFAULT_MAX_GAP_YEARS, SAROS_SERIES_COUNT, SECONDS_PER_YEAR};
use saros_core::EclipseKind;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct SanityOptions {
    /// Largest tolerated spacing between chronologically adjacent members
    /// of one series, in years.
    pub max_gap_years: f64,
}

impl Default for SanityOptions {
    fn default() -> Self {
        Self {
            max_gap_years: DEFAULT_MAX_GAP_YEARS,
        }
    }
}

/// A break in a series' own sequence numbering.
#[derive(Debug, Clone)]
pub struct SequenceGap {
    pub saros_number: u8,
    /// Observed `rel_num` delta; anything other than +1 is a defect.
    pub delta: i32,
    pub before_rel: i32,
    pub before_date: String,
    pub after_rel: i32,
    pub after_date: String,
}

/// Adjacent members of one series spaced wider than the threshold.
#[derive(Debug, Clone)]
pub struct TimeGap {
    pub saros_number: u8,
    pub gap_years: f64,
    pub before_date: String,
    pub after_date: String,
}

/// A series file that could not be read or parsed.
#[derive(Debug, Clone)]
pub struct FileDefect {
    pub saros_number: u8,
    pub message: String,
}

/// Everything the checker found for one kind.
#[derive(Debug, Clone)]
pub struct SanityReport {
    pub kind: EclipseKind,
    /// Saros numbers in 1..=180 with no records at all.
    pub missing_series: Vec<u8>,
    pub sequence_gaps: Vec<SequenceGap>,
    pub time_gaps: Vec<TimeGap>,
    pub file_errors: Vec<FileDefect>,
}

impl SanityReport {
    pub fn defect_count(&self) -> usize {
        self.missing_series.len()
            + self.sequence_gaps.len()
            + self.time_gaps.len()
            + self.file_errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.defect_count() == 0
    }
}

/// Runs all checks for one kind over `<data_dir>/<kind>/<n>/eclipses.jsonl`.
pub fn check_kind(data_dir: &Path, kind: EclipseKind, options: SanityOptions) -> SanityReport {
    let mut report = SanityReport {
        kind,
        missing_series: Vec::new(),
        sequence_gaps: Vec::new(),
        time_gaps: Vec::new(),
        file_errors: Vec::new(),
    };

    for saros_number in 1..=SAROS_SERIES_COUNT as u8 {
        let path = series_file_path(data_dir, kind, saros_number);
        if !path.exists() {
            report.missing_series.push(saros_number);
            continue;
        }
        let records = match load_series_file(&path) {
            Ok(records) => records,
            Err(e) => {
                report.file_errors.push(FileDefect {
                    saros_number,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if records.is_empty() {
            report.missing_series.push(saros_number);
            continue;
        }
        check_series(saros_number, &records, options, &mut report);
    }

    report
}

fn check_series(
    saros_number: u8,
    records: &[SourceRecord],
    options: SanityOptions,
    report: &mut SanityReport,
) {
    // Both checks walk in sequence order; for sane data that is also
    // chronological order.
    let mut by_rel: Vec<&SourceRecord> = records.iter().collect();
    by_rel.sort_by_key(|r| r.rel_num);

    for pair in by_rel.windows(2) {
        // Sequence numbering must advance by exactly one.
        let delta = pair[1].rel_num - pair[0].rel_num;
        if delta != 1 {
            report.sequence_gaps.push(SequenceGap {
                saros_number,
                delta,
                before_rel: pair[0].rel_num,
                before_date: pair[0].calendar_date.clone(),
                after_rel: pair[1].rel_num,
                after_date: pair[1].calendar_date.clone(),
            });
        }

        // Neighbors sit one Saros period apart, give or take.
        let gap_years =
            (pair[1].unix_timestamp - pair[0].unix_timestamp) as f64 / SECONDS_PER_YEAR;
        if gap_years > options.max_gap_years {
            report.time_gaps.push(TimeGap {
                saros_number,
                gap_years,
                before_date: pair[0].calendar_date.clone(),
                after_date: pair[1].calendar_date.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const YEAR: i64 = 31_557_600; // 365.25 days

    fn record(rel: i32, ts: i64) -> String {
        serde_json::json!({
            "rel_num": rel,
            "unix_timestamp": ts,
            "calendar_date": format!("rec {rel}"),
            "ecl_type": "T",
        })
        .to_string()
    }

    fn write_series(dir: &Path, saros_number: u8, lines: &[String]) {
        let series_dir = dir.join("solar").join(saros_number.to_string());
        fs::create_dir_all(&series_dir).unwrap();
        fs::write(series_dir.join("eclipses.jsonl"), lines.join("\n")).unwrap();
    }

    fn fill_all_series(dir: &Path) {
        for n in 1..=180u8 {
            write_series(dir, n, &[record(1, 0)]);
        }
    }

    #[test]
    fn test_clean_data_yields_clean_report() {
        let tmp = TempDir::new().unwrap();
        fill_all_series(tmp.path());
        // One well-behaved multi-member series at ~18-year spacing.
        write_series(
            tmp.path(),
            40,
            &[record(1, 0), record(2, 18 * YEAR), record(3, 36 * YEAR)],
        );
        let report = check_kind(tmp.path(), EclipseKind::Solar, SanityOptions::default());
        assert!(report.is_clean(), "unexpected defects: {report:?}");
    }

    #[test]
    fn test_missing_series_reported() {
        let tmp = TempDir::new().unwrap();
        fill_all_series(tmp.path());
        fs::remove_file(
            tmp.path()
                .join("solar")
                .join("17")
                .join("eclipses.jsonl"),
        )
        .unwrap();
        write_series(tmp.path(), 18, &[]); // present but empty

        let report = check_kind(tmp.path(), EclipseKind::Solar, SanityOptions::default());
        assert_eq!(report.missing_series, vec![17, 18]);
        assert_eq!(report.defect_count(), 2);
    }

    #[test]
    fn test_sequence_hole_is_one_defect() {
        let tmp = TempDir::new().unwrap();
        fill_all_series(tmp.path());
        // rel_nums 1,2,3,5,6: exactly one bad delta (3 -> 5).
        write_series(
            tmp.path(),
            9,
            &[
                record(1, 0),
                record(2, 18 * YEAR),
                record(3, 36 * YEAR),
                record(5, 54 * YEAR),
                record(6, 72 * YEAR),
            ],
        );
        let report = check_kind(tmp.path(), EclipseKind::Solar, SanityOptions::default());
        assert_eq!(report.sequence_gaps.len(), 1);
        let gap = &report.sequence_gaps[0];
        assert_eq!(gap.saros_number, 9);
        assert_eq!(gap.delta, 2);
        assert_eq!(gap.before_rel, 3);
        assert_eq!(gap.after_rel, 5);
    }

    #[test]
    fn test_time_gap_threshold() {
        let tmp = TempDir::new().unwrap();
        fill_all_series(tmp.path());
        // 18-year spacing passes, a 30-year hole trips the 1.5-period line.
        write_series(
            tmp.path(),
            60,
            &[record(1, 0), record(2, 18 * YEAR), record(3, 48 * YEAR)],
        );
        let report = check_kind(tmp.path(), EclipseKind::Solar, SanityOptions::default());
        assert_eq!(report.time_gaps.len(), 1);
        assert_eq!(report.time_gaps[0].saros_number, 60);
        assert!((report.time_gaps[0].gap_years - 30.0).abs() < 0.1);
        // Widening the threshold clears it.
        let relaxed = check_kind(
            tmp.path(),
            EclipseKind::Solar,
            SanityOptions { max_gap_years: 40.0 },
        );
        assert!(relaxed.time_gaps.is_empty());
    }

    #[test]
    fn test_unparseable_file_is_a_defect_not_an_abort() {
        let tmp = TempDir::new().unwrap();
        fill_all_series(tmp.path());
        let path = tmp
            .path()
            .join("solar")
            .join("33")
            .join("eclipses.jsonl");
        fs::write(&path, "not json\n").unwrap();

        let report = check_kind(tmp.path(), EclipseKind::Solar, SanityOptions::default());
        assert_eq!(report.file_errors.len(), 1);
        assert_eq!(report.file_errors[0].saros_number, 33);
        // The rest of the run still happened.
        assert_eq!(report.defect_count(), 1);
    }
}
