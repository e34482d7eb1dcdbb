//! Merged chronology across the solar and lunar catalogs.
//!
//! The two catalogs are independent files with independent index spaces;
//! this module interleaves their range queries into one time-ordered event
//! stream, which is what the CSV exporter and most listings want.

use crate::query::catalog::{LunarCatalog, SolarCatalog};
use saros_core::EclipseKind;

/// One eclipse of either kind, flattened to the fields a merged listing
/// needs. The raw type code is kept alongside the kind so unknown codes
/// still render (as the numeric code) instead of dropping the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EclipseEvent {
    pub timestamp: i64,
    pub kind: EclipseKind,
    pub saros_number: u8,
    pub type_code: u8,
}

impl EclipseEvent {
    /// Human-readable type label, e.g. `T+` or `Nb`; the numeric code when
    /// the label table does not know it.
    pub fn type_label(&self) -> String {
        self.kind.type_label(self.type_code)
    }
}

/// All eclipses of both kinds with `start <= time <= end`, ascending by
/// timestamp. A solar and a lunar eclipse cannot fall on the same instant,
/// but equal timestamps still order deterministically (solar first).
pub fn merge_events(
    solar: &SolarCatalog,
    lunar: &LunarCatalog,
    start: i64,
    end: i64,
) -> Vec<EclipseEvent> {
    let mut solar_iter = solar.range(start, end).peekable();
    let mut lunar_iter = lunar.range(start, end).peekable();
    let mut events = Vec::new();

    loop {
        let take_solar = match (solar_iter.peek(), lunar_iter.peek()) {
            (Some(s), Some(l)) => s.timestamp <= l.timestamp,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_solar {
            let entry = solar_iter.next().expect("peeked entry present");
            let info = solar.info(entry.index).expect("index from range query");
            events.push(EclipseEvent {
                timestamp: entry.timestamp,
                kind: EclipseKind::Solar,
                saros_number: info.saros_number,
                type_code: info.type_code,
            });
        } else {
            let entry = lunar_iter.next().expect("peeked entry present");
            let info = lunar.info(entry.index).expect("index from range query");
            events.push(EclipseEvent {
                timestamp: entry.timestamp,
                kind: EclipseKind::Lunar,
                saros_number: info.saros_number,
                type_code: info.type_code,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{INFO_FILE, SERIES_FILE, TIMES_FILE};
    use crate::format::{
        InfoCodec, LunarCodec, LunarInfo, SeriesSlot, SolarCodec, SolarInfo, INFO_RECORD_SIZE,
        SERIES_RECORD_SIZE,
    };
    use saros_core::constants::SAROS_SERIES_COUNT;
    use saros_core::{LunarType, SolarType};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_solar(dir: &Path, entries: &[(i64, u8)]) {
        let mut times = Vec::new();
        let mut info = Vec::new();
        for &(ts, saros) in entries {
            times.extend_from_slice(&ts.to_le_bytes());
            let mut buf = [0u8; INFO_RECORD_SIZE];
            SolarCodec::encode(
                &SolarInfo {
                    latitude_deg10: 0,
                    longitude_deg10: 0,
                    central_duration: None,
                    saros_number: saros,
                    saros_pos: 0,
                    type_code: SolarType::T.code(),
                    sun_alt: 0,
                },
                &mut buf,
            );
            info.extend_from_slice(&buf);
        }
        write_tables(dir, times, info);
    }

    fn write_lunar(dir: &Path, entries: &[(i64, u8)]) {
        let mut times = Vec::new();
        let mut info = Vec::new();
        for &(ts, saros) in entries {
            times.extend_from_slice(&ts.to_le_bytes());
            let mut buf = [0u8; INFO_RECORD_SIZE];
            LunarCodec::encode(
                &LunarInfo {
                    pen_duration: None,
                    par_duration: None,
                    total_duration: None,
                    saros_number: saros,
                    saros_pos: 0,
                    type_code: LunarType::N.code(),
                },
                &mut buf,
            );
            info.extend_from_slice(&buf);
        }
        write_tables(dir, times, info);
    }

    fn write_tables(dir: &Path, times: Vec<u8>, info: Vec<u8>) {
        let mut series = Vec::new();
        let slot = {
            let mut buf = [0u8; SERIES_RECORD_SIZE];
            SeriesSlot::empty().encode(&mut buf);
            buf
        };
        for _ in 0..SAROS_SERIES_COUNT {
            series.extend_from_slice(&slot);
        }
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(TIMES_FILE), times).unwrap();
        fs::write(dir.join(INFO_FILE), info).unwrap();
        fs::write(dir.join(SERIES_FILE), series).unwrap();
    }

    #[test]
    fn test_merge_interleaves_by_time() {
        let tmp = TempDir::new().unwrap();
        let solar_dir = tmp.path().join("solar");
        let lunar_dir = tmp.path().join("lunar");
        write_solar(&solar_dir, &[(100, 1), (400, 2)]);
        write_lunar(&lunar_dir, &[(200, 30), (300, 31), (500, 32)]);

        let solar = SolarCatalog::open(&solar_dir).unwrap();
        let lunar = LunarCatalog::open(&lunar_dir).unwrap();
        let events = merge_events(&solar, &lunar, i64::MIN, i64::MAX);

        let shape: Vec<_> = events.iter().map(|e| (e.timestamp, e.kind)).collect();
        assert_eq!(
            shape,
            vec![
                (100, EclipseKind::Solar),
                (200, EclipseKind::Lunar),
                (300, EclipseKind::Lunar),
                (400, EclipseKind::Solar),
                (500, EclipseKind::Lunar),
            ]
        );
        assert_eq!(events[1].saros_number, 30);
        assert_eq!(events[0].type_label(), "T");
        assert_eq!(events[1].type_label(), "N");
    }

    #[test]
    fn test_merge_respects_inclusive_window() {
        let tmp = TempDir::new().unwrap();
        let solar_dir = tmp.path().join("solar");
        let lunar_dir = tmp.path().join("lunar");
        write_solar(&solar_dir, &[(100, 1), (200, 1), (300, 1)]);
        write_lunar(&lunar_dir, &[(150, 40), (350, 40)]);

        let solar = SolarCatalog::open(&solar_dir).unwrap();
        let lunar = LunarCatalog::open(&lunar_dir).unwrap();
        let events = merge_events(&solar, &lunar, 150, 300);
        let times: Vec<_> = events.iter().map(|e| e.timestamp).collect();
        assert_eq!(times, vec![150, 200, 300]);
    }

    #[test]
    fn test_merge_with_one_empty_side() {
        let tmp = TempDir::new().unwrap();
        let solar_dir = tmp.path().join("solar");
        let lunar_dir = tmp.path().join("lunar");
        write_solar(&solar_dir, &[]);
        write_lunar(&lunar_dir, &[(10, 1), (20, 2)]);

        let solar = SolarCatalog::open(&solar_dir).unwrap();
        let lunar = LunarCatalog::open(&lunar_dir).unwrap();
        let events = merge_events(&solar, &lunar, i64::MIN, i64::MAX);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == EclipseKind::Lunar));
    }
}
