//! Memory-mapped catalog reader.
//!
//! A catalog directory holds the three loose tables for one kind:
//!
//! 1. **`eclipse_times.db`** — `total × 8` bytes, sorted `i64` timestamps
//! 2. **`eclipse_info.db`** — `total × 10` bytes, same order
//! 3. **`saros.db`** — one 194-byte slot per covered Saros number
//!
//! Open with [`Catalog::open`], then search by time ([`Catalog::find_next`],
//! [`Catalog::find_past`], [`Catalog::range`]) or walk a series by number.
//! All reads go straight to the maps; no table is loaded up front.

use crate::build::{SarosRange, INFO_FILE, SERIES_FILE, TIMES_FILE};
use crate::error::CatalogError;
use crate::format::{
    read_time, InfoCodec, LunarCodec, SeriesSlot, SolarCodec, INFO_RECORD_SIZE,
    SERIES_RECORD_SIZE, TIME_RECORD_SIZE,
};
use memmap2::Mmap;
use saros_core::constants::SAROS_SERIES_COUNT;
use saros_core::EclipseKind;
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// One catalog entry located by a time search: its global index plus the
/// timestamp, so callers rarely need a second lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EclipseRef {
    pub index: usize,
    pub timestamp: i64,
}

/// Memory-mapped handle to one kind's catalog.
///
/// The codec parameter fixes the info layout at the type level; use the
/// [`SolarCatalog`] / [`LunarCatalog`] aliases. The maps stay alive for the
/// lifetime of this value and every query method takes `&self`.
#[derive(Debug)]
pub struct Catalog<C: InfoCodec> {
    times: Mmap,
    info: Mmap,
    series: Mmap,
    count: usize,
    range: SarosRange,
    _codec: PhantomData<C>,
}

pub type SolarCatalog = Catalog<SolarCodec>;
pub type LunarCatalog = Catalog<LunarCodec>;

impl<C: InfoCodec> Catalog<C> {
    /// Opens a full-range catalog directory (Saros 1–180).
    ///
    /// `dir` is the kind's own directory, the one holding the three table
    /// files. Table sizes are cross-checked here; a catalog that opens
    /// cleanly cannot fail to decode later.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Self::open_slice(dir, SarosRange::full())
    }

    /// Opens a catalog built over a Saros slice (`forge build --first/--last`).
    /// The range is not recorded in the files, so the caller must supply the
    /// one the build used; a mismatch fails the slot-count check.
    pub fn open_slice(dir: impl AsRef<Path>, range: SarosRange) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let times = map_file(&dir.join(TIMES_FILE))?;
        let info = map_file(&dir.join(INFO_FILE))?;
        let series = map_file(&dir.join(SERIES_FILE))?;

        if times.len() % TIME_RECORD_SIZE != 0 {
            return Err(CatalogError::MisalignedTable {
                table: "times",
                len: times.len(),
                record_size: TIME_RECORD_SIZE,
            });
        }
        if info.len() % INFO_RECORD_SIZE != 0 {
            return Err(CatalogError::MisalignedTable {
                table: "info",
                len: info.len(),
                record_size: INFO_RECORD_SIZE,
            });
        }
        if series.len() % SERIES_RECORD_SIZE != 0 {
            return Err(CatalogError::MisalignedTable {
                table: "series",
                len: series.len(),
                record_size: SERIES_RECORD_SIZE,
            });
        }

        let count = times.len() / TIME_RECORD_SIZE;
        let info_records = info.len() / INFO_RECORD_SIZE;
        if info_records != count {
            return Err(CatalogError::TableCountMismatch {
                info_records,
                time_records: count,
            });
        }

        if range.first < 1 || range.last as usize > SAROS_SERIES_COUNT || range.first > range.last
        {
            return Err(CatalogError::InvalidSarosRange {
                first: range.first,
                last: range.last,
            });
        }
        let slots = series.len() / SERIES_RECORD_SIZE;
        if slots != range.len() {
            return Err(CatalogError::SeriesSlotCount {
                slots,
                expected: range.len(),
            });
        }

        Ok(Self {
            times,
            info,
            series,
            count,
            range,
            _codec: PhantomData,
        })
    }

    pub fn kind(&self) -> EclipseKind {
        C::KIND
    }

    /// Total number of eclipses.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn saros_range(&self) -> SarosRange {
        self.range
    }

    /// Timestamp at a global index.
    pub fn time(&self, index: usize) -> Option<i64> {
        if index >= self.count {
            return None;
        }
        Some(self.time_at(index))
    }

    /// Decoded info record at a global index.
    pub fn info(&self, index: usize) -> Option<C::Info> {
        if index >= self.count {
            return None;
        }
        let start = index * INFO_RECORD_SIZE;
        let buf: &[u8; INFO_RECORD_SIZE] = self.info[start..start + INFO_RECORD_SIZE]
            .try_into()
            .expect("slice length fixed by record size");
        Some(C::decode(buf))
    }

    /// First eclipse at or after `timestamp`, or `None` past the last entry.
    pub fn find_next(&self, timestamp: i64) -> Option<EclipseRef> {
        let index = self.lower_bound(timestamp);
        (index < self.count).then(|| EclipseRef {
            index,
            timestamp: self.time_at(index),
        })
    }

    /// Most recent eclipse at or before `timestamp`, or `None` before the
    /// first entry.
    pub fn find_past(&self, timestamp: i64) -> Option<EclipseRef> {
        let upper = self.upper_bound(timestamp);
        (upper > 0).then(|| EclipseRef {
            index: upper - 1,
            timestamp: self.time_at(upper - 1),
        })
    }

    /// All eclipses with `start <= time <= end`, in ascending time order.
    /// Equal timestamps at either boundary are included.
    pub fn range(&self, start: i64, end: i64) -> impl Iterator<Item = EclipseRef> + '_ {
        let lo = self.lower_bound(start);
        let hi = if end < start { lo } else { self.upper_bound(end) };
        (lo..hi).map(move |index| EclipseRef {
            index,
            timestamp: self.time_at(index),
        })
    }

    /// The series slot for a Saros number, decoded. `None` outside this
    /// catalog's range. An in-range series with no eclipses decodes as an
    /// empty slot, not `None`.
    pub fn series(&self, saros_number: u8) -> Option<SeriesSlot> {
        if !self.range.contains(saros_number) {
            return None;
        }
        let slot_index = (saros_number - self.range.first) as usize;
        let start = slot_index * SERIES_RECORD_SIZE;
        let buf: &[u8; SERIES_RECORD_SIZE] = self.series[start..start + SERIES_RECORD_SIZE]
            .try_into()
            .expect("slice length fixed by record size");
        Some(SeriesSlot::decode(buf))
    }

    fn time_at(&self, index: usize) -> i64 {
        let start = index * TIME_RECORD_SIZE;
        let buf: &[u8; TIME_RECORD_SIZE] = self.times[start..start + TIME_RECORD_SIZE]
            .try_into()
            .expect("slice length fixed by record size");
        read_time(buf)
    }

    // First index whose timestamp is >= the probe. Duplicate timestamps are
    // legal; this lands on the leftmost.
    fn lower_bound(&self, timestamp: i64) -> usize {
        let mut lo = 0;
        let mut hi = self.count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.time_at(mid) < timestamp {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    // First index whose timestamp is > the probe.
    fn upper_bound(&self, timestamp: i64) -> usize {
        let mut lo = 0;
        let mut hi = self.count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.time_at(mid) <= timestamp {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

fn map_file(path: &Path) -> Result<Mmap, CatalogError> {
    let io = |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io)?;
    unsafe { Mmap::map(&file) }.map_err(io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::SolarInfo;
    use saros_core::SolarType;
    use std::fs;
    use tempfile::TempDir;

    // Writes the three table files from explicit (timestamp, saros) pairs;
    // full 180-slot series index.
    fn write_test_catalog(dir: &Path, entries: &[(i64, u8)]) {
        let mut times = Vec::new();
        let mut info = Vec::new();
        let mut members: Vec<Vec<u16>> = vec![Vec::new(); SAROS_SERIES_COUNT];
        for (index, &(ts, saros)) in entries.iter().enumerate() {
            times.extend_from_slice(&ts.to_le_bytes());
            let record = SolarInfo {
                latitude_deg10: 100 + index as i16,
                longitude_deg10: -(index as i16),
                central_duration: Some(200 + index as u16),
                saros_number: saros,
                saros_pos: members[saros as usize - 1].len() as u8,
                type_code: SolarType::T.code(),
                sun_alt: 45,
            };
            let mut buf = [0u8; INFO_RECORD_SIZE];
            SolarCodec::encode(&record, &mut buf);
            info.extend_from_slice(&buf);
            members[saros as usize - 1].push(index as u16);
        }

        let mut series = Vec::new();
        let mut slot_buf = [0u8; SERIES_RECORD_SIZE];
        for indices in &members {
            SeriesSlot::from_indices(indices).encode(&mut slot_buf);
            series.extend_from_slice(&slot_buf);
        }

        fs::write(dir.join(TIMES_FILE), times).unwrap();
        fs::write(dir.join(INFO_FILE), info).unwrap();
        fs::write(dir.join(SERIES_FILE), series).unwrap();
    }

    #[test]
    fn test_open_valid_catalog() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 1), (200, 2)]);
        let catalog = SolarCatalog::open(tmp.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.kind(), EclipseKind::Solar);
        assert_eq!(catalog.time(0), Some(100));
        assert_eq!(catalog.time(2), None);
    }

    #[test]
    fn test_open_rejects_misaligned_times() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 1)]);
        let mut bytes = fs::read(tmp.path().join(TIMES_FILE)).unwrap();
        bytes.push(0);
        fs::write(tmp.path().join(TIMES_FILE), bytes).unwrap();

        let err = SolarCatalog::open(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::MisalignedTable { table: "times", .. }));
    }

    #[test]
    fn test_open_rejects_count_mismatch() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 1), (200, 1)]);
        let mut bytes = fs::read(tmp.path().join(INFO_FILE)).unwrap();
        bytes.truncate(INFO_RECORD_SIZE);
        fs::write(tmp.path().join(INFO_FILE), bytes).unwrap();

        let err = SolarCatalog::open(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::TableCountMismatch { info_records: 1, time_records: 2 }
        ));
    }

    #[test]
    fn test_open_rejects_wrong_slot_count() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 1)]);
        let mut bytes = fs::read(tmp.path().join(SERIES_FILE)).unwrap();
        bytes.truncate(100 * SERIES_RECORD_SIZE);
        fs::write(tmp.path().join(SERIES_FILE), bytes).unwrap();

        let err = SolarCatalog::open(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::SeriesSlotCount { slots: 100, expected: 180 }
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = SolarCatalog::open(tmp.path()).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_find_next_and_past() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 1), (200, 2), (300, 1)]);
        let catalog = SolarCatalog::open(tmp.path()).unwrap();

        // Exact hits are inclusive both directions.
        assert_eq!(
            catalog.find_next(200),
            Some(EclipseRef { index: 1, timestamp: 200 })
        );
        assert_eq!(
            catalog.find_past(200),
            Some(EclipseRef { index: 1, timestamp: 200 })
        );
        assert_eq!(catalog.find_next(201).unwrap().timestamp, 300);
        assert_eq!(catalog.find_past(199).unwrap().timestamp, 100);
        // Off both ends.
        assert_eq!(catalog.find_next(301), None);
        assert_eq!(catalog.find_past(99), None);
        assert_eq!(catalog.find_next(i64::MIN).unwrap().index, 0);
        assert_eq!(catalog.find_past(i64::MAX).unwrap().index, 2);
    }

    #[test]
    fn test_find_next_with_duplicate_timestamps() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 1), (200, 1), (200, 2), (300, 3)]);
        let catalog = SolarCatalog::open(tmp.path()).unwrap();
        // Leftmost of the tie.
        assert_eq!(catalog.find_next(200).unwrap().index, 1);
        // Rightmost of the tie.
        assert_eq!(catalog.find_past(200).unwrap().index, 2);
    }

    #[test]
    fn test_range_is_inclusive_of_boundary_ties() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 1), (200, 1), (200, 2), (300, 3)]);
        let catalog = SolarCatalog::open(tmp.path()).unwrap();

        let hits: Vec<_> = catalog.range(150, 250).collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].index, 1);
        assert_eq!(hits[1].index, 2);
        assert!(hits.iter().all(|r| r.timestamp == 200));

        assert_eq!(catalog.range(100, 300).count(), 4);
        assert_eq!(catalog.range(301, 400).count(), 0);
        // Inverted range is empty, not a panic.
        assert_eq!(catalog.range(300, 100).count(), 0);
    }

    #[test]
    fn test_info_decodes_by_index() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 5), (200, 5)]);
        let catalog = SolarCatalog::open(tmp.path()).unwrap();
        let info = catalog.info(1).unwrap();
        assert_eq!(info.saros_number, 5);
        assert_eq!(info.saros_pos, 1);
        assert_eq!(info.central_duration, Some(201));
        assert_eq!(info.eclipse_type(), Some(SolarType::T));
        assert!(catalog.info(2).is_none());
    }

    #[test]
    fn test_series_lookup() {
        let tmp = TempDir::new().unwrap();
        write_test_catalog(tmp.path(), &[(100, 7), (200, 9), (300, 7)]);
        let catalog = SolarCatalog::open(tmp.path()).unwrap();

        let slot = catalog.series(7).unwrap();
        assert_eq!(slot.indices(), &[0, 2]);
        // Members come back in ascending time order via their indices.
        let times: Vec<_> = slot
            .indices()
            .iter()
            .map(|&i| catalog.time(i as usize).unwrap())
            .collect();
        assert_eq!(times, vec![100, 300]);

        assert!(catalog.series(8).unwrap().is_empty());
        assert_eq!(catalog.series(0), None);
        assert_eq!(catalog.series(181), None);
    }

    #[test]
    fn test_open_slice_renumbers_slots() {
        let tmp = TempDir::new().unwrap();
        // Hand-build a 64-slot slice covering Saros 110..=173.
        let range = SarosRange { first: 110, last: 173 };
        let mut times = Vec::new();
        times.extend_from_slice(&500i64.to_le_bytes());
        let info = vec![0u8; INFO_RECORD_SIZE];
        let mut series = Vec::new();
        let mut slot_buf = [0u8; SERIES_RECORD_SIZE];
        for n in 110..=173u8 {
            let slot = if n == 120 {
                SeriesSlot::from_indices(&[0])
            } else {
                SeriesSlot::empty()
            };
            slot.encode(&mut slot_buf);
            series.extend_from_slice(&slot_buf);
        }
        fs::write(tmp.path().join(TIMES_FILE), times).unwrap();
        fs::write(tmp.path().join(INFO_FILE), info).unwrap();
        fs::write(tmp.path().join(SERIES_FILE), series).unwrap();

        // Full-range open sees the wrong slot count.
        assert!(SolarCatalog::open(tmp.path()).is_err());

        let catalog = SolarCatalog::open_slice(tmp.path(), range).unwrap();
        assert_eq!(catalog.series(120).unwrap().indices(), &[0]);
        assert_eq!(catalog.series(109), None);
        assert_eq!(catalog.series(174), None);
    }
}
