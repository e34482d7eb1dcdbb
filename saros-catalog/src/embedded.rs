//! Heap-free catalog reader over borrowed byte tables.
//!
//! The firmware side of the format: the three tables live wherever the
//! target put them (a RAM slice, an external flash region) and are reached
//! through the [`Storage`] seam one small read at a time. No allocation,
//! no mmap; every lookup is a handful of fixed-size reads, so a binary
//! search over the full catalog touches at most ~14 table entries.
//!
//! For a device that polls "when is the next eclipse" every tick, wrap the
//! search with an [`IntervalCache`]: between two consecutive catalog
//! entries the answer cannot change, and the cache collapses those repeat
//! probes to a comparison. The cache is caller-owned state passed `&mut`;
//! the catalog itself stays immutable and shareable.

use crate::build::SarosRange;
use crate::error::CatalogError;
use crate::format::{
    read_time, InfoCodec, SeriesSlot, INFO_RECORD_SIZE, SERIES_RECORD_SIZE, TIME_RECORD_SIZE,
};
use crate::query::EclipseRef;
use saros_core::constants::SAROS_SERIES_COUNT;
use saros_core::EclipseKind;
use std::marker::PhantomData;

/// Random-access byte source for one table.
///
/// `read` must fill `buf` from `offset`; callers only ever request ranges
/// inside `len()`, which [`EmbeddedCatalog::new`] has already validated
/// against the record sizes.
pub trait Storage {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self, offset: usize, buf: &mut [u8]);
}

impl Storage for &[u8] {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read(&self, offset: usize, buf: &mut [u8]) {
        buf.copy_from_slice(&self[offset..offset + buf.len()]);
    }
}

/// Catalog reader over three [`Storage`] tables.
///
/// The same layout the hosted [`crate::query::Catalog`] maps from disk,
/// typically fed from arrays generated by `forge build --emit-embedded`.
#[derive(Debug)]
pub struct EmbeddedCatalog<S: Storage, C: InfoCodec> {
    times: S,
    info: S,
    series: S,
    count: usize,
    range: SarosRange,
    _codec: PhantomData<C>,
}

impl<S: Storage, C: InfoCodec> EmbeddedCatalog<S, C> {
    /// Wraps three tables covering Saros `saros_first..=saros_last`.
    /// The size cross-checks here are the only validation; every later
    /// read is in bounds by construction.
    pub fn new(
        times: S,
        info: S,
        series: S,
        saros_first: u8,
        saros_last: u8,
    ) -> Result<Self, CatalogError> {
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

        if saros_first < 1
            || saros_last as usize > SAROS_SERIES_COUNT
            || saros_first > saros_last
        {
            return Err(CatalogError::InvalidSarosRange {
                first: saros_first,
                last: saros_last,
            });
        }
        let range = SarosRange {
            first: saros_first,
            last: saros_last,
        };
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

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn saros_range(&self) -> SarosRange {
        self.range
    }

    pub fn time(&self, index: usize) -> Option<i64> {
        (index < self.count).then(|| self.time_at(index))
    }

    pub fn info(&self, index: usize) -> Option<C::Info> {
        if index >= self.count {
            return None;
        }
        let mut buf = [0u8; INFO_RECORD_SIZE];
        self.info.read(index * INFO_RECORD_SIZE, &mut buf);
        Some(C::decode(&buf))
    }

    /// First eclipse at or after `timestamp`.
    pub fn find_next(&self, timestamp: i64) -> Option<EclipseRef> {
        let index = self.lower_bound(timestamp);
        (index < self.count).then(|| EclipseRef {
            index,
            timestamp: self.time_at(index),
        })
    }

    /// Most recent eclipse at or before `timestamp`.
    pub fn find_past(&self, timestamp: i64) -> Option<EclipseRef> {
        let upper = self.upper_bound(timestamp);
        (upper > 0).then(|| EclipseRef {
            index: upper - 1,
            timestamp: self.time_at(upper - 1),
        })
    }

    /// [`EmbeddedCatalog::find_next`] with an interval cache. A probe
    /// falling in the cache's window answers without touching the tables;
    /// a miss runs the binary search and re-arms the cache around the new
    /// answer. Same result as the uncached search for every input.
    pub fn find_next_cached(
        &self,
        timestamp: i64,
        cache: &mut IntervalCache,
    ) -> Option<EclipseRef> {
        if let Some(result) = cache.lookup(timestamp) {
            return result;
        }

        let index = self.lower_bound(timestamp);
        let start = if index == 0 {
            i64::MIN
        } else {
            self.time_at(index - 1).saturating_add(1)
        };
        if index < self.count {
            let entry = EclipseRef {
                index,
                timestamp: self.time_at(index),
            };
            cache.arm(start, entry.timestamp, Some(entry));
            Some(entry)
        } else {
            cache.arm(start, i64::MAX, None);
            None
        }
    }

    /// Decoded series slot for a Saros number within this slice's range.
    pub fn series(&self, saros_number: u8) -> Option<SeriesSlot> {
        if !self.range.contains(saros_number) {
            return None;
        }
        let slot_index = (saros_number - self.range.first) as usize;
        let mut buf = [0u8; SERIES_RECORD_SIZE];
        self.series.read(slot_index * SERIES_RECORD_SIZE, &mut buf);
        Some(SeriesSlot::decode(&buf))
    }

    fn time_at(&self, index: usize) -> i64 {
        let mut buf = [0u8; TIME_RECORD_SIZE];
        self.times.read(index * TIME_RECORD_SIZE, &mut buf);
        read_time(&buf)
    }

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

/// Caller-owned memo for [`EmbeddedCatalog::find_next_cached`].
///
/// Holds the probe window over which the last answer stays valid: the
/// half-open span from just past the previous entry through the answering
/// entry itself (or to `i64::MAX` when the probe ran off the end). One
/// cache serves one catalog; start fresh after swapping tables.
#[derive(Debug, Clone, Copy)]
pub struct IntervalCache {
    armed: bool,
    start: i64,
    end: i64,
    entry: Option<EclipseRef>,
}

impl IntervalCache {
    pub const fn new() -> Self {
        Self {
            armed: false,
            start: 0,
            end: 0,
            entry: None,
        }
    }

    pub fn invalidate(&mut self) {
        self.armed = false;
    }

    fn lookup(&self, timestamp: i64) -> Option<Option<EclipseRef>> {
        (self.armed && self.start <= timestamp && timestamp <= self.end).then_some(self.entry)
    }

    fn arm(&mut self, start: i64, end: i64, entry: Option<EclipseRef>) {
        self.armed = true;
        self.start = start;
        self.end = end;
        self.entry = entry;
    }
}

impl Default for IntervalCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{SolarCodec, SolarInfo};
    use saros_core::SolarType;

    struct Tables {
        times: Vec<u8>,
        info: Vec<u8>,
        series: Vec<u8>,
    }

    // Tables for Saros slice 10..=12 from (timestamp, saros) pairs.
    fn build_tables(entries: &[(i64, u8)]) -> Tables {
        let mut times = Vec::new();
        let mut info = Vec::new();
        let mut members: Vec<Vec<u16>> = vec![Vec::new(); 3];
        for (index, &(ts, saros)) in entries.iter().enumerate() {
            times.extend_from_slice(&ts.to_le_bytes());
            let mut buf = [0u8; INFO_RECORD_SIZE];
            SolarCodec::encode(
                &SolarInfo {
                    latitude_deg10: 0,
                    longitude_deg10: 0,
                    central_duration: Some(index as u16),
                    saros_number: saros,
                    saros_pos: members[(saros - 10) as usize].len() as u8,
                    type_code: SolarType::A.code(),
                    sun_alt: 10,
                },
                &mut buf,
            );
            info.extend_from_slice(&buf);
            members[(saros - 10) as usize].push(index as u16);
        }
        let mut series = Vec::new();
        let mut slot_buf = [0u8; SERIES_RECORD_SIZE];
        for indices in &members {
            SeriesSlot::from_indices(indices).encode(&mut slot_buf);
            series.extend_from_slice(&slot_buf);
        }
        Tables { times, info, series }
    }

    fn open(tables: &Tables) -> EmbeddedCatalog<&[u8], SolarCodec> {
        EmbeddedCatalog::new(
            tables.times.as_slice(),
            tables.info.as_slice(),
            tables.series.as_slice(),
            10,
            12,
        )
        .unwrap()
    }

    #[test]
    fn test_new_validates_sizes() {
        let tables = build_tables(&[(100, 10)]);
        assert!(open(&tables).len() == 1);

        let short_info = &tables.info[..INFO_RECORD_SIZE - 1];
        let err = EmbeddedCatalog::<_, SolarCodec>::new(
            tables.times.as_slice(),
            short_info,
            tables.series.as_slice(),
            10,
            12,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::MisalignedTable { table: "info", .. }));

        let err = EmbeddedCatalog::<_, SolarCodec>::new(
            tables.times.as_slice(),
            tables.info.as_slice(),
            tables.series.as_slice(),
            12,
            10,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSarosRange { .. }));
    }

    #[test]
    fn test_searches_match_hosted_semantics() {
        let tables = build_tables(&[(100, 10), (200, 11), (200, 12), (300, 10)]);
        let catalog = open(&tables);

        assert_eq!(catalog.find_next(150).unwrap().timestamp, 200);
        assert_eq!(catalog.find_next(200).unwrap().index, 1);
        assert_eq!(catalog.find_past(200).unwrap().index, 2);
        assert_eq!(catalog.find_next(301), None);
        assert_eq!(catalog.find_past(99), None);

        let info = catalog.info(3).unwrap();
        assert_eq!(info.saros_number, 10);
        assert_eq!(info.saros_pos, 1);

        assert_eq!(catalog.series(10).unwrap().indices(), &[0, 3]);
        assert_eq!(catalog.series(9), None);
        assert_eq!(catalog.series(13), None);
    }

    #[test]
    fn test_cached_search_agrees_with_uncached() {
        let tables = build_tables(&[(100, 10), (250, 11), (400, 12)]);
        let catalog = open(&tables);
        let mut cache = IntervalCache::new();

        for ts in [-50, 0, 100, 101, 249, 250, 399, 400, 401, i64::MAX] {
            assert_eq!(
                catalog.find_next_cached(ts, &mut cache),
                catalog.find_next(ts),
                "probe at {ts}"
            );
        }
    }

    #[test]
    fn test_cache_hit_inside_interval() {
        let tables = build_tables(&[(100, 10), (250, 11)]);
        let catalog = open(&tables);
        let mut cache = IntervalCache::new();

        // Arm on a probe inside (100, 250], then hit repeatedly.
        let first = catalog.find_next_cached(150, &mut cache).unwrap();
        assert_eq!(first.timestamp, 250);
        for ts in [101, 180, 250] {
            assert_eq!(catalog.find_next_cached(ts, &mut cache), Some(first));
        }
        // Crossing the entry re-arms on the tail interval.
        assert_eq!(catalog.find_next_cached(251, &mut cache), None);
        assert_eq!(catalog.find_next_cached(i64::MAX, &mut cache), None);
        // Moving backwards still answers correctly.
        assert_eq!(
            catalog.find_next_cached(50, &mut cache).unwrap().timestamp,
            100
        );
    }

    #[test]
    fn test_invalidate_forces_fresh_search() {
        let tables = build_tables(&[(100, 10)]);
        let catalog = open(&tables);
        let mut cache = IntervalCache::new();

        assert_eq!(catalog.find_next_cached(50, &mut cache).unwrap().index, 0);
        cache.invalidate();
        assert_eq!(catalog.find_next_cached(50, &mut cache).unwrap().index, 0);
    }

    #[test]
    fn test_empty_catalog() {
        let tables = build_tables(&[]);
        let catalog = open(&tables);
        assert!(catalog.is_empty());
        assert_eq!(catalog.find_next(0), None);
        assert_eq!(catalog.find_past(0), None);
        let mut cache = IntervalCache::new();
        assert_eq!(catalog.find_next_cached(0, &mut cache), None);
        // The armed full-range miss keeps answering.
        assert_eq!(catalog.find_next_cached(12345, &mut cache), None);
    }
}
