//! Catalog construction from per-series source records.
//!
//! Input is one JSONL file per Saros series,
//! `<data_dir>/<kind>/<saros_number>/eclipses.jsonl`, produced by the
//! upstream scraper. [`build_tables`] loads every series for one kind,
//! ranks records within their series, merges them globally by timestamp,
//! and encodes the three fixed-width tables. [`write_catalog`] then emits
//! them as loose files, all-or-nothing per kind.
//!
//! Run the [`sanity`] checks first; the builder assumes a zero-defect
//! report and does not re-verify coverage or spacing.

pub mod embed;
pub mod sanity;

use crate::error::BuildError;
use crate::format::{
    write_time, InfoCodec, LunarCodec, LunarInfo, SeriesSlot, SolarCodec, SolarInfo,
    INFO_RECORD_SIZE, SAROS_MAX_ECLIPSES, SERIES_RECORD_SIZE, TIME_RECORD_SIZE,
};
use byteorder::{LittleEndian, WriteBytesExt};
use saros_core::constants::SAROS_SERIES_COUNT;
use saros_core::{EclipseKind, LunarType, SolarType};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Loose-file names within a kind's catalog directory.
pub const TIMES_FILE: &str = "eclipse_times.db";
pub const INFO_FILE: &str = "eclipse_info.db";
pub const SERIES_FILE: &str = "saros.db";

/// One record as parsed from a series JSONL file.
///
/// `rel_num` is the upstream catalog's own sequence position; the builder
/// validates it (see [`sanity`]) but never stores it — the encoded
/// `saros_pos` is recomputed from timestamp order. Kind-specific fields are
/// optional at the parse level and enforced per kind at encode time.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    pub rel_num: i32,
    pub unix_timestamp: i64,
    pub calendar_date: String,
    pub ecl_type: String,

    // Solar fields
    #[serde(default)]
    pub latitude_deg: Option<f64>,
    #[serde(default)]
    pub longitude_deg: Option<f64>,
    #[serde(default)]
    pub sun_alt: Option<i32>,
    #[serde(default)]
    pub central_duration: Option<String>,

    // Lunar fields (phase durations in minutes)
    #[serde(default)]
    pub pen_duration_m: Option<f64>,
    #[serde(default)]
    pub par_duration_m: Option<f64>,
    #[serde(default)]
    pub total_duration_m: Option<f64>,
}

/// Path of one series' JSONL file.
pub fn series_file_path(data_dir: &Path, kind: EclipseKind, saros_number: u8) -> PathBuf {
    data_dir
        .join(kind.dir_name())
        .join(saros_number.to_string())
        .join("eclipses.jsonl")
}

/// Reads and parses one series file. Any unreadable or malformed line is
/// fatal here; the sanity pass reports the same condition non-fatally.
pub fn load_series_file(path: &Path) -> Result<Vec<SourceRecord>, BuildError> {
    let file = File::open(path).map_err(|e| BuildError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| BuildError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: SourceRecord = serde_json::from_str(&line).map_err(|e| BuildError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            source: e,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// A contiguous range of Saros numbers covered by one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarosRange {
    pub first: u8,
    pub last: u8,
}

impl SarosRange {
    /// The full catalog range, Saros 1–180.
    pub fn full() -> Self {
        Self {
            first: 1,
            last: SAROS_SERIES_COUNT as u8,
        }
    }

    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, saros_number: u8) -> bool {
        (self.first..=self.last).contains(&saros_number)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> {
        self.first..=self.last
    }
}

/// The three encoded tables for one kind, held in memory between build and
/// emission. Global indices are local to this catalog's range: a sliced
/// build renumbers from 0 and is a standalone catalog, not a view.
#[derive(Debug, Clone)]
pub struct CatalogTables {
    kind: EclipseKind,
    range: SarosRange,
    times: Vec<i64>,
    info: Vec<[u8; INFO_RECORD_SIZE]>,
    series: Vec<SeriesSlot>,
}

impl CatalogTables {
    pub fn kind(&self) -> EclipseKind {
        self.kind
    }

    pub fn range(&self) -> SarosRange {
        self.range
    }

    /// Total eclipse count (shared by the times and info tables).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[i64] {
        &self.times
    }

    pub fn info_record(&self, index: usize) -> Option<&[u8; INFO_RECORD_SIZE]> {
        self.info.get(index)
    }

    /// Slot for a Saros number within this catalog's range.
    pub fn series_slot(&self, saros_number: u8) -> Option<&SeriesSlot> {
        if !self.range.contains(saros_number) {
            return None;
        }
        self.series.get((saros_number - self.range.first) as usize)
    }

    pub fn series_slots(&self) -> &[SeriesSlot] {
        &self.series
    }

    pub fn times_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.times.len() * TIME_RECORD_SIZE);
        let mut record = [0u8; TIME_RECORD_SIZE];
        for &ts in &self.times {
            write_time(ts, &mut record);
            buf.extend_from_slice(&record);
        }
        buf
    }

    pub fn info_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.info.len() * INFO_RECORD_SIZE);
        for record in &self.info {
            buf.extend_from_slice(record);
        }
        buf
    }

    pub fn series_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.series.len() * SERIES_RECORD_SIZE);
        let mut slot_buf = [0u8; SERIES_RECORD_SIZE];
        for slot in &self.series {
            slot.encode(&mut slot_buf);
            buf.extend_from_slice(&slot_buf);
        }
        buf
    }
}

struct RankedRecord {
    timestamp: i64,
    saros_number: u8,
    saros_pos: u8,
    encoded: [u8; INFO_RECORD_SIZE],
}

/// Builds the three tables for one kind over the given Saros range.
///
/// Series files absent from the range encode as empty slots (a series with
/// no attested eclipses is legal); the sanity pass is what flags absence
/// as a coverage defect. Encoding failures — an unmapped type label, a
/// malformed duration — abort the whole build.
pub fn build_tables(
    data_dir: &Path,
    kind: EclipseKind,
    range: SarosRange,
) -> Result<CatalogTables, BuildError> {
    let mut all: Vec<RankedRecord> = Vec::new();

    for saros_number in range.iter() {
        let path = series_file_path(data_dir, kind, saros_number);
        if !path.exists() {
            continue;
        }
        let mut records = load_series_file(&path)?;
        if records.len() > SAROS_MAX_ECLIPSES {
            return Err(BuildError::SeriesOverflow {
                saros_number,
                len: records.len(),
                capacity: SAROS_MAX_ECLIPSES,
            });
        }

        // saros_pos is the rank in timestamp order within the series,
        // recomputed here; contiguous 0..len by construction.
        records.sort_by_key(|r| (r.unix_timestamp, r.rel_num));
        for (pos, record) in records.iter().enumerate() {
            let saros_pos = pos as u8;
            let encoded = encode_info(kind, record, saros_number, saros_pos)?;
            all.push(RankedRecord {
                timestamp: record.unix_timestamp,
                saros_number,
                saros_pos,
                encoded,
            });
        }
    }

    // Global merge. Ties on timestamp are broken deterministically so
    // repeated builds of the same data are byte-identical.
    all.sort_by_key(|r| (r.timestamp, r.saros_number, r.saros_pos));

    if all.len() > u16::MAX as usize + 1 {
        return Err(BuildError::TooManyEclipses { total: all.len() });
    }

    let mut times = Vec::with_capacity(all.len());
    let mut info = Vec::with_capacity(all.len());
    let mut members: Vec<Vec<u16>> = vec![Vec::new(); range.len()];
    for (global_index, record) in all.iter().enumerate() {
        times.push(record.timestamp);
        info.push(record.encoded);
        members[(record.saros_number - range.first) as usize].push(global_index as u16);
    }

    let series = members
        .iter()
        .map(|indices| SeriesSlot::from_indices(indices))
        .collect();

    Ok(CatalogTables {
        kind,
        range,
        times,
        info,
        series,
    })
}

fn encode_info(
    kind: EclipseKind,
    record: &SourceRecord,
    saros_number: u8,
    saros_pos: u8,
) -> Result<[u8; INFO_RECORD_SIZE], BuildError> {
    let mut buf = [0u8; INFO_RECORD_SIZE];
    match kind {
        EclipseKind::Solar => {
            let info = encode_solar(record, saros_number, saros_pos)?;
            SolarCodec::encode(&info, &mut buf);
        }
        EclipseKind::Lunar => {
            let info = encode_lunar(record, saros_number, saros_pos)?;
            LunarCodec::encode(&info, &mut buf);
        }
    }
    Ok(buf)
}

fn encode_solar(
    record: &SourceRecord,
    saros_number: u8,
    saros_pos: u8,
) -> Result<SolarInfo, BuildError> {
    let missing = |field| BuildError::MissingField {
        kind: EclipseKind::Solar,
        saros_number,
        field,
    };
    let latitude = record.latitude_deg.ok_or_else(|| missing("latitude_deg"))?;
    let longitude = record
        .longitude_deg
        .ok_or_else(|| missing("longitude_deg"))?;

    let ty = SolarType::from_label(&record.ecl_type).ok_or_else(|| BuildError::UnknownTypeLabel {
        kind: EclipseKind::Solar,
        saros_number,
        label: record.ecl_type.clone(),
    })?;

    let central_duration = record
        .central_duration
        .as_deref()
        .map(|s| parse_duration(s, saros_number))
        .transpose()?;

    Ok(SolarInfo {
        latitude_deg10: deg_to_deg10(latitude),
        longitude_deg10: deg_to_deg10(longitude),
        central_duration,
        saros_number,
        saros_pos,
        type_code: ty.code(),
        sun_alt: record.sun_alt.unwrap_or(0).clamp(0, 255) as u8,
    })
}

fn encode_lunar(
    record: &SourceRecord,
    saros_number: u8,
    saros_pos: u8,
) -> Result<LunarInfo, BuildError> {
    let ty = LunarType::from_label(&record.ecl_type).ok_or_else(|| BuildError::UnknownTypeLabel {
        kind: EclipseKind::Lunar,
        saros_number,
        label: record.ecl_type.clone(),
    })?;

    Ok(LunarInfo {
        pen_duration: record.pen_duration_m.map(minutes_to_seconds),
        par_duration: record.par_duration_m.map(minutes_to_seconds),
        total_duration: record.total_duration_m.map(minutes_to_seconds),
        saros_number,
        saros_pos,
        type_code: ty.code(),
    })
}

fn deg_to_deg10(degrees: f64) -> i16 {
    (degrees * 10.0)
        .round()
        .clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// Phase durations arrive as fractional minutes; stored precision is whole
/// seconds, clamped below the sentinel.
fn minutes_to_seconds(minutes: f64) -> u16 {
    (minutes * 60.0).round().clamp(0.0, 65534.0) as u16
}

/// Parses a central duration of the form `"03m59s"` into whole seconds.
fn parse_duration(value: &str, saros_number: u8) -> Result<u16, BuildError> {
    let bad = || BuildError::BadDuration {
        saros_number,
        value: value.to_string(),
    };
    let stripped = value.strip_suffix('s').ok_or_else(bad)?;
    let (minutes, seconds) = stripped.split_once('m').ok_or_else(bad)?;
    let minutes: u32 = minutes.parse().map_err(|_| bad())?;
    let seconds: u32 = seconds.parse().map_err(|_| bad())?;
    if seconds >= 60 {
        return Err(bad());
    }
    Ok((minutes * 60 + seconds).min(65534) as u16)
}

/// Writes the three tables as loose files under `<out_dir>/<kind>/`.
///
/// All-or-nothing: each table is written to a `.tmp` sibling and the
/// renames happen only after every write succeeded, so a failed run never
/// leaves a partially updated catalog in place.
pub fn write_catalog(tables: &CatalogTables, out_dir: &Path) -> Result<(), BuildError> {
    let dir = out_dir.join(tables.kind().dir_name());
    fs::create_dir_all(&dir).map_err(|e| BuildError::io(&dir, e))?;

    let times_path = dir.join(TIMES_FILE);
    let times_tmp = times_path.with_extension("db.tmp");
    {
        let file = File::create(&times_tmp).map_err(|e| BuildError::io(&times_tmp, e))?;
        let mut writer = BufWriter::new(file);
        write_times(&mut writer, &tables.times)
            .and_then(|_| writer.flush())
            .map_err(|e| BuildError::io(&times_tmp, e))?;
    }

    let info_path = dir.join(INFO_FILE);
    let info_tmp = info_path.with_extension("db.tmp");
    write_table(&info_tmp, &tables.info_bytes())?;

    let series_path = dir.join(SERIES_FILE);
    let series_tmp = series_path.with_extension("db.tmp");
    write_table(&series_tmp, &tables.series_bytes())?;

    for (tmp, path) in [
        (times_tmp, times_path),
        (info_tmp, info_path),
        (series_tmp, series_path),
    ] {
        fs::rename(&tmp, &path).map_err(|e| BuildError::io(&path, e))?;
    }
    Ok(())
}

fn write_table(path: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    let file = File::create(path).map_err(|e| BuildError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| BuildError::io(path, e))
}

/// Streams a times table to a writer, one little-endian `i64` per record.
pub fn write_times<W: Write>(writer: &mut W, times: &[i64]) -> std::io::Result<()> {
    for &ts in times {
        writer.write_i64::<LittleEndian>(ts)?;
    }
    Ok(())
}
