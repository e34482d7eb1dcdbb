//! Error types for catalog building and reading.
//!
//! [`BuildError`] variants are all fatal to a build: any of them would
//! silently corrupt the fixed-width contract readers depend on. Reader-side
//! [`CatalogError`] covers open-time validation; decode itself is
//! infallible by construction once the table sizes check out.

use saros_core::EclipseKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to open or validate a built catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A table file's size is not a whole number of records.
    #[error("{table} table is {len} bytes, not a multiple of {record_size}-byte records")]
    MisalignedTable {
        table: &'static str,
        len: usize,
        record_size: usize,
    },

    /// The times and info tables disagree on the eclipse count.
    #[error("info table holds {info_records} records but times table holds {time_records}")]
    TableCountMismatch {
        info_records: usize,
        time_records: usize,
    },

    /// The series index does not cover the expected number of slots.
    #[error("series index holds {slots} slots, expected {expected}")]
    SeriesSlotCount { slots: usize, expected: usize },

    /// An embedded slice's saros range is inverted or outside 1..=180.
    #[error("invalid saros range {first}..={last}")]
    InvalidSarosRange { first: u8, last: u8 },
}

/// Fatal failure while constructing a catalog from source records.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A type label with no entry in the kind's fixed table. Never encoded
    /// as a default: a drifted enumeration must fail the whole build.
    #[error("saros {saros_number} ({kind}): unmapped eclipse type label {label:?}")]
    UnknownTypeLabel {
        kind: EclipseKind,
        saros_number: u8,
        label: String,
    },

    /// A central-duration string that does not match the `MMmSSs` shape.
    #[error("saros {saros_number}: malformed duration {value:?}")]
    BadDuration { saros_number: u8, value: String },

    /// A record missing a field the kind's layout requires.
    #[error("saros {saros_number} ({kind}): record missing field {field:?}")]
    MissingField {
        kind: EclipseKind,
        saros_number: u8,
        field: &'static str,
    },

    /// A series longer than the fixed per-slot capacity.
    #[error("saros {saros_number} has {len} eclipses, capacity is {capacity}")]
    SeriesOverflow {
        saros_number: u8,
        len: usize,
        capacity: usize,
    },

    /// More eclipses than a u16 global index can address.
    #[error("catalog holds {total} eclipses, more than u16 indices can address")]
    TooManyEclipses { total: usize },
}

impl BuildError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
