//! Fixed-width binary layouts for the three catalog tables.
//!
//! Everything is little-endian with explicit byte offsets; encode and
//! decode are pure functions over byte buffers and never rely on struct
//! layout. Per kind, a catalog consists of:
//!
//! 1. **Times table** — `total × 8` bytes, sorted `i64` timestamps
//! 2. **Info table** — `total × 10` bytes, same order ([`SolarInfo`] /
//!    [`LunarInfo`] via the [`InfoCodec`] trait)
//! 3. **Series index** — one 194-byte [`SeriesSlot`] per covered Saros
//!    number: member count, pad byte, then 96 `u16` global indices with
//!    zeros beyond the count

mod info;
mod series;

pub use info::{InfoCodec, LunarCodec, LunarInfo, SolarCodec, SolarInfo};
pub use series::SeriesSlot;

/// Bytes per times-table record (one `i64`).
pub const TIME_RECORD_SIZE: usize = 8;

/// Bytes per info-table record, both kinds.
pub const INFO_RECORD_SIZE: usize = 10;

/// Fixed per-series member capacity. A slot always reserves this many
/// index entries; the count field demarcates the valid prefix.
pub const SAROS_MAX_ECLIPSES: usize = 96;

/// Bytes per series-index slot: count, pad, then the index array.
pub const SERIES_RECORD_SIZE: usize = 2 + 2 * SAROS_MAX_ECLIPSES;

/// Encoded value meaning "no duration recorded" for the optional `u16`
/// duration fields. Present values are clamped to `0..=0xFFFE` at encode
/// time so the sentinel is unambiguous.
pub const DURATION_SENTINEL: u16 = 0xFFFF;

const _: () = assert!(SERIES_RECORD_SIZE == 194);

pub fn read_time(buf: &[u8; TIME_RECORD_SIZE]) -> i64 {
    i64::from_le_bytes(*buf)
}

pub fn write_time(timestamp: i64, buf: &mut [u8; TIME_RECORD_SIZE]) {
    *buf = timestamp.to_le_bytes();
}

/// Encodes an optional duration, mapping `None` to the sentinel and
/// clamping present values below it.
pub(crate) fn encode_duration(value: Option<u16>) -> u16 {
    match value {
        Some(v) => v.min(DURATION_SENTINEL - 1),
        None => DURATION_SENTINEL,
    }
}

/// Inverse of [`encode_duration`]: the sentinel becomes `None` at the
/// decode boundary and never leaks into application logic.
pub(crate) fn decode_duration(raw: u16) -> Option<u16> {
    if raw == DURATION_SENTINEL {
        None
    } else {
        Some(raw)
    }
}
