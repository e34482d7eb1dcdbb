//! The 194-byte series-index slot.

use super::{SAROS_MAX_ECLIPSES, SERIES_RECORD_SIZE};

/// One series-index slot: the global indices of a Saros series' members,
/// in ascending time order.
///
/// The index array is fixed-capacity; entries at `count` and beyond are
/// zero on the wire and must never be read as indices (index 0 is a valid
/// global index). [`SeriesSlot::indices`] returns only the valid prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSlot {
    count: u8,
    entries: [u16; SAROS_MAX_ECLIPSES],
}

impl SeriesSlot {
    /// An empty slot, for series with no attested eclipses.
    pub fn empty() -> Self {
        Self {
            count: 0,
            entries: [0; SAROS_MAX_ECLIPSES],
        }
    }

    /// Builds a slot from member indices. Callers guarantee
    /// `indices.len() <= SAROS_MAX_ECLIPSES`; the builder enforces this
    /// with a fatal error before slots are constructed.
    pub fn from_indices(indices: &[u16]) -> Self {
        debug_assert!(indices.len() <= SAROS_MAX_ECLIPSES);
        let mut entries = [0u16; SAROS_MAX_ECLIPSES];
        entries[..indices.len()].copy_from_slice(indices);
        Self {
            count: indices.len() as u8,
            entries,
        }
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The valid prefix of the index array.
    pub fn indices(&self) -> &[u16] {
        &self.entries[..self.count as usize]
    }

    pub fn encode(&self, buf: &mut [u8; SERIES_RECORD_SIZE]) {
        buf[0] = self.count;
        buf[1] = 0;
        for (i, &idx) in self.entries.iter().enumerate() {
            buf[2 + 2 * i..4 + 2 * i].copy_from_slice(&idx.to_le_bytes());
        }
    }

    pub fn decode(buf: &[u8; SERIES_RECORD_SIZE]) -> Self {
        let count = buf[0].min(SAROS_MAX_ECLIPSES as u8);
        let mut entries = [0u16; SAROS_MAX_ECLIPSES];
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = u16::from_le_bytes([buf[2 + 2 * i], buf[3 + 2 * i]]);
        }
        Self { count, entries }
    }
}
