//! The 10-byte info record, solar and lunar layouts.
//!
//! Both kinds share one record size but carry different fields. A catalog
//! is homogeneous in kind for its whole lifetime, so the layout choice is
//! a compile-time codec selection ([`SolarCodec`] / [`LunarCodec`]), not
//! per-record dispatch.

use super::{decode_duration, encode_duration, INFO_RECORD_SIZE};
use saros_core::{EclipseKind, LunarType, SolarType};

/// Encode/decode for one kind's 10-byte info layout.
pub trait InfoCodec {
    type Info;

    const KIND: EclipseKind;

    fn encode(info: &Self::Info, buf: &mut [u8; INFO_RECORD_SIZE]);
    fn decode(buf: &[u8; INFO_RECORD_SIZE]) -> Self::Info;
}

/// Decoded solar info record.
///
/// Layout (little-endian): `lat10:i16, lon10:i16, duration:u16,
/// saros_number:u8, saros_pos:u8, type_code:u8, sun_alt:u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarInfo {
    /// Latitude of greatest eclipse × 10 (e.g. 633 = 63.3°N).
    pub latitude_deg10: i16,
    /// Longitude of greatest eclipse × 10 (negative = west).
    pub longitude_deg10: i16,
    /// Central-eclipse duration in whole seconds; `None` for non-central
    /// eclipses (sentinel-encoded on the wire).
    pub central_duration: Option<u16>,
    /// Owning Saros series (1–180).
    pub saros_number: u8,
    /// Zero-based chronological rank within the series.
    pub saros_pos: u8,
    /// Raw wire type code; see [`SolarInfo::eclipse_type`].
    pub type_code: u8,
    /// Sun altitude at greatest eclipse, degrees.
    pub sun_alt: u8,
}

impl SolarInfo {
    pub fn latitude_deg(&self) -> f64 {
        f64::from(self.latitude_deg10) / 10.0
    }

    pub fn longitude_deg(&self) -> f64 {
        f64::from(self.longitude_deg10) / 10.0
    }

    /// The decoded type, or `None` when the code is outside the table this
    /// reader was built with (format-version skew degrades, not crashes).
    pub fn eclipse_type(&self) -> Option<SolarType> {
        SolarType::from_code(self.type_code)
    }
}

/// Decoded lunar info record.
///
/// Layout (little-endian): `pen:u16, par:u16, total:u16, saros_number:u8,
/// saros_pos:u8, type_code:u8, pad:u8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunarInfo {
    /// Penumbral phase duration in whole seconds, if any.
    pub pen_duration: Option<u16>,
    /// Partial phase duration in whole seconds, if any.
    pub par_duration: Option<u16>,
    /// Total phase duration in whole seconds, if any.
    pub total_duration: Option<u16>,
    pub saros_number: u8,
    pub saros_pos: u8,
    /// Raw wire type code; see [`LunarInfo::eclipse_type`].
    pub type_code: u8,
}

impl LunarInfo {
    pub fn eclipse_type(&self) -> Option<LunarType> {
        LunarType::from_code(self.type_code)
    }
}

/// Codec for the solar info layout.
#[derive(Debug)]
pub struct SolarCodec;

impl InfoCodec for SolarCodec {
    type Info = SolarInfo;

    const KIND: EclipseKind = EclipseKind::Solar;

    fn encode(info: &SolarInfo, buf: &mut [u8; INFO_RECORD_SIZE]) {
        buf[0..2].copy_from_slice(&info.latitude_deg10.to_le_bytes());
        buf[2..4].copy_from_slice(&info.longitude_deg10.to_le_bytes());
        buf[4..6].copy_from_slice(&encode_duration(info.central_duration).to_le_bytes());
        buf[6] = info.saros_number;
        buf[7] = info.saros_pos;
        buf[8] = info.type_code;
        buf[9] = info.sun_alt;
    }

    fn decode(buf: &[u8; INFO_RECORD_SIZE]) -> SolarInfo {
        SolarInfo {
            latitude_deg10: i16::from_le_bytes([buf[0], buf[1]]),
            longitude_deg10: i16::from_le_bytes([buf[2], buf[3]]),
            central_duration: decode_duration(u16::from_le_bytes([buf[4], buf[5]])),
            saros_number: buf[6],
            saros_pos: buf[7],
            type_code: buf[8],
            sun_alt: buf[9],
        }
    }
}

/// Codec for the lunar info layout.
#[derive(Debug)]
pub struct LunarCodec;

impl InfoCodec for LunarCodec {
    type Info = LunarInfo;

    const KIND: EclipseKind = EclipseKind::Lunar;

    fn encode(info: &LunarInfo, buf: &mut [u8; INFO_RECORD_SIZE]) {
        buf[0..2].copy_from_slice(&encode_duration(info.pen_duration).to_le_bytes());
        buf[2..4].copy_from_slice(&encode_duration(info.par_duration).to_le_bytes());
        buf[4..6].copy_from_slice(&encode_duration(info.total_duration).to_le_bytes());
        buf[6] = info.saros_number;
        buf[7] = info.saros_pos;
        buf[8] = info.type_code;
        buf[9] = 0;
    }

    fn decode(buf: &[u8; INFO_RECORD_SIZE]) -> LunarInfo {
        LunarInfo {
            pen_duration: decode_duration(u16::from_le_bytes([buf[0], buf[1]])),
            par_duration: decode_duration(u16::from_le_bytes([buf[2], buf[3]])),
            total_duration: decode_duration(u16::from_le_bytes([buf[4], buf[5]])),
            saros_number: buf[6],
            saros_pos: buf[7],
            type_code: buf[8],
        }
    }
}
