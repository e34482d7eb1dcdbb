//! Eclipse kinds and the fixed type-code tables.
//!
//! The label ↔ integer mappings here are part of the catalog wire format:
//! the builder encodes a label to its table index and readers decode the
//! index back. The tables are compile-time constants and must never change
//! order — appending new codes at the end is the only compatible evolution.

use std::fmt;

/// The two independent catalog families. Solar and lunar catalogs share the
/// same table shapes but are never merged on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EclipseKind {
    Solar,
    Lunar,
}

impl EclipseKind {
    /// Directory name used for this kind's data and catalog files.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::Lunar => "lunar",
        }
    }

    /// Single-letter prefix used in exported listings (`S [T+]`, `L [Nb]`).
    pub fn prefix(self) -> char {
        match self {
            Self::Solar => 'S',
            Self::Lunar => 'L',
        }
    }

    /// Formats a raw type code as its label, or the bare number when the
    /// code is not in this kind's table.
    pub fn type_label(self, code: u8) -> String {
        let label = match self {
            Self::Solar => SolarType::from_code(code).map(SolarType::label),
            Self::Lunar => LunarType::from_code(code).map(LunarType::label),
        };
        match label {
            Some(l) => l.to_string(),
            None => code.to_string(),
        }
    }
}

impl fmt::Display for EclipseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Solar eclipse type, in wire-format code order.
///
/// Labels follow the NASA catalog notation: `A` annular, `H` hybrid,
/// `P` partial, `T` total, with suffixes for long/short/non-central and
/// series-boundary variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SolarType {
    A = 0,
    APlus = 1,
    AMinus = 2,
    Am = 3,
    An = 4,
    As = 5,
    H = 6,
    H2 = 7,
    H3 = 8,
    Hm = 9,
    P = 10,
    Pb = 11,
    Pe = 12,
    T = 13,
    TPlus = 14,
    TMinus = 15,
    Tm = 16,
    Tn = 17,
    Ts = 18,
}

const SOLAR_TYPES: [SolarType; SolarType::COUNT] = [
    SolarType::A,
    SolarType::APlus,
    SolarType::AMinus,
    SolarType::Am,
    SolarType::An,
    SolarType::As,
    SolarType::H,
    SolarType::H2,
    SolarType::H3,
    SolarType::Hm,
    SolarType::P,
    SolarType::Pb,
    SolarType::Pe,
    SolarType::T,
    SolarType::TPlus,
    SolarType::TMinus,
    SolarType::Tm,
    SolarType::Tn,
    SolarType::Ts,
];

const SOLAR_LABELS: [&str; SolarType::COUNT] = [
    "A", "A+", "A-", "Am", "An", "As", "H", "H2", "H3", "Hm", "P", "Pb", "Pe", "T", "T+", "T-",
    "Tm", "Tn", "Ts",
];

impl SolarType {
    pub const COUNT: usize = 19;

    /// The wire-format code for this type.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a wire-format code; `None` for codes outside the table.
    pub fn from_code(code: u8) -> Option<Self> {
        SOLAR_TYPES.get(code as usize).copied()
    }

    /// Looks up a catalog label such as `"T+"`; `None` for unknown labels.
    pub fn from_label(label: &str) -> Option<Self> {
        SOLAR_LABELS
            .iter()
            .position(|&l| l == label)
            .map(|i| SOLAR_TYPES[i])
    }

    pub fn label(self) -> &'static str {
        SOLAR_LABELS[self as usize]
    }
}

impl fmt::Display for SolarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lunar eclipse type, in wire-format code order.
///
/// `N` penumbral, `P` partial, `T` total, with the same suffix scheme as
/// the solar table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LunarType {
    N = 0,
    Nb = 1,
    Ne = 2,
    Nx = 3,
    P = 4,
    Pb = 5,
    Pe = 6,
    T = 7,
    TPlus = 8,
    TMinus = 9,
    Tm = 10,
    Tn = 11,
    Ts = 12,
}

const LUNAR_TYPES: [LunarType; LunarType::COUNT] = [
    LunarType::N,
    LunarType::Nb,
    LunarType::Ne,
    LunarType::Nx,
    LunarType::P,
    LunarType::Pb,
    LunarType::Pe,
    LunarType::T,
    LunarType::TPlus,
    LunarType::TMinus,
    LunarType::Tm,
    LunarType::Tn,
    LunarType::Ts,
];

const LUNAR_LABELS: [&str; LunarType::COUNT] = [
    "N", "Nb", "Ne", "Nx", "P", "Pb", "Pe", "T", "T+", "T-", "Tm", "Tn", "Ts",
];

impl LunarType {
    pub const COUNT: usize = 13;

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        LUNAR_TYPES.get(code as usize).copied()
    }

    pub fn from_label(label: &str) -> Option<Self> {
        LUNAR_LABELS
            .iter()
            .position(|&l| l == label)
            .map(|i| LUNAR_TYPES[i])
    }

    pub fn label(self) -> &'static str {
        LUNAR_LABELS[self as usize]
    }
}

impl fmt::Display for LunarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
