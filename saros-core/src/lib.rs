//! Shared foundation for the Saros eclipse catalog crates.
//!
//! Provides the eclipse kind and type-code tables that are part of the
//! catalog wire format, proleptic-Gregorian calendar conversion via Julian
//! day numbers (exact integer arithmetic, valid for BCE dates), and the
//! physical constants the integrity checks derive their thresholds from.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | [`EclipseKind`], [`SolarType`], [`LunarType`] and their fixed label ↔ code tables |
//! | [`julian`] | Unix timestamp ↔ proleptic Gregorian calendar conversion |
//! | [`constants`] | Saros period, series count, spacing thresholds |
//! | [`errors`] | [`DateError`] for calendar parsing |

pub mod constants;
pub mod errors;
pub mod julian;
pub mod types;

pub use errors::DateError;
pub use types::{EclipseKind, LunarType, SolarType};
