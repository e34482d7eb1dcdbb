//! Read-side API: memory-mapped catalogs and cross-kind queries.

pub mod catalog;
pub mod merge;

pub use catalog::{Catalog, EclipseRef, LunarCatalog, SolarCatalog};
pub use merge::{merge_events, EclipseEvent};
