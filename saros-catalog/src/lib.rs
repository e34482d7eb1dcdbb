//! Binary Saros eclipse catalog: builder, integrity checks, and readers.
//!
//! One catalog per eclipse kind (solar or lunar) holds three parallel
//! fixed-width tables: sorted `i64` timestamps, 10-byte info records in the
//! same order, and a series index of 194-byte slots mapping each Saros
//! series to its members' global indices. The same bytes serve two access
//! models: loose files memory-mapped on the desktop, and generated static
//! arrays read heap-free on embedded targets.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`format`] | Record layouts, sentinel handling, encode/decode over byte buffers |
//! | [`build`] | Source-record loading, integrity checks, table construction, emission |
//! | [`query`] | Memory-mapped [`Catalog`](query::Catalog) reader and cross-kind merge |
//! | [`embedded`] | Allocation-free reader over borrowed byte slices |
//! | [`error`] | [`CatalogError`], [`BuildError`] |
//!
//! # Quick start
//!
//! ```ignore
//! use saros_catalog::query::SolarCatalog;
//!
//! let catalog = SolarCatalog::open("db/solar")?;
//! if let Some(next) = catalog.find_next(now) {
//!     let info = catalog.info(next.index).unwrap();
//!     println!("next solar eclipse: saros {}", info.saros_number);
//! }
//! ```
//!
//! Data flows one way: validated per-series records → [`build`] → binary
//! tables → [`query`] / [`embedded`] → consumer. A built catalog is
//! immutable; readers never synchronize.

pub mod build;
pub mod embedded;
pub mod error;
pub mod format;
pub mod query;

pub use error::{BuildError, CatalogError};
