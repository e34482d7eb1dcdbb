//! Emits a catalog slice as a Rust source module of static byte arrays.
//!
//! The generated module is meant to be checked into a firmware crate and
//! fed to [`crate::embedded::EmbeddedCatalog`]: three `static [u8; N]`
//! tables plus the count and Saros-range constants the reader needs. The
//! byte content is identical to the loose-file tables.

use crate::build::CatalogTables;
use crate::error::BuildError;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Renders one kind's tables as Rust source. `label` distinguishes slices
/// of the same kind (for example `modern`); it becomes part of every
/// generated identifier.
pub fn render_module(tables: &CatalogTables, label: &str) -> String {
    let prefix = format!(
        "{}_{}",
        tables.kind().dir_name().to_uppercase(),
        label.to_uppercase()
    );
    let range = tables.range();
    let times = tables.times_bytes();
    let info = tables.info_bytes();
    let series = tables.series_bytes();
    let flash = times.len() + info.len() + series.len();

    let mut out = String::new();
    out.push_str("//! Auto-generated by `forge build --emit-embedded`. Do not edit.\n");
    out.push_str("//!\n");
    let _ = writeln!(out, "//! Saros range: {}..={}", range.first, range.last);
    let _ = writeln!(out, "//! Eclipses: {}", tables.len());
    let _ = writeln!(out, "//! Flash usage: {flash} bytes");
    out.push('\n');

    let _ = writeln!(
        out,
        "/// Number of eclipses in this slice.\npub const {prefix}_COUNT: usize = {};",
        tables.len()
    );
    let _ = writeln!(
        out,
        "pub const {prefix}_SAROS_FIRST: u8 = {};",
        range.first
    );
    let _ = writeln!(out, "pub const {prefix}_SAROS_LAST: u8 = {};", range.last);
    out.push('\n');

    render_array(&mut out, &format!("{prefix}_TIMES"), &times);
    out.push('\n');
    render_array(&mut out, &format!("{prefix}_INFO"), &info);
    out.push('\n');
    render_array(&mut out, &format!("{prefix}_SERIES"), &series);
    out
}

/// Writes the rendered module to `<out_dir>/<kind>_<label>.rs`.
pub fn write_module(
    tables: &CatalogTables,
    label: &str,
    out_dir: &Path,
) -> Result<PathBuf, BuildError> {
    let path = out_dir.join(format!("{}_{}.rs", tables.kind().dir_name(), label));
    fs::write(&path, render_module(tables, label)).map_err(|e| BuildError::io(&path, e))?;
    Ok(path)
}

fn render_array(out: &mut String, name: &str, bytes: &[u8]) {
    let _ = writeln!(out, "pub static {name}: [u8; {}] = [", bytes.len());
    for chunk in bytes.chunks(16) {
        out.push_str("    ");
        for byte in chunk {
            let _ = write!(out, "0x{byte:02x}, ");
        }
        // Trailing space before the newline reads poorly in diffs.
        out.pop();
        out.push('\n');
    }
    out.push_str("];\n");
}
