//! Dump the resolved grid and catalog documents as JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::model::Catalog;
use crate::parser::catalog::to_document;
use crate::processor::ResolvedGrid;

pub const RESOLVED_FILE: &str = "resolved_grid.json";

pub fn emit(resolved: &ResolvedGrid, out_dir: &Path) -> io::Result<PathBuf> {
    let path = out_dir.join(RESOLVED_FILE);
    write_pretty(&path, resolved)?;
    Ok(path)
}

/// Write `catalog` back out in the authoring tool's format.
pub fn emit_catalog(catalog: &Catalog, path: &Path) -> io::Result<()> {
    write_pretty(path, &to_document(catalog))
}

fn write_pretty<T: serde::Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()
}
