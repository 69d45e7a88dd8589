pub mod categories;
pub mod clean;
pub mod filter;

use std::path::Path;

use anyhow::{Context, Result};
use culturemap_engine::Catalog;

/// Read and parse a GeoJSON catalog from disk.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
    Catalog::parse(&text).with_context(|| format!("Failed to load catalog: {}", path.display()))
}
