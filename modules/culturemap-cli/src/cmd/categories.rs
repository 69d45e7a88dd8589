use std::path::Path;

use anyhow::Result;

use super::read_catalog;

pub fn run(catalog_path: &Path) -> Result<()> {
    let catalog = read_catalog(catalog_path)?;
    for label in catalog.categories().iter() {
        println!("{label}");
    }
    Ok(())
}
