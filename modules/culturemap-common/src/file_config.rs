use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::geo::GeoPoint;

/// TOML-backed configuration loaded from disk.
/// Endpoints and tokens stay as env vars.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub clean: CleanConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    #[serde(default = "default_center")]
    pub default_center: GeoPoint,
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: default_center(),
            default_radius_km: default_radius_km(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanConfig {
    #[serde(default = "default_keep_fields")]
    pub keep_fields: Vec<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            keep_fields: default_keep_fields(),
        }
    }
}

// Geographic centre of mainland France.
fn default_center() -> GeoPoint {
    GeoPoint::new(46.603354, 1.888334)
}

fn default_radius_km() -> f64 {
    50.0
}

fn default_keep_fields() -> Vec<String> {
    ["type_equipement_ou_lieu", "nom", "adresse_postale", "code_insee_epci"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}
