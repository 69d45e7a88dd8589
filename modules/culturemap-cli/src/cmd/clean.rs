use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use culturemap_common::FileConfig;
use culturemap_engine::prune_properties;

#[derive(Args)]
pub struct CleanArgs {
    /// Source GeoJSON FeatureCollection
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the cleaned collection
    #[arg(long)]
    pub output: PathBuf,

    /// Property to keep (repeatable). Defaults to the config's keep list.
    #[arg(long = "keep")]
    pub keep: Vec<String>,
}

pub fn run(args: CleanArgs, file_config: &FileConfig) -> Result<()> {
    let keep: &[String] = if args.keep.is_empty() {
        &file_config.clean.keep_fields
    } else {
        &args.keep
    };

    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("File not found: {}", args.input.display()))?;
    let mut collection: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON format in file: {}", args.input.display()))?;

    let touched = prune_properties(&mut collection, keep)?;

    let cleaned = serde_json::to_string_pretty(&collection)?;
    std::fs::write(&args.output, cleaned)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    tracing::info!(
        features = touched,
        output = %args.output.display(),
        "Cleaned GeoJSON file has been created"
    );
    Ok(())
}
