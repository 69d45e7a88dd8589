use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use annuaire_client::AnnuaireClient;
use culturemap_common::{Config, FileConfig, GeoPoint};
use culturemap_engine::{export_rows, CatalogView, EnrichmentCache, FilterChange, FilterState};
use nominatim_client::NominatimClient;

use super::read_catalog;

#[derive(Args)]
pub struct FilterArgs {
    /// GeoJSON FeatureCollection to read
    #[arg(long)]
    pub catalog: PathBuf,

    /// Category label to show (repeatable). With none selected nothing is shown.
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Select every category present in the catalog
    #[arg(long, conflicts_with = "categories")]
    pub all_categories: bool,

    /// Reference point latitude
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Reference point longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Free-text place used as the reference point
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub near: Option<String>,

    /// Use the configured map centre as the reference point
    #[arg(long, conflicts_with_all = ["lat", "lng", "near"])]
    pub around_default: bool,

    /// Radius in kilometers around the reference point
    #[arg(long)]
    pub radius: Option<f64>,

    /// Fetch contact details for the visible records
    #[arg(long)]
    pub enrich: bool,

    /// Write JSON lines here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: FilterArgs, config: &Config, file_config: &FileConfig) -> Result<()> {
    let catalog = Arc::new(read_catalog(&args.catalog)?);

    let state = FilterState::new().with_radius_km(file_config.map.default_radius_km);
    let mut view = CatalogView::with_state(Arc::clone(&catalog), state);

    let selection = if args.all_categories {
        catalog.categories().iter().map(String::from).collect()
    } else {
        args.categories.clone()
    };
    for label in &selection {
        if !catalog.categories().contains(label) {
            warn!(label = %label, "Category not present in catalog");
        }
    }
    view.apply(FilterChange::SelectCategories(selection));

    if let Some(radius) = args.radius {
        view.apply(FilterChange::SetRadius(radius));
    }

    if let Some(point) = reference_point(&args, config, file_config).await? {
        view.apply(FilterChange::SetReferencePoint(point));
    }

    let visible = view.visible();
    info!(visible = visible.len(), total = catalog.len(), "Filter applied");

    if args.enrich {
        let client = AnnuaireClient::new(
            &config.annuaire_base_url,
            config.annuaire_token.as_deref(),
            config.http_timeout,
            &config.user_agent,
        )?;
        let cache = EnrichmentCache::new(client);
        cache.resolve_records(&visible).await;
        info!(cached = cache.len(), "Contact enrichment complete");
    }

    let rows = export_rows(&visible);
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            std::fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut out = BufWriter::new(sink);
    for row in &rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    Ok(())
}

/// Coordinates from the flags, the configured map centre, or a place search
/// when `--near` was given.
async fn reference_point(
    args: &FilterArgs,
    config: &Config,
    file_config: &FileConfig,
) -> Result<Option<GeoPoint>> {
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        return Ok(Some(GeoPoint::new(lat, lng)));
    }
    if args.around_default {
        return Ok(Some(file_config.map.default_center));
    }

    let Some(query) = args.near.as_deref() else {
        return Ok(None);
    };

    let client = NominatimClient::new(&config.nominatim_base_url, config.http_timeout, &config.user_agent)?;
    let place = client
        .search(query)
        .await
        .with_context(|| format!("Place search failed for '{query}'"))?
        .ok_or_else(|| anyhow::anyhow!("Location not found: '{query}'. Try a different search query."))?;

    info!(
        query,
        place = %place.display_name,
        lat = place.lat,
        lng = place.lng,
        "Reference point set from place search"
    );
    Ok(Some(GeoPoint::new(place.lat, place.lng)))
}
