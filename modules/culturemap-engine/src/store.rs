//! Geo record store: the immutable catalog and the category labels it contains.
//!
//! The raw catalog is a GeoJSON `FeatureCollection`. Individual features are
//! never rejected: unusable coordinates become `position = None` and missing
//! labels become `category = None`, and the predicates exclude them later.

use std::collections::HashSet;

use culturemap_common::{CultureMapError, GeoPoint, Result};
use serde_json::Value;
use tracing::info;

use crate::record::{DisplayFields, GeoRecord};

const CATEGORY_FIELD: &str = "type_equipement_ou_lieu";
const NAME_FIELD: &str = "nom";
const ADDRESS_FIELD: &str = "adresse_postale";
const ID_FIELD: &str = "code_insee_epci";

/// Distinct category labels in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    labels: Vec<String>,
}

impl Categories {
    fn from_records(records: &[GeoRecord]) -> Self {
        let mut seen = HashSet::new();
        let labels = records
            .iter()
            .filter_map(|r| r.category.as_deref())
            .filter(|label| seen.insert(*label))
            .map(String::from)
            .collect();
        Self { labels }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn to_set(&self) -> HashSet<String> {
        self.labels.iter().cloned().collect()
    }
}

/// The full catalog, built once and never mutated apart from contact cells.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<GeoRecord>,
    categories: Categories,
}

impl Catalog {
    /// Build from already-parsed records, deriving the category set.
    pub fn from_records(records: Vec<GeoRecord>) -> Self {
        let categories = Categories::from_records(&records);
        Self {
            records,
            categories,
        }
    }

    /// Build from a GeoJSON `FeatureCollection`.
    pub fn load(raw: &Value) -> Result<Self> {
        let features = raw
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| CultureMapError::Catalog("expected a FeatureCollection with a `features` array".into()))?;

        let records: Vec<GeoRecord> = features.iter().map(record_from_feature).collect();
        let catalog = Self::from_records(records);

        let without_position = catalog.records.iter().filter(|r| r.position.is_none()).count();
        info!(
            records = catalog.records.len(),
            categories = catalog.categories.len(),
            without_position,
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Parse GeoJSON text and build the catalog.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(text)?;
        Self::load(&raw)
    }

    pub fn records(&self) -> &[GeoRecord] {
        &self.records
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn record_from_feature(feature: &Value) -> GeoRecord {
    let properties = feature.get("properties");
    let text = |key: &str| properties.and_then(|p| p.get(key)).and_then(value_as_text);

    let position = feature
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(parse_position);

    GeoRecord {
        id: text(ID_FIELD),
        category: text(CATEGORY_FIELD),
        position,
        display: DisplayFields::new(text(NAME_FIELD), text(ADDRESS_FIELD)),
    }
}

/// Strings and numbers become text; blanks, nulls and anything else are absent.
fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// GeoJSON positions are `[longitude, latitude, ...]`.
fn parse_position(coordinates: &Value) -> Option<GeoPoint> {
    let pair = coordinates.as_array()?;
    let lng = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    let point = GeoPoint::new(lat, lng);
    point.is_finite().then_some(point)
}
