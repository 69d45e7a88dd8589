//! Filter engine: the visible subset for a given filter state.
//!
//! `recompute` is a pure function of the catalog and the state. `CatalogView`
//! is the stateful wrapper the UI drives: each `FilterChange` updates the
//! state and rescans the whole catalog before returning.

use std::collections::HashSet;
use std::sync::Arc;

use culturemap_common::GeoPoint;
use tracing::debug;

use crate::predicate::{matches_category, within_radius};
use crate::record::GeoRecord;
use crate::store::Catalog;

/// Radius the distance slider starts at.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// The engine's working configuration. Not persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Empty means "show nothing".
    pub selected_categories: HashSet<String>,
    /// `None` disables distance filtering.
    pub reference_point: Option<GeoPoint>,
    pub radius_km: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_categories: HashSet::new(),
            reference_point: None,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_categories = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reference_point(mut self, point: GeoPoint) -> Self {
        self.reference_point = Some(point);
        self
    }

    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Both predicates hold for `record`.
    pub fn keeps(&self, record: &GeoRecord) -> bool {
        matches_category(record, &self.selected_categories)
            && within_radius(record, self.reference_point.as_ref(), self.radius_km)
    }
}

/// Records satisfying `state`, in catalog order.
pub fn recompute<'a>(records: &'a [GeoRecord], state: &FilterState) -> Vec<&'a GeoRecord> {
    records.iter().filter(|r| state.keeps(r)).collect()
}

/// Positions in `records` of the entries satisfying `state`, ascending.
pub fn visible_indices(records: &[GeoRecord], state: &FilterState) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| state.keeps(r))
        .map(|(i, _)| i)
        .collect()
}

/// A user-intent change to the filter state.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    /// A category checkbox was ticked or unticked.
    ToggleCategory { label: String, selected: bool },
    /// Replace the whole selection.
    SelectCategories(Vec<String>),
    ClearCategories,
    SetRadius(f64),
    /// Map click or place search result.
    SetReferencePoint(GeoPoint),
    ClearReferencePoint,
}

/// Filter state plus the visible subset it produces over a shared catalog.
pub struct CatalogView {
    catalog: Arc<Catalog>,
    state: FilterState,
    visible: Vec<usize>,
}

impl CatalogView {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_state(catalog, FilterState::default())
    }

    pub fn with_state(catalog: Arc<Catalog>, state: FilterState) -> Self {
        let visible = visible_indices(catalog.records(), &state);
        Self {
            catalog,
            state,
            visible,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Apply a change and recompute the visible subset in full.
    pub fn apply(&mut self, change: FilterChange) -> Vec<&GeoRecord> {
        match change {
            FilterChange::ToggleCategory { label, selected } => {
                if selected {
                    self.state.selected_categories.insert(label);
                } else {
                    self.state.selected_categories.remove(&label);
                }
            }
            FilterChange::SelectCategories(labels) => {
                self.state.selected_categories = labels.into_iter().collect();
            }
            FilterChange::ClearCategories => self.state.selected_categories.clear(),
            FilterChange::SetRadius(radius_km) => self.state.radius_km = radius_km,
            FilterChange::SetReferencePoint(point) => self.state.reference_point = Some(point),
            FilterChange::ClearReferencePoint => self.state.reference_point = None,
        }

        self.visible = visible_indices(self.catalog.records(), &self.state);
        debug!(
            visible = self.visible.len(),
            total = self.catalog.len(),
            categories = self.state.selected_categories.len(),
            radius_km = self.state.radius_km,
            "Filters recomputed"
        );

        self.visible()
    }

    /// The current visible subset, in catalog order.
    pub fn visible(&self) -> Vec<&GeoRecord> {
        let records = self.catalog.records();
        self.visible.iter().map(|&i| &records[i]).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }
}
