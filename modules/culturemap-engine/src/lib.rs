pub mod clean;
pub mod enrichment;
pub mod export;
pub mod filter;
pub mod predicate;
pub mod record;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use clean::{prune_properties, DEFAULT_KEEP_FIELDS};
pub use enrichment::{ContactLookup, EnrichmentCache, PendingContact, Resolution};
pub use export::{export_rows, ExportRow};
pub use filter::{recompute, visible_indices, CatalogView, FilterChange, FilterState, DEFAULT_RADIUS_KM};
pub use predicate::{distance_filter_active, matches_category, within_radius};
pub use record::{DisplayFields, GeoRecord};
pub use store::{Catalog, Categories};
