//! End to end: GeoJSON catalog → view → enrichment of visible records → export rows.

use std::sync::Arc;
use std::time::Duration;

use culturemap_common::{GeoPoint, UNAVAILABLE};
use culturemap_engine::testing::{feature, feature_collection, MockLookup, BOURGES, CENTER_OF_FRANCE, POITIERS};
use culturemap_engine::{export_rows, Catalog, CatalogView, EnrichmentCache, FilterChange};

fn catalog() -> Arc<Catalog> {
    let raw = feature_collection(vec![
        feature("Musée", "Musée du Berry", Some("241800507"), BOURGES),
        feature("Bibliothèque", "Médiathèque Équinoxe", Some("243600327"), CENTER_OF_FRANCE),
        feature("Musée", "Musée Bertrand", None, CENTER_OF_FRANCE),
        feature("Cinéma", "Le Dietrich", Some("200069854"), POITIERS),
    ]);
    Arc::new(Catalog::load(&raw).unwrap())
}

#[tokio::test]
async fn visible_records_are_enriched_and_exported() {
    let mock = Arc::new(
        MockLookup::new()
            .on_contact("241800507", "02 48 70 41 92", "musees@ville-bourges.fr")
            .on_contact("243600327", "02 54 08 35 35", "equinoxe@chateauroux-metropole.fr"),
    );
    let cache = EnrichmentCache::new(Arc::clone(&mock));
    let mut view = CatalogView::new(catalog());

    view.apply(FilterChange::SelectCategories(vec!["Musée".into(), "Bibliothèque".into()]));
    let visible = view.apply(FilterChange::SetRadius(100.0));
    assert_eq!(visible.len(), 3);

    let contacts = cache.resolve_records(&visible).await;
    assert_eq!(contacts[0].phone, "02 48 70 41 92");
    assert_eq!(contacts[1].email, "equinoxe@chateauroux-metropole.fr");
    assert!(contacts[2].is_unavailable());

    // One batched request for the two identified records; the third has no id.
    assert_eq!(mock.calls(), 1);
    assert_eq!(cache.len(), 2);

    let rows = export_rows(&view.visible());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].phone, "02 48 70 41 92");
    assert_eq!(rows[2].identifier, "non disponible");
    assert_eq!(rows[2].email, UNAVAILABLE);
}

#[tokio::test]
async fn records_without_identifier_never_reach_the_cache() {
    let mock = Arc::new(MockLookup::new());
    let cache = EnrichmentCache::new(Arc::clone(&mock));
    let catalog = catalog();

    let anonymous = &catalog.records()[2];
    assert!(anonymous.id.is_none());

    for _ in 0..3 {
        let details = cache.resolve_record(anonymous).await;
        assert_eq!(details.phone, UNAVAILABLE);
        assert_eq!(details.email, UNAVAILABLE);
    }
    assert_eq!(mock.calls(), 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn failed_lookup_does_not_break_later_resolves() {
    let mock = Arc::new(
        MockLookup::new()
            .on_contact("200069854", "05 49 39 29 29", "contact@tap-poitiers.com")
            .with_latency(Duration::from_millis(20))
            .fail_first(1),
    );
    let cache = EnrichmentCache::new(Arc::clone(&mock));

    let (a, b) = tokio::join!(
        cache.resolve_wait(Some("200069854")),
        cache.resolve_wait(Some("200069854"))
    );
    assert!(a.is_unavailable());
    assert!(b.is_unavailable());
    assert_eq!(mock.calls(), 1);

    let retried = cache.resolve_wait(Some("200069854")).await;
    assert_eq!(retried.email, "contact@tap-poitiers.com");
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn late_response_is_applied_after_caller_moves_on() {
    let mock = Arc::new(
        MockLookup::new()
            .on_contact("243600327", "02 54 08 35 35", "equinoxe@chateauroux-metropole.fr")
            .with_latency(Duration::from_millis(20)),
    );
    let cache = EnrichmentCache::new(Arc::clone(&mock));
    let mut view = CatalogView::new(catalog());
    view.apply(FilterChange::SelectCategories(vec!["Bibliothèque".into()]));

    // Display event starts a lookup, then the user pans away before it lands.
    let pending = cache.resolve(Some("243600327"));
    assert!(pending.is_pending());
    drop(pending);
    let shown = view.apply(FilterChange::SetReferencePoint(GeoPoint::new(43.2965, 5.3698)));
    assert!(shown.is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        cache.get("243600327").map(|c| c.phone),
        Some("02 54 08 35 35".to_string())
    );
    assert_eq!(mock.calls(), 1);
}
