//! Per-record filter predicates.
//!
//! Pure functions, no I/O. The two predicates short-circuit differently:
//! an empty category selection excludes everything, while a missing
//! reference point (or a non-positive radius) disables the distance check.

use std::collections::HashSet;

use culturemap_common::GeoPoint;

use crate::record::GeoRecord;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// True iff the selection is non-empty and contains the record's category.
pub fn matches_category(record: &GeoRecord, selected: &HashSet<String>) -> bool {
    // Clearing every category empties the map. "No type filter" does not mean
    // "all types"; do not collapse this into a match-all.
    if selected.is_empty() {
        return false;
    }

    match record.category.as_deref() {
        Some(category) => selected.contains(category),
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Distance
// ---------------------------------------------------------------------------

/// Distance filtering is only active with a finite reference point and a positive radius.
pub fn distance_filter_active(reference: Option<&GeoPoint>, radius_km: f64) -> bool {
    matches!(reference, Some(p) if p.is_finite()) && radius_km > 0.0
}

/// Great-circle check of a record against a reference point.
///
/// Disabled (always true) when there is no reference point or `radius_km <= 0`.
/// When active, a record without a usable position never matches.
pub fn within_radius(record: &GeoRecord, reference: Option<&GeoPoint>, radius_km: f64) -> bool {
    let reference = match reference {
        Some(p) if distance_filter_active(Some(p), radius_km) => p,
        _ => return true,
    };

    match record.valid_position() {
        Some(position) => position.distance_meters(reference) <= radius_km * 1000.0,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: GeoPoint = GeoPoint {
        lat: 46.6033,
        lng: 1.8883,
    };

    fn selection(labels: &[&str]) -> HashSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_selection_matches_nothing() {
        let record = GeoRecord::new("Musée");
        assert!(!matches_category(&record, &HashSet::new()));
    }

    #[test]
    fn selection_membership() {
        let record = GeoRecord::new("Musée");
        assert!(matches_category(&record, &selection(&["Musée", "Cinéma"])));
        assert!(!matches_category(&record, &selection(&["Cinéma"])));
    }

    #[test]
    fn record_without_category_never_matches() {
        let mut record = GeoRecord::new("Musée");
        record.category = None;
        assert!(!matches_category(&record, &selection(&["Musée"])));
    }

    #[test]
    fn same_point_is_within_radius() {
        let record = GeoRecord::new("Musée").at(CENTER.lat, CENTER.lng);
        assert!(within_radius(&record, Some(&CENTER), 50.0));
    }

    #[test]
    fn sixty_km_north_is_outside_fifty() {
        // 0.54° of latitude ≈ 60 km.
        let record = GeoRecord::new("Musée").at(CENTER.lat + 0.54, CENTER.lng);
        assert!(!within_radius(&record, Some(&CENTER), 50.0));
        assert!(within_radius(&record, Some(&CENTER), 70.0));
    }

    #[test]
    fn missing_position_is_excluded_when_active() {
        let record = GeoRecord::new("Musée");
        assert!(!within_radius(&record, Some(&CENTER), 50.0));
        assert!(within_radius(&record, None, 50.0));
    }

    #[test]
    fn nan_position_is_excluded() {
        let record = GeoRecord::new("Musée").at(f64::NAN, CENTER.lng);
        assert!(!within_radius(&record, Some(&CENTER), 50.0));
    }

    #[test]
    fn non_positive_radius_disables_filter() {
        let far = GeoRecord::new("Musée").at(10.0, 10.0);
        assert!(within_radius(&far, Some(&CENTER), 0.0));
        assert!(within_radius(&far, Some(&CENTER), -5.0));
        assert!(within_radius(&far, Some(&CENTER), f64::NAN));
    }

    #[test]
    fn non_finite_reference_disables_filter() {
        let far = GeoRecord::new("Musée").at(10.0, 10.0);
        let broken = GeoPoint::new(f64::NAN, 1.0);
        assert!(within_radius(&far, Some(&broken), 50.0));
    }

    #[test]
    fn meters_and_kilometers_agree() {
        let record = GeoRecord::new("Musée").at(46.9, 2.1);
        let position = record.valid_position().unwrap();
        let km = culturemap_common::haversine_km(position.lat, position.lng, CENTER.lat, CENTER.lng);
        let radius_km = km + 1e-6;
        assert!(within_radius(&record, Some(&CENTER), radius_km));
        assert!(!within_radius(&record, Some(&CENTER), km - 1e-6));
    }
}
