// Test mocks and fixtures for the engine.
//
// - MockLookup (ContactLookup): HashMap-based id → ContactRecord, counts
//   requests, optional latency and scripted failures.
// - Catalog fixtures around the centre of France.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use annuaire_client::ContactRecord;
use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::enrichment::ContactLookup;
use crate::record::GeoRecord;
use crate::store::Catalog;

// ---------------------------------------------------------------------------
// Test constants
// ---------------------------------------------------------------------------

/// Geographic centre of mainland France, the map's initial view.
pub const CENTER_OF_FRANCE: (f64, f64) = (46.6033, 1.8883);
/// Bourges, roughly 65 km north-east of the centre.
pub const BOURGES: (f64, f64) = (47.0810, 2.3988);
/// Poitiers.
pub const POITIERS: (f64, f64) = (46.5802, 0.3404);

// ---------------------------------------------------------------------------
// MockLookup
// ---------------------------------------------------------------------------

/// HashMap-based directory. Unknown identifiers are absent from responses.
/// Builder pattern: `.on_contact()`, `.on_record()`, `.with_latency()`, `.fail_first()`, `.panic_first()`.
pub struct MockLookup {
    records: HashMap<String, ContactRecord>,
    latency: Option<Duration>,
    failures_left: AtomicUsize,
    panics_left: AtomicUsize,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<String>>>,
}

impl Default for MockLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLookup {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            latency: None,
            failures_left: AtomicUsize::new(0),
            panics_left: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on_contact(self, id: &str, phone: &str, email: &str) -> Self {
        self.on_record(
            id,
            ContactRecord {
                telephone: Some(phone.to_string()),
                telephone_administratif: None,
                email: Some(email.to_string()),
            },
        )
    }

    pub fn on_record(mut self, id: &str, record: ContactRecord) -> Self {
        self.records.insert(id.to_string(), record);
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The first `n` requests fail with a transport-style error.
    pub fn fail_first(self, n: usize) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    /// The first `n` requests panic inside the lookup.
    pub fn panic_first(self, n: usize) -> Self {
        self.panics_left.store(n, Ordering::SeqCst);
        self
    }

    /// Number of requests received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Identifier lists of every request received, in order.
    pub fn requests(&self) -> Vec<Vec<String>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactLookup for MockLookup {
    async fn lookup(&self, ids: &[String]) -> Result<HashMap<String, ContactRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(ids.to_vec());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let panicking = self
            .panics_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if panicking {
            panic!("directory client panicked");
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            bail!("connection reset by peer");
        }

        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id).map(|r| (id.clone(), r.clone())))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn record_at(category: &str, name: &str, (lat, lng): (f64, f64)) -> GeoRecord {
    GeoRecord::new(category).named(name).at(lat, lng)
}

/// Three categories, one record per place plus one without coordinates.
pub fn sample_catalog() -> Catalog {
    Catalog::from_records(vec![
        record_at("Musée", "Musée du Berry", BOURGES).with_id("241800507"),
        record_at("Bibliothèque", "Médiathèque de Châteauroux", CENTER_OF_FRANCE).with_id("243600327"),
        record_at("Musée", "Musée de l'Hospice Saint-Roch", CENTER_OF_FRANCE),
        record_at("Cinéma", "Le TAP Castille", POITIERS).with_id("200069854"),
        GeoRecord::new("Musée").named("Musée sans adresse"),
    ])
}

/// A GeoJSON point feature in the source dataset's property layout.
pub fn feature(category: &str, name: &str, id: Option<&str>, (lat, lng): (f64, f64)) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [lng, lat] },
        "properties": {
            "type_equipement_ou_lieu": category,
            "nom": name,
            "code_insee_epci": id,
        }
    })
}

pub fn feature_collection(features: Vec<Value>) -> Value {
    json!({ "type": "FeatureCollection", "features": features })
}
