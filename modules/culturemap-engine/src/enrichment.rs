//! Enrichment cache: organization identifier → contact details.
//!
//! Hits are served synchronously. A miss starts one lookup task per
//! identifier; callers arriving while it runs attach to the same shared
//! future instead of issuing another request. Successful results are written
//! to the cache before any waiter sees them. Failures are logged and leave no
//! entry behind, so the next request for that identifier tries again.
//!
//! Lookups run on spawned Tokio tasks: `resolve` and `prefetch` must be called
//! from within a Tokio runtime.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use annuaire_client::{AnnuaireClient, ContactRecord};
use anyhow::Result;
use async_trait::async_trait;
use culturemap_common::ContactDetails;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use crate::record::GeoRecord;

/// Identifiers sent in a single batched request.
const MAX_BATCH: usize = 50;

// ---------------------------------------------------------------------------
// ContactLookup: the remote directory seam
// ---------------------------------------------------------------------------

/// Remote contact directory. Implemented by `AnnuaireClient` and by test mocks.
#[async_trait]
pub trait ContactLookup: Send + Sync {
    /// Fetch contact records for the given identifiers. Unknown identifiers
    /// are absent from the returned map.
    async fn lookup(&self, ids: &[String]) -> Result<HashMap<String, ContactRecord>>;
}

#[async_trait]
impl ContactLookup for AnnuaireClient {
    async fn lookup(&self, ids: &[String]) -> Result<HashMap<String, ContactRecord>> {
        Ok(AnnuaireClient::lookup(self, ids).await?)
    }
}

#[async_trait]
impl<T: ContactLookup + ?Sized> ContactLookup for Arc<T> {
    async fn lookup(&self, ids: &[String]) -> Result<HashMap<String, ContactRecord>> {
        (**self).lookup(ids).await
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

type SharedLookup = Shared<BoxFuture<'static, Option<ContactDetails>>>;

/// Outcome of asking the cache for an identifier.
pub enum Resolution {
    /// Cached contact details.
    Ready(ContactDetails),
    /// A lookup is in flight; await it with [`PendingContact::wait`].
    Pending(PendingContact),
    /// The record has no identifier; nothing is looked up.
    NoIdentifier,
}

impl Resolution {
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending(_))
    }

    /// Details to display, waiting for the lookup if one is in flight.
    pub async fn into_details(self) -> ContactDetails {
        match self {
            Resolution::Ready(details) => details,
            Resolution::Pending(pending) => pending.wait().await,
            Resolution::NoIdentifier => ContactDetails::unavailable(),
        }
    }
}

/// Handle on an in-flight lookup, shared by every caller that missed on the same key.
pub struct PendingContact {
    id: String,
    lookup: SharedLookup,
}

impl PendingContact {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Completes once the cache has been updated. A failed lookup yields the
    /// "unavailable" pair.
    pub async fn wait(self) -> ContactDetails {
        self.lookup.await.unwrap_or_else(ContactDetails::unavailable)
    }

    async fn outcome(self) -> Option<ContactDetails> {
        self.lookup.await
    }
}

// ---------------------------------------------------------------------------
// EnrichmentCache
// ---------------------------------------------------------------------------

struct CacheInner {
    lookup: Arc<dyn ContactLookup>,
    entries: RwLock<HashMap<String, ContactDetails>>,
    in_flight: Mutex<HashMap<String, SharedLookup>>,
}

/// Contact cache owned by whoever owns the catalog. Cloning yields another
/// handle on the same cache. Create a fresh one when the catalog is reloaded.
#[derive(Clone)]
pub struct EnrichmentCache {
    inner: Arc<CacheInner>,
}

impl EnrichmentCache {
    pub fn new<L: ContactLookup + 'static>(lookup: L) -> Self {
        Self::from_arc(Arc::new(lookup))
    }

    pub fn from_arc(lookup: Arc<dyn ContactLookup>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                lookup,
                entries: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Cached details for `id`, without triggering a lookup.
    pub fn get(&self, id: &str) -> Option<ContactDetails> {
        self.inner
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_in_flight(&self, id: &str) -> bool {
        self.lock_in_flight().contains_key(id)
    }

    /// Serve a hit immediately, or start (or join) the lookup for a miss.
    pub fn resolve(&self, id: Option<&str>) -> Resolution {
        let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Resolution::NoIdentifier;
        };

        if let Some(hit) = self.get(id) {
            debug!(id, "Contact cache hit");
            return Resolution::Ready(hit);
        }

        let mut in_flight = self.lock_in_flight();
        // The lookup may have finished between the read above and taking the lock.
        if let Some(hit) = self.get(id) {
            return Resolution::Ready(hit);
        }

        let lookup = match in_flight.get(id) {
            Some(existing) => {
                debug!(id, "Joining in-flight contact lookup");
                existing.clone()
            }
            None => {
                let lookup = self.start_lookup(id);
                in_flight.insert(id.to_string(), lookup.clone());
                lookup
            }
        };

        Resolution::Pending(PendingContact {
            id: id.to_string(),
            lookup,
        })
    }

    /// Resolve and wait: the details to display for `id`.
    pub async fn resolve_wait(&self, id: Option<&str>) -> ContactDetails {
        self.resolve(id).into_details().await
    }

    /// Details to display for `record`. A successful lookup is also written
    /// into the record's contact cell.
    pub async fn resolve_record(&self, record: &GeoRecord) -> ContactDetails {
        if let Some(details) = record.display.contact() {
            return details.clone();
        }

        let found = match self.resolve(record.lookup_key()) {
            Resolution::Ready(details) => Some(details),
            Resolution::Pending(pending) => pending.outcome().await,
            Resolution::NoIdentifier => None,
        };

        match found {
            Some(details) => {
                record.display.set_contact(details.clone());
                details
            }
            None => ContactDetails::unavailable(),
        }
    }

    /// Start batched lookups for every identifier that is neither cached nor
    /// in flight, and wait for them (and for any already in flight). Returns
    /// how many of the awaited lookups succeeded.
    pub async fn prefetch<'a, I>(&self, ids: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut waiting = Vec::new();
        {
            let mut in_flight = self.lock_in_flight();
            let mut seen = HashSet::new();
            let misses: Vec<String> = ids
                .into_iter()
                .map(str::trim)
                .filter(|id| !id.is_empty() && seen.insert(*id))
                .filter(|id| self.get(id).is_none())
                .filter(|id| match in_flight.get(*id) {
                    Some(existing) => {
                        waiting.push(existing.clone());
                        false
                    }
                    None => true,
                })
                .map(String::from)
                .collect();

            for chunk in misses.chunks(MAX_BATCH) {
                let started = self.start_batch(chunk.to_vec());
                waiting.extend(started.values().cloned());
                in_flight.extend(started);
            }
        }

        let results = futures::future::join_all(waiting).await;
        results.iter().filter(|r| r.is_some()).count()
    }

    /// Resolve contact details for each record, batching the misses first.
    pub async fn resolve_records(&self, records: &[&GeoRecord]) -> Vec<ContactDetails> {
        self.prefetch(records.iter().filter_map(|r| r.lookup_key())).await;

        let mut details = Vec::with_capacity(records.len());
        for record in records {
            details.push(self.resolve_record(record).await);
        }
        details
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, SharedLookup>> {
        self.inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Single-identifier request, the shape every display event uses.
    fn start_lookup(&self, id: &str) -> SharedLookup {
        let mut started = self.start_batch(vec![id.to_string()]);
        match started.remove(id) {
            Some(lookup) => lookup,
            None => futures::future::ready(None).boxed().shared(),
        }
    }

    /// Spawn one lookup task for `keys` and hand back a shared future per key.
    /// The caller registers them as in flight while still holding the lock;
    /// the task removes them again after writing its results to the cache.
    fn start_batch(&self, keys: Vec<String>) -> HashMap<String, SharedLookup> {
        let inner = Arc::clone(&self.inner);
        let task_keys = keys.clone();

        let task = tokio::spawn(async move {
            // Released on every exit, including a panicking lookup.
            let release = InFlightRelease {
                inner: Arc::clone(&inner),
                keys: task_keys,
            };
            let found = fetch_contacts(inner.lookup.as_ref(), &release.keys).await;

            let mut entries = inner.entries.write().unwrap_or_else(PoisonError::into_inner);
            for (id, details) in &found {
                entries.insert(id.clone(), details.clone());
            }
            drop(entries);

            found
        });

        let batch = async move {
            match task.await {
                Ok(found) => Arc::new(found),
                Err(e) => {
                    warn!(error = %e, "Contact lookup task failed");
                    Arc::new(HashMap::new())
                }
            }
        }
        .boxed()
        .shared();

        keys.into_iter()
            .map(|id| {
                let batch = batch.clone();
                let key = id.clone();
                let per_key = async move { batch.await.get(&key).cloned() }.boxed().shared();
                (id, per_key)
            })
            .collect()
    }
}

/// Removes a batch's keys from the in-flight map when the lookup task ends.
/// Entries are written first, so a resolve racing the removal sees the hit.
struct InFlightRelease {
    inner: Arc<CacheInner>,
    keys: Vec<String>,
}

impl Drop for InFlightRelease {
    fn drop(&mut self) {
        let mut in_flight = self.inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        for id in &self.keys {
            in_flight.remove(id);
        }
    }
}

/// One request to the directory; every failure mode collapses to "not found".
async fn fetch_contacts(lookup: &dyn ContactLookup, ids: &[String]) -> HashMap<String, ContactDetails> {
    let mut response = match lookup.lookup(ids).await {
        Ok(response) => response,
        Err(e) => {
            warn!(ids = ids.len(), error = %e, "Contact lookup failed");
            return HashMap::new();
        }
    };

    let mut found = HashMap::with_capacity(ids.len());
    for id in ids {
        match response.remove(id) {
            Some(record) if record.has_contact() => {
                found.insert(id.clone(), contact_from_record(&record));
            }
            Some(_) => warn!(id = %id, "Directory entry has no contact fields"),
            None => warn!(id = %id, "Identifier missing from directory response"),
        }
    }
    found
}

/// Phone: main line, then administrative line. Email: the email field.
fn contact_from_record(record: &ContactRecord) -> ContactDetails {
    ContactDetails::from_parts(record.phone().map(String::from), record.email().map(String::from))
}
