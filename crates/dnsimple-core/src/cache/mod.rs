// # Zone Record Cache
//
// Read-through cache of complete zone record sets, used in prefetch mode so
// that reading many records of one zone costs one paginated listing instead
// of one request per record.
//
// ## Invariant
//
// A zone is either absent (never hydrated, or hydration failed) or present
// with the complete record set as of its hydration. Partial sets are never
// stored.
//
// ## Locking
//
// One RwLock guards the whole map: lookups take the read lock, population
// takes the write lock. Network fetches happen outside the lock.
//
// ## Staleness
//
// Nothing is ever invalidated. A zone modified by another process after
// hydration is served stale for the rest of the cache's lifetime.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;
use crate::traits::{ZoneRecord, ZoneRecordListOptions, ZoneRecordSource};

/// Page size used for every hydration listing
pub const ZONE_RECORD_PAGE_SIZE: u32 = 100;

/// In-memory zone record cache
///
/// Cloning is cheap and yields a handle to the same cache. Construct one per
/// provider configuration and hand clones to every resource operation.
///
/// # Example
///
/// ```rust,no_run
/// use dnsimple_core::cache::ZoneRecordCache;
/// use dnsimple_core::traits::ZoneRecord;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = ZoneRecordCache::new();
///
///     cache
///         .set("example.com", vec![ZoneRecord::new(1, "example.com", "www", "A", "1.2.3.4")])
///         .await;
///
///     let record = cache.find("example.com", "www", "A", "1.2.3.4").await;
///     assert_eq!(record.map(|r| r.id), Some(1));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZoneRecordCache {
    inner: Arc<RwLock<HashMap<String, Vec<ZoneRecord>>>>,
}

impl ZoneRecordCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached records for a zone
    ///
    /// Never fetches. `None` means the zone has not been hydrated.
    pub async fn get(&self, zone: &str) -> Option<Vec<ZoneRecord>> {
        let guard = self.inner.read().await;
        guard.get(zone).cloned()
    }

    /// Replace the cached records for a zone wholesale
    pub async fn set(&self, zone: &str, records: Vec<ZoneRecord>) {
        let mut guard = self.inner.write().await;
        guard.insert(zone.to_string(), records);
    }

    /// Check whether a zone is cached
    pub async fn is_hydrated(&self, zone: &str) -> bool {
        self.inner.read().await.contains_key(zone)
    }

    /// Number of cached zones
    pub async fn zone_count(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Find the first record matching name, type and content exactly
    ///
    /// Returns `None` when the zone is not cached or nothing matches.
    pub async fn find(
        &self,
        zone: &str,
        name: &str,
        record_type: &str,
        content: &str,
    ) -> Option<ZoneRecord> {
        let guard = self.inner.read().await;
        guard
            .get(zone)?
            .iter()
            .find(|record| record.matches(name, record_type, content))
            .cloned()
    }

    /// Populate a zone from a paginated listing, unless already cached
    ///
    /// Pages are requested with a fixed page size of
    /// [`ZONE_RECORD_PAGE_SIZE`] starting at page 1. The walk stops once the
    /// requested page reaches the reported total, or when a page comes back
    /// empty. Only `sort` is taken from `options`: the name and type filters
    /// are cleared so that the cached set is always the whole zone.
    ///
    /// # Errors
    ///
    /// Any page failure aborts hydration and leaves the zone absent.
    pub async fn hydrate(
        &self,
        source: &dyn ZoneRecordSource,
        account: &str,
        zone: &str,
        options: &ZoneRecordListOptions,
    ) -> Result<()> {
        if self.is_hydrated(zone).await {
            debug!(zone, "Zone already cached, skipping hydration");
            return Ok(());
        }

        let mut options = ZoneRecordListOptions {
            sort: options.sort.clone(),
            ..ZoneRecordListOptions::default()
        }
        .with_per_page(ZONE_RECORD_PAGE_SIZE);
        let mut records = Vec::new();
        let mut requested = 1u32;

        loop {
            options.page = Some(requested);
            let page = source.list_zone_records(account, zone, &options).await?;

            let pagination = page.pagination;
            let fetched = page.records.len();
            records.extend(page.records);

            debug!(
                zone,
                page = requested,
                reported_page = pagination.current_page,
                total_pages = pagination.total_pages,
                records = records.len(),
                "Fetched zone record page"
            );

            // Server-reported current_page is not trusted to advance
            if fetched == 0 || requested >= pagination.total_pages {
                break;
            }
            requested += 1;
        }

        info!(zone, pages = requested, records = records.len(), "Hydrated zone record cache");

        let mut guard = self.inner.write().await;
        guard.entry(zone.to_string()).or_insert(records);
        Ok(())
    }
}
