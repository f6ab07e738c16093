//! The coordinating service between the canonical record store and the index.
//!
//! A `SearchCoordinator` is the sole owner of a [`SearchIndex`] and its
//! [`IndexMetadataStore`]. It is an explicit instance — whoever needs search
//! owns one and passes it by handle; there is no process-wide singleton.
//!
//! # Concurrency model
//!
//! Single-writer, cooperative scheduling. All mutating operations and all
//! reads run on one logical task; there is no internal locking on index
//! structures. The only long-running operation, [`SearchCoordinator::rebuild_index`],
//! yields every few records so sibling tasks on the same executor are not
//! starved. A search issued mid-rebuild sees a partially rebuilt index; the
//! design accepts eventually-consistent results during rebuild.
//!
//! Indexing status (flag + fractional progress) is published through a cheap
//! atomic handle so those sibling tasks can poll it without touching the
//! coordinator itself.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::index::SearchIndex;
use crate::metadata::IndexMetadataStore;
use crate::store::BookStore;
use crate::types::{BookRecord, IndexMetadata, IndexStats, SearchResult};

/// How many records to index between cooperative yields during a rebuild.
const YIELD_EVERY: usize = 10;

/// Shared, lock-free view of an in-flight rebuild.
///
/// Progress is an `f64` in `[0.0, 1.0]` stored as raw bits; readers on other
/// cooperative tasks poll it while the coordinator indexes.
#[derive(Debug)]
pub struct IndexingStatus {
    indexing: AtomicBool,
    progress_bits: AtomicU64,
}

impl IndexingStatus {
    fn new() -> Self {
        IndexingStatus {
            indexing: AtomicBool::new(false),
            progress_bits: AtomicU64::new(0.0f64.to_bits()),
        }
    }

    /// Is a rebuild currently running?
    pub fn is_indexing(&self) -> bool {
        self.indexing.load(Ordering::Acquire)
    }

    /// Fractional rebuild progress in `[0.0, 1.0]`.
    ///
    /// Stays at its last value once the rebuild finishes.
    pub fn progress(&self) -> f64 {
        f64::from_bits(self.progress_bits.load(Ordering::Acquire))
    }

    fn set_progress(&self, progress: f64) {
        self.progress_bits
            .store(progress.to_bits(), Ordering::Release);
    }
}

/// Clears the indexing flag when dropped, so the success path and every
/// early-return error path leave the coordinator in the ready state. A failed
/// rebuild is not fatal — the index is simply partially populated until the
/// next rebuild.
struct IndexingGuard<'a> {
    status: &'a IndexingStatus,
}

impl<'a> IndexingGuard<'a> {
    fn begin(status: &'a IndexingStatus) -> Self {
        status.set_progress(0.0);
        status.indexing.store(true, Ordering::Release);
        IndexingGuard { status }
    }
}

impl Drop for IndexingGuard<'_> {
    fn drop(&mut self) {
        self.status.indexing.store(false, Ordering::Release);
    }
}

/// Mediates between the canonical record store and the search index: builds
/// and rebuilds, applies incremental mutations, resolves query results back
/// into live records, and persists freshness metadata across restarts.
#[derive(Debug)]
pub struct SearchCoordinator {
    index: SearchIndex,
    metadata_store: IndexMetadataStore,
    status: Arc<IndexingStatus>,
    last_indexed_at: Option<DateTime<Utc>>,
}

impl SearchCoordinator {
    /// A coordinator persisting metadata through the given store.
    ///
    /// Previously persisted metadata is loaded here, once, at startup; a
    /// missing or unreadable file just means no prior state.
    pub fn new(metadata_store: IndexMetadataStore) -> Self {
        let last_indexed_at = metadata_store.load().map(|meta| meta.last_updated);
        SearchCoordinator {
            index: SearchIndex::new(),
            metadata_store,
            status: Arc::new(IndexingStatus::new()),
            last_indexed_at,
        }
    }

    /// A coordinator using the per-application default metadata location.
    pub fn with_default_metadata_store() -> Self {
        Self::new(IndexMetadataStore::at_default_location())
    }

    /// Handle for polling rebuild status from other cooperative tasks.
    pub fn status_handle(&self) -> Arc<IndexingStatus> {
        Arc::clone(&self.status)
    }

    /// Does the index disagree with the store about how many records exist?
    ///
    /// Deliberately coarse: a record modified in place (same count) is not
    /// detected — the incremental [`SearchCoordinator::index_book`] /
    /// [`SearchCoordinator::remove_book`] calls adjacent to store mutations
    /// are what keep content in sync in the common case.
    pub async fn needs_reindexing<S: BookStore>(&self, store: &S) -> Result<bool> {
        let store_count = store.fetch_count().await?;
        Ok(self.index.count() != store_count)
    }

    /// Rebuild the index from scratch off the canonical store.
    ///
    /// Fetches all records (newest first), clears the index, and indexes
    /// sequentially, publishing fractional progress after each insertion and
    /// yielding every [`YIELD_EVERY`] records so the host stays responsive.
    /// On completion the freshness metadata is persisted, best-effort. An
    /// empty store still refreshes `last_updated` and persists.
    pub async fn rebuild_index<S: BookStore>(&mut self, store: &S) -> Result<()> {
        let guard = IndexingGuard::begin(&self.status);

        let records = store.fetch_all().await?;
        self.index.clear();

        let total = records.len();
        for (i, record) in records.iter().enumerate() {
            self.index.index_book(record);
            self.status.set_progress((i + 1) as f64 / total as f64);
            if (i + 1) % YIELD_EVERY == 0 {
                tokio::task::yield_now().await;
            }
        }
        self.status.set_progress(1.0);
        drop(guard);

        self.last_indexed_at = Some(Utc::now());
        self.persist_metadata_inline();
        Ok(())
    }

    /// Index one record incrementally, e.g. right after the host created or
    /// updated it in the store. Schedules a fire-and-forget metadata persist.
    pub fn index_book(&mut self, record: &BookRecord) {
        self.index.index_book(record);
        self.schedule_metadata_persist();
    }

    /// De-index one record incrementally, e.g. right after the host deleted
    /// it from the store. Schedules a fire-and-forget metadata persist.
    pub fn remove_book(&mut self, id: Uuid) {
        self.index.remove_book(id);
        self.schedule_metadata_persist();
    }

    /// Search the index and resolve hits back into live records.
    ///
    /// One batched `fetch_by_ids` lookup; rank order from the index is
    /// preserved. Hits whose record vanished from the store (deleted but not
    /// yet de-indexed) are silently dropped.
    pub async fn search<S: BookStore>(
        &self,
        query: &str,
        store: &S,
    ) -> Result<Vec<SearchResult>> {
        let hits = self.index.search(query);
        if hits.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = hits.iter().map(|h| h.entry.id).collect();
        let records = store.fetch_by_ids(&ids).await?;
        let by_id: std::collections::HashMap<Uuid, BookRecord> =
            records.into_iter().map(|r| (r.id, r)).collect();

        Ok(hits
            .into_iter()
            .filter_map(|hit| {
                let record = by_id.get(&hit.entry.id)?.clone();
                Some(SearchResult {
                    record,
                    score: hit.score,
                    kind: hit.kind,
                })
            })
            .collect())
    }

    /// Current index freshness.
    pub fn index_stats(&self) -> IndexStats {
        IndexStats {
            count: self.index.count(),
            last_indexed_at: self.last_indexed_at,
        }
    }

    /// Direct read access to the owned index.
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Drop the entire index and its persisted metadata.
    pub fn clear(&mut self) {
        self.index.clear();
        self.last_indexed_at = None;
        self.status.set_progress(0.0);
        if let Err(e) = self.metadata_store.clear() {
            tracing::warn!(error = %e, "failed to remove index metadata");
        }
    }

    fn current_metadata(&self) -> IndexMetadata {
        IndexMetadata::new(
            self.index.indexed_ids(),
            self.last_indexed_at.unwrap_or_else(Utc::now),
        )
    }

    /// Persist right here, still best-effort. Used at rebuild completion,
    /// where indexing work is already done and there is nothing to unblock.
    fn persist_metadata_inline(&self) {
        if let Err(e) = self.metadata_store.save(&self.current_metadata()) {
            tracing::warn!(error = %e, "failed to persist index metadata");
        }
    }

    /// Ship a metadata snapshot off to a blocking-pool task so incremental
    /// index maintenance never waits on disk. Without a runtime (plain sync
    /// callers) this degrades to an inline save.
    fn schedule_metadata_persist(&mut self) {
        self.last_indexed_at = Some(Utc::now());
        let metadata = self.current_metadata();
        let store = self.metadata_store.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    if let Err(e) = store.save(&metadata) {
                        tracing::warn!(error = %e, "failed to persist index metadata");
                    }
                });
            }
            Err(_) => {
                if let Err(e) = store.save(&metadata) {
                    tracing::warn!(error = %e, "failed to persist index metadata");
                }
            }
        }
    }
}
