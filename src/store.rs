//! The canonical record store seam.
//!
//! The search engine never owns book records — it reads them from whatever
//! store the host application keeps them in, and never writes back. This
//! module defines that seam plus an in-process implementation that the CLI
//! demo and tests use.

use anyhow::Result;
use std::collections::HashMap;
use uuid::Uuid;

use crate::types::BookRecord;

/// Read-only access to the canonical book records.
///
/// Implementations are expected to be cheap to query; `fetch_by_ids` exists
/// so result resolution is a single batched lookup rather than one call per
/// hit.
pub trait BookStore {
    /// All records, ordered by `date_added` descending (newest first).
    fn fetch_all(&self) -> impl std::future::Future<Output = Result<Vec<BookRecord>>> + Send;

    /// Total number of records.
    fn fetch_count(&self) -> impl std::future::Future<Output = Result<usize>> + Send;

    /// The records for the given IDs, in no particular order. IDs that no
    /// longer exist are simply absent from the result.
    fn fetch_by_ids(
        &self,
        ids: &[Uuid],
    ) -> impl std::future::Future<Output = Result<Vec<BookRecord>>> + Send;
}

/// An in-process [`BookStore`] backed by a `HashMap`.
///
/// Ships in the library (not test-only) so embedders have a working store out
/// of the box; the CLI demo loads a JSON library file into one of these.
#[derive(Debug, Default, Clone)]
pub struct MemoryBookStore {
    records: HashMap<Uuid, BookRecord>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = BookRecord>) -> Self {
        MemoryBookStore {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    /// Insert or replace a record.
    pub fn upsert(&mut self, record: BookRecord) {
        self.records.insert(record.id, record);
    }

    /// Delete a record; no-op when absent.
    pub fn delete(&mut self, id: Uuid) {
        self.records.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl BookStore for MemoryBookStore {
    async fn fetch_all(&self) -> Result<Vec<BookRecord>> {
        let mut records: Vec<BookRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        Ok(records)
    }

    async fn fetch_count(&self) -> Result<usize> {
        Ok(self.records.len())
    }

    async fn fetch_by_ids(&self, ids: &[Uuid]) -> Result<Vec<BookRecord>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }
}
