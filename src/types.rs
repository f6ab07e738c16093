//! The building blocks of the book search index.
//!
//! These types define how canonical book records, their index-time snapshots,
//! and scored search results fit together.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **SearchableEntry**: immutable once created. A change to the underlying
//!   record means remove-then-reinsert, never a partial field update.
//! - **MatchKind**: closed enumeration with a fixed priority order
//!   (ISBN > Title > Author > Subject). The final kind of a result is a pure
//!   function of which fields contributed score — there is no mutable
//!   "upgrade" state.
//! - **IndexMetadata**: schema version 1; a file with any other version is
//!   treated as absent, there is no migration path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::normalize::normalize;

/// Current schema version of the persisted index metadata.
pub const METADATA_VERSION: u32 = 1;

/// A canonical book record, as handed out by the record store.
///
/// This crate never mutates these; it only derives [`SearchableEntry`]
/// snapshots from them at index time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn10: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn13: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub date_added: DateTime<Utc>,
}

/// A derived, read-only snapshot of one book record, computed at index time.
///
/// Raw and normalized forms are both kept: the raw fields feed result display,
/// the normalized fields are what the token indices were built from — removal
/// re-derives the exact same tokens from them.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchableEntry {
    pub id: Uuid,
    pub title: String,
    pub normalized_title: String,
    pub authors: Vec<String>,
    pub normalized_authors: Vec<String>,
    /// Normalized 10-digit ISBN, ready for exact lookup.
    pub isbn10: Option<String>,
    /// Normalized 13-digit ISBN, ready for exact lookup.
    pub isbn13: Option<String>,
    pub subjects: Vec<String>,
    pub normalized_subjects: Vec<String>,
    /// Used only as a sort tie-break (newest first).
    pub date_added: DateTime<Utc>,
}

impl From<&BookRecord> for SearchableEntry {
    fn from(record: &BookRecord) -> Self {
        let normalize_isbn = |raw: &String| {
            let n = normalize(raw);
            if n.is_empty() {
                None
            } else {
                Some(n)
            }
        };
        SearchableEntry {
            id: record.id,
            title: record.title.clone(),
            normalized_title: normalize(&record.title),
            authors: record.authors.clone(),
            normalized_authors: record.authors.iter().map(|a| normalize(a)).collect(),
            isbn10: record.isbn10.as_ref().and_then(normalize_isbn),
            isbn13: record.isbn13.as_ref().and_then(normalize_isbn),
            subjects: record.subjects.clone(),
            normalized_subjects: record.subjects.iter().map(|s| normalize(s)).collect(),
            date_added: record.date_added,
        }
    }
}

/// Which field class produced a match.
///
/// An exact ISBN hit wins outright; among token matches, title beats author
/// beats subject. `priority()` is the single source of truth for that order —
/// the derived trait impls exist only for maps and deterministic output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Isbn,
    Title,
    Author,
    Subject,
}

impl MatchKind {
    /// Priority for choosing a result's final kind: higher wins.
    #[inline]
    pub fn priority(self) -> u8 {
        match self {
            MatchKind::Isbn => 3,
            MatchKind::Title => 2,
            MatchKind::Author => 1,
            MatchKind::Subject => 0,
        }
    }

    /// Lowercase string form, matching the serde rename convention.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Isbn => "isbn",
            MatchKind::Title => "title",
            MatchKind::Author => "author",
            MatchKind::Subject => "subject",
        }
    }
}

/// A scored hit out of [`crate::SearchIndex::search`].
///
/// Carries the index-time snapshot; callers that need the live record resolve
/// `entry.id` against the canonical store.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub entry: SearchableEntry,
    pub score: f64,
    pub kind: MatchKind,
}

/// A fully resolved search result: live record plus score and match kind.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub record: BookRecord,
    pub score: f64,
    pub kind: MatchKind,
}

/// The small freshness document persisted across restarts.
///
/// Just enough to decide whether a rebuild is needed — never the index
/// itself, which is always rebuilt from the canonical store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    pub book_ids: HashSet<Uuid>,
    pub last_updated: DateTime<Utc>,
    pub version: u32,
}

impl IndexMetadata {
    pub fn new(book_ids: HashSet<Uuid>, last_updated: DateTime<Utc>) -> Self {
        IndexMetadata {
            book_ids,
            last_updated,
            version: METADATA_VERSION,
        }
    }
}

/// Snapshot of index freshness exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub count: usize,
    pub last_indexed_at: Option<DateTime<Utc>>,
}
