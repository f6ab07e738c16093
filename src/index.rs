//! The in-memory multi-field inverted index.
//!
//! Four structures, all owned here: token indices for title, author and
//! subject (normalized token → set of record IDs), an exact ISBN map
//! (normalized ISBN → single record ID), and the entry map (record ID →
//! [`SearchableEntry`]) that makes removal and rebuild possible.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **NO_DANGLING_TOKENS**: every token key in a field index has a
//!    non-empty ID set, and at least one entry whose normalized field
//!    contains that token. Emptied sets are deleted immediately.
//! 2. **REMOVE_INVERTS_INSERT**: after `remove_book(id)` no structure
//!    references `id`; index state equals the pre-insertion state.
//! 3. **UPSERT**: `index_book` on an existing ID removes the old entry first,
//!    so indexing the same record twice is idempotent.
//!
//! # FIELD_WEIGHT_DOMINANCE
//!
//! Per-field weights applied to raw fuzzy scores:
//!
//! ```text
//! Title ×10 > Author ×8 > Subject ×3
//! ```
//!
//! An exact ISBN hit bypasses weighting entirely with a sentinel score above
//! any achievable fuzzy total, and short-circuits all other matching.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::fuzzy::token_score;
use crate::normalize::{normalize, tokens};
use crate::types::{BookRecord, MatchKind, SearchHit, SearchableEntry};

/// Weight multiplier for title token matches.
pub const TITLE_WEIGHT: f64 = 10.0;

/// Weight multiplier for author token matches.
pub const AUTHOR_WEIGHT: f64 = 8.0;

/// Weight multiplier for subject token matches.
pub const SUBJECT_WEIGHT: f64 = 3.0;

/// Sentinel score for an exact ISBN hit.
///
/// Sits above any fuzzy total a realistic query can accumulate (a single
/// exact title token is 100 × 10 = 1000). ISBN queries short-circuit token
/// matching entirely, so this never competes within one result list — it only
/// has to read as "maximal" to callers comparing across queries.
pub const ISBN_MATCH_SCORE: f64 = 10_000.0;

/// The in-memory search index over a book collection.
///
/// Single-writer by design: no internal locking, callers serialize access
/// through the coordinator that owns the instance.
#[derive(Debug, Default)]
pub struct SearchIndex {
    title_index: HashMap<String, HashSet<Uuid>>,
    author_index: HashMap<String, HashSet<Uuid>>,
    subject_index: HashMap<String, HashSet<Uuid>>,
    isbn_index: HashMap<String, Uuid>,
    entries: HashMap<Uuid, SearchableEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed entries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The indexed snapshot for a record, if present.
    pub fn entry(&self, id: Uuid) -> Option<&SearchableEntry> {
        self.entries.get(&id)
    }

    /// IDs of all indexed records.
    pub fn indexed_ids(&self) -> HashSet<Uuid> {
        self.entries.keys().copied().collect()
    }

    /// Index one book, replacing any previously indexed entry for its ID.
    ///
    /// Cannot fail: malformed input degrades to fewer (or zero) tokens, which
    /// simply means the record is harder to find.
    pub fn index_book(&mut self, record: &BookRecord) {
        self.remove_book(record.id);

        let entry = SearchableEntry::from(record);
        let id = entry.id;

        for token in tokens(&entry.normalized_title) {
            self.title_index
                .entry(token.to_string())
                .or_default()
                .insert(id);
        }
        for author in &entry.normalized_authors {
            for token in tokens(author) {
                self.author_index
                    .entry(token.to_string())
                    .or_default()
                    .insert(id);
            }
        }
        for subject in &entry.normalized_subjects {
            for token in tokens(subject) {
                self.subject_index
                    .entry(token.to_string())
                    .or_default()
                    .insert(id);
            }
        }
        // ISBNs are whole keys, never tokenized
        if let Some(isbn) = &entry.isbn10 {
            self.isbn_index.insert(isbn.clone(), id);
        }
        if let Some(isbn) = &entry.isbn13 {
            self.isbn_index.insert(isbn.clone(), id);
        }

        self.entries.insert(id, entry);
    }

    /// Remove a book from every index structure. No-op when absent.
    ///
    /// Exact inverse of [`SearchIndex::index_book`]: tokens are re-derived
    /// from the stored entry's normalized fields, and token keys whose ID set
    /// empties are deleted outright.
    pub fn remove_book(&mut self, id: Uuid) {
        let Some(entry) = self.entries.remove(&id) else {
            return;
        };

        for token in tokens(&entry.normalized_title) {
            remove_token(&mut self.title_index, token, id);
        }
        for author in &entry.normalized_authors {
            for token in tokens(author) {
                remove_token(&mut self.author_index, token, id);
            }
        }
        for subject in &entry.normalized_subjects {
            for token in tokens(subject) {
                remove_token(&mut self.subject_index, token, id);
            }
        }
        if let Some(isbn) = &entry.isbn10 {
            remove_isbn(&mut self.isbn_index, isbn, id);
        }
        if let Some(isbn) = &entry.isbn13 {
            remove_isbn(&mut self.isbn_index, isbn, id);
        }
    }

    /// Reset all index structures to empty.
    pub fn clear(&mut self) {
        self.title_index.clear();
        self.author_index.clear();
        self.subject_index.clear();
        self.isbn_index.clear();
        self.entries.clear();
    }

    /// Search the index with an arbitrary, possibly misspelled query.
    ///
    /// Never fails; an empty or unmatchable query returns an empty list.
    /// Results are ordered by total score descending, ties broken by
    /// `date_added` descending (newest first).
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let normalized = normalize(query);
        if normalized.is_empty() {
            return Vec::new();
        }

        // Exact ISBN wins outright and short-circuits token matching. The
        // whole normalized query is the key; hyphens already vanished.
        if let Some(&id) = self.isbn_index.get(&normalized) {
            return self
                .entries
                .get(&id)
                .map(|entry| SearchHit {
                    entry: entry.clone(),
                    score: ISBN_MATCH_SCORE,
                    kind: MatchKind::Isbn,
                })
                .into_iter()
                .collect();
        }

        let query_tokens: Vec<&str> = tokens(&normalized).collect();
        let mut totals: HashMap<Uuid, Scored> = HashMap::new();

        let fields: [(&HashMap<String, HashSet<Uuid>>, f64, MatchKind); 3] = [
            (&self.title_index, TITLE_WEIGHT, MatchKind::Title),
            (&self.author_index, AUTHOR_WEIGHT, MatchKind::Author),
            (&self.subject_index, SUBJECT_WEIGHT, MatchKind::Subject),
        ];

        for (field_index, weight, kind) in fields {
            for (stored_token, ids) in field_index {
                for query_token in &query_tokens {
                    let Some(raw) = token_score(query_token, stored_token) else {
                        continue;
                    };
                    for id in ids {
                        let scored = totals.entry(*id).or_default();
                        scored.score += raw * weight;
                        scored.upgrade(kind);
                    }
                }
            }
        }

        let mut hits: Vec<SearchHit> = totals
            .into_iter()
            .filter_map(|(id, scored)| {
                let entry = self.entries.get(&id)?;
                Some(SearchHit {
                    entry: entry.clone(),
                    score: scored.score,
                    kind: scored.kind?,
                })
            })
            .collect();

        hits.sort_by(compare_hits);
        hits
    }
}

/// Running per-record total while matching.
///
/// The final match kind is the highest-priority field class that contributed
/// any score — computed here as a max, not stored as mutable result state.
#[derive(Debug, Default)]
struct Scored {
    score: f64,
    kind: Option<MatchKind>,
}

impl Scored {
    fn upgrade(&mut self, kind: MatchKind) {
        match self.kind {
            Some(current) if current.priority() >= kind.priority() => {}
            _ => self.kind = Some(kind),
        }
    }
}

fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| b.entry.date_added.cmp(&a.entry.date_added))
}

fn remove_token(index: &mut HashMap<String, HashSet<Uuid>>, token: &str, id: Uuid) {
    if let Some(ids) = index.get_mut(token) {
        ids.remove(&id);
        if ids.is_empty() {
            index.remove(token);
        }
    }
}

fn remove_isbn(index: &mut HashMap<String, Uuid>, isbn: &str, id: Uuid) {
    // Guard against removing someone else's mapping if two records ever
    // claimed the same ISBN and the later insert won.
    if index.get(isbn) == Some(&id) {
        index.remove(isbn);
    }
}
