//! Property-based tests using proptest.
//!
//! These exercise the normalization, scoring, and index maintenance
//! invariants against randomly generated inputs.

use chrono::{Duration, TimeZone, Utc};
use octavo::{normalize, token_score, BookRecord, SearchIndex};
use proptest::prelude::*;
use uuid::Uuid;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Random word-like strings.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{2,8}").unwrap()
}

/// Messy human text: mixed case, accents, punctuation, stray whitespace.
fn messy_text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9ÀàÉéÍíÑñÖöÜü .,'!?:-]{0,40}").unwrap()
}

fn record_strategy() -> impl Strategy<Value = BookRecord> {
    (
        prop::collection::vec(word_strategy(), 1..4),
        prop::collection::vec(word_strategy(), 0..3),
        prop::collection::vec(word_strategy(), 0..3),
        0i64..1000,
    )
        .prop_map(|(title_words, authors, subjects, offset_hours)| BookRecord {
            id: Uuid::new_v4(),
            title: title_words.join(" "),
            authors,
            isbn10: None,
            isbn13: None,
            subjects,
            date_added: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::hours(offset_hours),
        })
}

// ============================================================================
// NORMALIZATION PROPERTIES
// ============================================================================

proptest! {
    /// Normalizing twice never changes the result.
    #[test]
    fn prop_normalize_idempotent(raw in messy_text_strategy()) {
        let once = normalize(&raw);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Normalized output is lowercase alphanumerics separated by single
    /// spaces, with no leading or trailing space.
    #[test]
    fn prop_normalized_shape(raw in messy_text_strategy()) {
        let n = normalize(&raw);
        prop_assert!(!n.starts_with(' ') && !n.ends_with(' '));
        prop_assert!(!n.contains("  "));
        for c in n.chars() {
            prop_assert!(c.is_alphanumeric() || c == ' ');
            prop_assert!(!c.is_uppercase());
        }
    }
}

// ============================================================================
// SCORING PROPERTIES
// ============================================================================

proptest! {
    /// A token always matches itself with the maximal token score.
    #[test]
    fn prop_exact_self_match_is_maximal(token in word_strategy()) {
        prop_assert_eq!(token_score(&token, &token), Some(100.0));
    }

    /// Any produced score is positive and never exceeds the exact tier.
    #[test]
    fn prop_scores_are_bounded(query in word_strategy(), token in word_strategy()) {
        if let Some(score) = token_score(&query, &token) {
            prop_assert!(score > 0.0);
            prop_assert!(score <= 100.0);
        }
    }

    /// Non-exact matches always score strictly below an exact match.
    #[test]
    fn prop_exact_dominates(query in word_strategy(), token in word_strategy()) {
        if query != token {
            if let Some(score) = token_score(&query, &token) {
                prop_assert!(score < 100.0);
            }
        }
    }
}

// ============================================================================
// INDEX MAINTENANCE PROPERTIES
// ============================================================================

proptest! {
    /// Indexing then removing every record leaves the index empty.
    #[test]
    fn prop_remove_all_restores_empty(records in prop::collection::vec(record_strategy(), 1..8)) {
        let mut index = SearchIndex::new();
        for record in &records {
            index.index_book(record);
        }
        for record in &records {
            index.remove_book(record.id);
        }
        prop_assert_eq!(index.count(), 0);
        prop_assert!(index.is_empty());
        for record in &records {
            let first_word = record.title.split(' ').next().unwrap();
            prop_assert!(index.search(first_word).is_empty());
        }
    }

    /// Indexing the same record twice behaves like indexing it once.
    #[test]
    fn prop_indexing_is_idempotent(record in record_strategy()) {
        let mut once = SearchIndex::new();
        once.index_book(&record);
        let mut twice = SearchIndex::new();
        twice.index_book(&record);
        twice.index_book(&record);

        prop_assert_eq!(once.count(), twice.count());
        let first_word = record.title.split(' ').next().unwrap();
        let a = once.search(first_word);
        let b = twice.search(first_word);
        prop_assert_eq!(a.len(), b.len());
        if let (Some(x), Some(y)) = (a.first(), b.first()) {
            prop_assert_eq!(x.score, y.score);
        }
    }

    /// Results always come back sorted: score descending, then newest first.
    #[test]
    fn prop_results_are_sorted(
        records in prop::collection::vec(record_strategy(), 1..10),
        query in word_strategy(),
    ) {
        let mut index = SearchIndex::new();
        for record in &records {
            index.index_book(record);
        }
        let hits = index.search(&query);
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].entry.date_added >= pair[1].entry.date_added);
            }
        }
    }
}
