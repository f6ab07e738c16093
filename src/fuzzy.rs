//! Tiered fuzzy matching between a query token and an index token.
//!
//! Four tiers, tried in order: exact, prefix, substring, edit distance.
//! Prefix and substring matches are common for type-ahead and deliberately
//! outrank edit-distance matches of similar character overlap; the similarity
//! floor bounds false positives on short tokens.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! ## TIER_DOMINANCE
//! For any token pair the tiers cannot leapfrog each other:
//!
//! ```text
//! Exact (100) > best Prefix (50) > best Substring (30) > best EditDistance (25)
//! ```
//!
//! The prefix/substring ratios are ≤ 1 and the edit-distance similarity is
//! ≤ 1, so the weights alone keep the ordering.
//!
//! ## SIMILARITY_FLOOR
//! Edit-distance matches require `1 - d/max_len >= 0.70`, *inclusive* at the
//! boundary. Tests pin the inclusive behavior; don't flip it to `>`.

use crate::levenshtein;

/// Score for an exact token match.
pub const EXACT_SCORE: f64 = 100.0;

/// Weight for a prefix match, scaled by the length ratio.
pub const PREFIX_WEIGHT: f64 = 50.0;

/// Weight for a substring match, scaled by the length ratio.
pub const SUBSTRING_WEIGHT: f64 = 30.0;

/// Weight for an edit-distance match, scaled by similarity.
pub const FUZZY_WEIGHT: f64 = 25.0;

/// Minimum edit-distance similarity for a match (inclusive).
pub const MIN_SIMILARITY: f64 = 0.70;

/// Score a query token against an index token.
///
/// Returns `None` when the tokens are not close enough to count as a match.
/// Both tokens are expected to be normalized already; lengths are measured in
/// code points.
///
/// - equal → 100
/// - `token` starts with `query` → `50 × (|query| / |token|)`
/// - `token` contains `query` → `30 × (|query| / |token|)`
/// - otherwise `similarity = 1 − distance/max(|query|, |token|)`;
///   `similarity ≥ 0.70` → `similarity × 25`
pub fn token_score(query: &str, token: &str) -> Option<f64> {
    if query.is_empty() || token.is_empty() {
        return None;
    }

    if query == token {
        return Some(EXACT_SCORE);
    }

    let query_len = query.chars().count();
    let token_len = token.chars().count();
    let ratio = query_len as f64 / token_len as f64;

    if token.starts_with(query) {
        return Some(PREFIX_WEIGHT * ratio);
    }
    if token.contains(query) {
        return Some(SUBSTRING_WEIGHT * ratio);
    }

    let max_len = query_len.max(token_len);
    // Length difference lower-bounds the distance; skip the DP when even the
    // best case lands under the similarity floor.
    let max_edits = (max_len as f64 * (1.0 - MIN_SIMILARITY)).floor() as usize;
    if !levenshtein::length_within(query, token, max_edits) {
        return None;
    }

    let dist = levenshtein::distance(query, token);
    let similarity = 1.0 - dist as f64 / max_len as f64;
    if similarity >= MIN_SIMILARITY {
        Some(similarity * FUZZY_WEIGHT)
    } else {
        None
    }
}
