//! Text normalization for indexing and querying.
//!
//! Every string that enters the index — titles, author names, subjects, ISBNs
//! and queries alike — goes through [`normalize`] first, so matching happens
//! in a single canonical space: lowercase, diacritic-free, punctuation-free,
//! single-space separated.

use unicode_normalization::UnicodeNormalization;

/// Normalize a string for search: lowercase, strip diacritics, drop
/// punctuation, and collapse whitespace.
///
/// This is what lets fuzzy matching cross accent and punctuation boundaries:
/// - "Café" → "cafe"
/// - "F. Scott Fitzgerald" → "f scott fitzgerald"
/// - "978-0-7432-7356-5" → "9780743273565"
///
/// # Algorithm
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks (category Mn = Mark, Nonspacing)
/// 3. Lowercase
/// 4. Drop everything that is neither alphanumeric nor whitespace
/// 5. Collapse runs of whitespace into single spaces, trimming the ends
///
/// Total (never fails) and idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a normalized string into its index tokens.
///
/// Assumes `value` already went through [`normalize`], so splitting on
/// whitespace is all that's left to do. Empty tokens cannot occur.
pub fn tokens(value: &str) -> impl Iterator<Item = &str> {
    value.split_whitespace()
}

/// Check if a character is a combining mark (diacritic).
///
/// Combining marks have Unicode category "Mn" (Mark, Nonspacing).
/// Examples: ́ (acute), ̄ (macron), ̣ (dot below)
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}
