//! Edit distance with a rolling two-row DP.
//!
//! The key insight: `|len(a) - len(b)|` is a lower bound on edit distance.
//! When the caller only accepts distances up to some budget, a length check
//! skips the O(nm) DP entirely for most non-matches.

/// Levenshtein edit distance between two strings, counted over code points.
///
/// Classic dynamic-programming formulation, but keeping only the previous row
/// instead of the full matrix. Unicode scalar values are the unit of edit:
/// normalization has already folded input to a simple lowercase form, so no
/// grapheme clustering is needed.
pub fn distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut dp: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, ac) in a_chars.iter().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        for (j, bc) in b_chars.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(ac != bc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
        }
    }

    dp[b_chars.len()]
}

/// Is the edit distance between `a` and `b` possibly within `max`?
///
/// Pure length check — a lower bound, never a false negative. Callers use it
/// to avoid the DP when two tokens can't be close enough to matter.
#[inline]
pub fn length_within(a: &str, b: &str, max: usize) -> bool {
    a.chars().count().abs_diff(b.chars().count()) <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_have_zero_distance() {
        assert_eq!(distance("gatsby", "gatsby"), 0);
        assert_eq!(distance("", ""), 0);
    }

    #[test]
    fn empty_versus_nonempty() {
        assert_eq!(distance("", "tolstoy"), 7);
        assert_eq!(distance("tolstoy", ""), 7);
    }

    #[test]
    fn single_edits() {
        assert_eq!(distance("hello", "hallo"), 1); // substitution
        assert_eq!(distance("hello", "hell"), 1); // deletion
        assert_eq!(distance("hello", "helloo"), 1); // insertion
    }

    #[test]
    fn classic_typo_pairs() {
        assert_eq!(distance("fitzgerald", "fitzgerld"), 1);
        assert_eq!(distance("kitten", "sitting"), 3);
        assert_eq!(distance("dostoevsky", "dostoyevsky"), 1);
    }

    #[test]
    fn counts_code_points_not_bytes() {
        // é is two bytes but one scalar value
        assert_eq!(distance("cafe", "café"), 1);
    }

    #[test]
    fn length_bound_is_sound() {
        assert!(length_within("abc", "abcd", 1));
        assert!(!length_within("a", "abcdef", 3));
        // Never rejects a pair whose true distance is within max
        assert!(length_within("kitten", "sitting", 3));
    }
}
