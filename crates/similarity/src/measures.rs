//! The three independent similarity measures.
//!
//! Every measure is symmetric, bounded in `[0, 1]` and returns `0` when either
//! side is empty or whitespace-only. Lengths are counted in `char`s, not bytes.

use std::hash::Hash;

use fxhash::FxHashSet;

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// `1 - levenshtein(a, b) / max(len(a), len(b))`.
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    if is_blank(a) || is_blank(b) {
        return 0.0;
    }
    let longest = a.chars().count().max(b.chars().count());
    let distance = strsim::levenshtein(a, b);
    1.0 - distance as f64 / longest as f64
}

/// Jaccard index over whitespace-separated words.
pub fn jaccard_tokens(a: &str, b: &str) -> f64 {
    if is_blank(a) || is_blank(b) {
        return 0.0;
    }
    let left: FxHashSet<&str> = a.split_whitespace().collect();
    let right: FxHashSet<&str> = b.split_whitespace().collect();
    jaccard(&left, &right)
}

/// Jaccard index over character bigrams.
///
/// Bigrams span the whole string, spaces included, so word order contributes
/// a little. One-character strings have no bigrams; they score 1 against an
/// identical string and 0 otherwise.
pub fn jaccard_bigrams(a: &str, b: &str) -> f64 {
    if is_blank(a) || is_blank(b) {
        return 0.0;
    }
    let left = char_bigrams(a);
    let right = char_bigrams(b);
    if left.is_empty() && right.is_empty() {
        return if a == b { 1.0 } else { 0.0 };
    }
    jaccard(&left, &right)
}

fn char_bigrams(s: &str) -> FxHashSet<(char, char)> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|pair| (pair[0], pair[1])).collect()
}

fn jaccard<T: Eq + Hash>(left: &FxHashSet<T>, right: &FxHashSet<T>) -> f64 {
    let intersection = left.intersection(right).count();
    let union = left.len() + right.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
