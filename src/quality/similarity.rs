/*!
 * Similarity primitives used by the quality scorer.
 *
 * All functions are pure and return scores on a 0-100 scale:
 * - `edit_similarity`: normalized Levenshtein distance over characters
 * - `structural_similarity`: overlap of distinct word tokens
 * - `semantic_preserved`: synonym-group presence check
 */

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::keywords;

/// Everything that is not a letter, digit, combining mark or whitespace
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\p{M}\s]").expect("punctuation pattern is valid"));

/// Levenshtein distance between two strings, counted in characters
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let a_len = a_chars.len();
    let b_len = b_chars.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Two-row dynamic programming
    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row: Vec<usize> = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr_row[0] = i;

        for j in 1..=b_len {
            let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };

            curr_row[j] = (prev_row[j] + 1) // deletion
                .min(curr_row[j - 1] + 1) // insertion
                .min(prev_row[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}

/// Edit-distance similarity in [0, 100].
///
/// Two empty strings are identical (100).
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100.0;
    }

    let distance = levenshtein_distance(a, b);
    let score = 100.0 * (max_len - distance) as f64 / max_len as f64;
    score.clamp(0.0, 100.0)
}

/// Distinct word tokens of `text` after stripping punctuation
pub fn tokens(text: &str) -> HashSet<String> {
    PUNCTUATION
        .replace_all(text, "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Token-overlap similarity in [0, 100].
///
/// Counts distinct shared tokens against the larger token set. When neither
/// text has any token the result is 100, matching `edit_similarity("", "")`.
pub fn structural_similarity(a: &str, b: &str) -> f64 {
    let tokens_a = tokens(a);
    let tokens_b = tokens(b);

    let largest = tokens_a.len().max(tokens_b.len());
    if largest == 0 {
        return 100.0;
    }

    let shared = tokens_a.intersection(&tokens_b).count();
    100.0 * shared as f64 / largest as f64
}

/// Whether the meaning carried by `keyword` survives in `text`.
///
/// True when any member of the keyword's synonym group is a substring of
/// `text`; keywords without a group are checked literally.
pub fn semantic_preserved(keyword: &str, text: &str) -> bool {
    match keywords::synonym_group(keyword) {
        Some(group) => group.iter().any(|word| text.contains(word)),
        None => !keyword.is_empty() && text.contains(keyword),
    }
}
