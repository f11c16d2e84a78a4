//! Fuzzy title and author matching.

pub mod similarity;

use std::collections::HashSet;

pub use similarity::ratio;

/// Default minimum ratio for two author names to be considered the same.
pub const DEFAULT_AUTHOR_THRESHOLD: f64 = 0.7;

/// Default minimum ratio for two titles to be considered the same.
pub const DEFAULT_TITLE_THRESHOLD: f64 = 0.8;

/// Splits an author name into lowercase word tokens without periods or commas.
///
/// `"J.K. Rowling"` becomes `["jk", "rowling"]` and `"Rowling, J. K."`
/// becomes `["rowling", "j", "k"]`.
pub fn normalize_name(name: &str) -> Vec<String> {
    name.to_lowercase()
        .replace(['.', ','], "")
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Returns true if any candidate names the same person as `query`.
///
/// A candidate matches when its token set equals the query's token set
/// (word order and punctuation ignored), or when the space-joined tokens
/// reach `threshold` on the similarity ratio. An empty candidate list never
/// matches.
pub fn author_matches<S: AsRef<str>>(query: &str, candidates: &[S], threshold: f64) -> bool {
    let query_parts = normalize_name(query);
    let query_set: HashSet<&str> = query_parts.iter().map(String::as_str).collect();
    let query_joined = query_parts.join(" ");

    candidates.iter().any(|candidate| {
        let parts = normalize_name(candidate.as_ref());
        let set: HashSet<&str> = parts.iter().map(String::as_str).collect();
        if set == query_set {
            return true;
        }

        ratio(&query_joined, &parts.join(" ")) >= threshold
    })
}

/// Returns true if two titles are similar enough, ignoring case.
pub fn title_similar(a: &str, b: &str, threshold: f64) -> bool {
    ratio(&casefold(a), &casefold(b)) >= threshold
}

/// Caseless form of a string for comparisons.
///
/// Lowercasing covers almost every script; the sharp s has no single-char
/// lowercase partner for its uppercase form and is expanded explicitly.
pub fn casefold(s: &str) -> String {
    s.to_lowercase().replace('ß', "ss")
}
