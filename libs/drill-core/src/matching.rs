//! Answer normalization and comparison for typed drills.

/// Normalize a term: trim, collapse inner whitespace, lower-case.
pub fn normalize_term(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Compare a typed answer with the target word, ignoring case and
/// surrounding whitespace.
pub fn answers_match(typed: &str, target: &str) -> bool {
    normalize_term(typed) == normalize_term(target)
}

/// Whether `prefix` is a case-insensitive prefix of `target`.
pub fn is_prefix_of(prefix: &str, target: &str) -> bool {
    let target = target.trim().to_lowercase();
    target.starts_with(&prefix.to_lowercase())
}
