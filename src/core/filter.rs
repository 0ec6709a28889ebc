// Museum - core/filter.rs
//
// Projection of a catalog through the search box text.
// Every token must match (AND). A token matches an entry when the title
// contains it, or a path component starts with it, or a tag starts with it.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::catalog::Catalog;
use crate::core::model::{Container, Entry};

/// Split filter text into lowercase search tokens.
///
/// Splits on single spaces and drops blank pieces, so runs of spaces and
/// all-whitespace input produce no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(' ')
        .filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Check one lowercase token against an entry.
pub fn matches_token<C: Container>(entry: &Entry<C>, token: &str) -> bool {
    entry.folded_title().contains(token)
        || entry.folded_path().iter().any(|c| c.starts_with(token))
        || entry.folded_tags().iter().any(|t| t.starts_with(token))
}

/// Filter entries, returning the indices of those that match every token.
///
/// Indices are ascending, so the result keeps catalog order. An empty or
/// blank filter returns every index.
pub fn apply_filter<C: Container>(entries: &[Entry<C>], filter_text: &str) -> Vec<usize> {
    let tokens = tokenize(filter_text);
    if tokens.is_empty() {
        return (0..entries.len()).collect();
    }

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| tokens.iter().all(|t| matches_token(entry, t)))
        .map(|(idx, _)| idx)
        .collect()
}

/// The visible subsequence of `catalog` for `filter_text`.
pub fn project<'a, C: Container>(catalog: &'a Catalog<C>, filter_text: &str) -> Vec<&'a Entry<C>> {
    apply_filter(catalog.entries(), filter_text)
        .into_iter()
        .filter_map(|idx| catalog.get(idx))
        .collect()
}
