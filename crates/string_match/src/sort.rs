//! Ranking helpers for match results.

use crate::SearchResult;
use std::cmp::Ordering;

/// Stable sort on a list of comparators: the first one that does not report
/// `Equal` decides.
pub fn multi_field_sort<T>(items: &mut [T], comparators: &[&dyn Fn(&T, &T) -> Ordering]) {
    items.sort_by(|a, b| {
        comparators
            .iter()
            .map(|compare| compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}

pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Best matches first, then alphabetically (ignoring case) within equal
/// scores.
pub fn basic_match_sort(results: &mut [SearchResult]) {
    multi_field_sort(
        results,
        &[
            &|a: &SearchResult, b: &SearchResult| b.match_goodness.total_cmp(&a.match_goodness),
            &|a: &SearchResult, b: &SearchResult| compare_ignore_case(&a.label, &b.label),
        ],
    );
}
