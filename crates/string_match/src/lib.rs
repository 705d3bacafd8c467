//! Fuzzy matching of quick-open style queries against path-like strings.
//!
//! Query characters are aligned preferably on special characters (segment
//! starts, separators, camelCase humps). The result splits the candidate
//! into matched and unmatched ranges for highlighting and carries a
//! `match_goodness` score: higher is better.

mod match_list;
mod matcher;
mod score;
mod sort;
mod specials;

pub use matcher::StringMatcher;
pub use score::ScoreDebug;
pub use sort::{basic_match_sort, compare_ignore_case, multi_field_sort};
pub use specials::{SpecialCharacters, find_special_characters};

use match_list::{FoldedText, generate_match_list, whole_string_search};
use score::compute_ranges_and_score;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// A case-insensitive prefix match beats every other match and skips
    /// the search. Implies `segmented_search == false`.
    pub prefer_prefix_matches: bool,
    /// Search the last `/` segment first and boost matches in it.
    pub segmented_search: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringRange {
    pub text: String,
    pub matched: bool,
    pub includes_last_segment: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// The candidate string.
    pub label: String,
    pub match_goodness: f64,
    /// Concatenated, the range texts give back `label`.
    pub string_ranges: Vec<StringRange>,
    pub score_debug: ScoreDebug,
}

/// Matches `query` against `text`. `special` can carry a precomputed
/// [`find_special_characters`] result for `text`.
///
/// Returns `None` when the query cannot be aligned with the string.
pub fn string_match(
    text: &str,
    query: &str,
    options: &MatchOptions,
    special: Option<&SpecialCharacters>,
) -> Option<SearchResult> {
    if query.is_empty() {
        return Some(SearchResult {
            label: text.to_string(),
            match_goodness: 0.0,
            string_ranges: vec![StringRange {
                text: text.to_string(),
                matched: false,
                includes_last_segment: true,
            }],
            score_debug: ScoreDebug::default(),
        });
    }

    let folded_text = FoldedText::new(text);
    let folded_query = FoldedText::new(query);
    let text_chars = folded_text.folded();
    let query_chars = folded_query.folded();

    if options.prefer_prefix_matches
        && query_chars.len() <= text_chars.len()
        && text_chars.lower[..query_chars.len()] == *query_chars.lower
    {
        return Some(prefix_match_result(text, query));
    }

    let computed;
    let special = match special {
        Some(special) => special,
        None => {
            computed = find_special_characters(text);
            &computed
        }
    };

    let segmented = options.segmented_search && !options.prefer_prefix_matches;
    let (last_segment_start, match_list) = if segmented {
        (
            special.last_segment_start(),
            whole_string_search(
                query_chars,
                text_chars,
                &special.specials,
                special.last_segment_specials_index,
            ),
        )
    } else {
        (
            0,
            generate_match_list(query_chars, text_chars, &special.specials, 0),
        )
    };

    let scored = compute_ranges_and_score(&match_list?, text_chars.original, last_segment_start);
    Some(SearchResult {
        label: text.to_string(),
        match_goodness: scored.score,
        string_ranges: scored.ranges,
        score_debug: scored.debug,
    })
}

/// Result for a query that is a case-insensitive prefix of `text`. Scores
/// `f64::MAX`, halved when the case differs.
fn prefix_match_result(text: &str, query: &str) -> SearchResult {
    let split = text
        .char_indices()
        .nth(query.chars().count())
        .map_or(text.len(), |(at, _)| at);
    let (head, tail) = text.split_at(split);

    let mut match_goodness = f64::MAX;
    if head != query {
        match_goodness *= 0.5;
    }

    let mut string_ranges = vec![StringRange {
        text: head.to_string(),
        matched: true,
        includes_last_segment: true,
    }];
    if !tail.is_empty() {
        string_ranges.push(StringRange {
            text: tail.to_string(),
            matched: false,
            includes_last_segment: true,
        });
    }
    SearchResult {
        label: text.to_string(),
        match_goodness,
        string_ranges,
        score_debug: ScoreDebug {
            prefix: match_goodness,
            ..ScoreDebug::default()
        },
    }
}
