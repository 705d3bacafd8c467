use crate::{MatchOptions, SearchResult, SpecialCharacters, find_special_characters, string_match};
use rustc_hash::{FxHashMap, FxHashSet};

/// [`string_match`] with caches, meant to live for the queries a user types
/// against one set of candidates.
///
/// Specials are cached per candidate for the matcher's lifetime. Candidates
/// that failed to match are remembered until the query stops extending the
/// previous one, since a longer query cannot match where a shorter one did
/// not.
#[derive(Debug, Default)]
pub struct StringMatcher {
    options: MatchOptions,
    last_query: Option<String>,
    specials_cache: FxHashMap<String, SpecialCharacters>,
    no_match_cache: FxHashSet<String>,
}

impl StringMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Clears both caches.
    pub fn reset(&mut self) {
        self.last_query = None;
        self.specials_cache.clear();
        self.no_match_cache.clear();
    }

    pub fn match_str(&mut self, text: &str, query: &str) -> Option<SearchResult> {
        if let Some(last) = &self.last_query
            && !query.starts_with(last.as_str())
        {
            log::trace!(
                target: "string_match",
                "query {query:?} does not extend {last:?}; dropping {} known misses",
                self.no_match_cache.len()
            );
            self.no_match_cache.clear();
        }
        if self.last_query.as_deref() != Some(query) {
            self.last_query = Some(query.to_string());
        }

        if self.no_match_cache.contains(text) {
            return None;
        }

        let special = self
            .specials_cache
            .entry(text.to_string())
            .or_insert_with(|| find_special_characters(text));
        let result = string_match(text, query, &self.options, Some(special));
        if result.is_none() {
            self.no_match_cache.insert(text.to_string());
        }
        result
    }

    pub fn has_cached_specials(&self, text: &str) -> bool {
        self.specials_cache.contains_key(text)
    }

    /// Whether `text` is known not to match the current query.
    pub fn is_known_miss(&self, text: &str) -> bool {
        self.no_match_cache.contains(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIVE: &str = "test/spec/LiveDevelopment-test.js";

    #[test]
    fn caches_follow_the_query() {
        let mut matcher = StringMatcher::default();
        assert!(!matcher.has_cached_specials(LIVE));

        assert!(matcher.match_str(LIVE, "spec/live").is_some());
        assert!(matcher.has_cached_specials(LIVE));
        assert!(!matcher.is_known_miss(LIVE));

        assert!(matcher.match_str("foo", "spec/live").is_none());
        assert!(matcher.has_cached_specials("foo"));
        assert!(matcher.is_known_miss("foo"));

        // A longer query keeps the known misses.
        matcher.match_str(LIVE, "spec/lived");
        assert!(matcher.is_known_miss("foo"));

        // A shorter one drops them, but not the specials.
        matcher.match_str(LIVE, "spec/liv");
        assert!(matcher.has_cached_specials("foo"));
        assert!(!matcher.is_known_miss("foo"));
    }

    #[test]
    fn known_misses_short_circuit() {
        let mut matcher = StringMatcher::default();
        assert!(matcher.match_str("toString", "t").is_some());
        assert!(matcher.match_str("toString", "x").is_none());
        assert!(matcher.match_str("toString", "xx").is_none());
        assert!(matcher.is_known_miss("toString"));
    }

    #[test]
    fn reset_clears_caches() {
        let mut matcher = StringMatcher::default();
        matcher.match_str("foo", "spec/live");
        matcher.reset();
        assert!(!matcher.has_cached_specials("foo"));
        assert!(!matcher.is_known_miss("foo"));
    }

    #[test]
    fn options_are_passed_through() {
        let mut matcher = StringMatcher::new(MatchOptions {
            prefer_prefix_matches: true,
            ..MatchOptions::default()
        });
        let result = matcher.match_str("stringTimeRing", "str").expect("prefix match");
        assert_eq!(result.string_ranges[0].text, "str");
        assert!(result.string_ranges[0].matched);

        let mut matcher = StringMatcher::new(MatchOptions {
            segmented_search: true,
            ..MatchOptions::default()
        });
        let result = matcher
            .match_str("brackets/utils/brackets.js", "brack")
            .expect("match");
        let texts: Vec<&str> = result.string_ranges.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["brackets/utils/", "brack", "ets.js"]);
    }
}
