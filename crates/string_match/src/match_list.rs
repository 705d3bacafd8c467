//! Alignment of query characters against a candidate string.
//!
//! The search tries special characters first and falls back to scanning
//! character by character. When the rest of the query cannot be placed, it
//! backtracks: matches are popped until a special match is found whose
//! position is still before the known dead end for that query character, and
//! scanning resumes right after the previous match.
//!
//! `dead_branches[q]` is the last string index at which query character `q`
//! can still lead to a full match; past it the remainder of the query is
//! known not to fit.

/// A string as `char`s together with its per-char lowercase form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FoldedText {
    original: Vec<char>,
    lower: Vec<char>,
}

impl FoldedText {
    pub(crate) fn new(text: &str) -> Self {
        let original: Vec<char> = text.chars().collect();
        let lower = original.iter().map(|&c| lower_char(c)).collect();
        Self { original, lower }
    }

    pub(crate) fn folded(&self) -> Folded<'_> {
        Folded {
            original: &self.original,
            lower: &self.lower,
        }
    }

    fn extend(&mut self, other: Folded<'_>) {
        self.original.extend_from_slice(other.original);
        self.lower.extend_from_slice(other.lower);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.original.is_empty()
    }
}

/// Borrowed view of a [`FoldedText`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Folded<'a> {
    pub(crate) original: &'a [char],
    pub(crate) lower: &'a [char],
}

impl<'a> Folded<'a> {
    pub(crate) fn len(self) -> usize {
        self.original.len()
    }

    pub(crate) fn skip(self, n: usize) -> Folded<'a> {
        let n = n.min(self.len());
        Folded {
            original: &self.original[n..],
            lower: &self.lower[n..],
        }
    }

    pub(crate) fn take(self, n: usize) -> Folded<'a> {
        let n = n.min(self.len());
        Folded {
            original: &self.original[..n],
            lower: &self.lower[..n],
        }
    }
}

/// Lowercases one char without changing the length of the string.
fn lower_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MatchKind {
    Special,
    Normal,
}

/// One query character placed at char `index` of the candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Match {
    pub(crate) index: usize,
    pub(crate) kind: MatchKind,
    /// Query and candidate agree on an uppercase character.
    pub(crate) upper: bool,
}

#[cfg(test)]
impl Match {
    pub(crate) fn special(index: usize) -> Self {
        Self {
            index,
            kind: MatchKind::Special,
            upper: false,
        }
    }

    pub(crate) fn normal(index: usize) -> Self {
        Self {
            index,
            kind: MatchKind::Normal,
            upper: false,
        }
    }

    pub(crate) fn upper(mut self) -> Self {
        self.upper = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Specials,
    AnyChar,
}

struct MatchSearch<'a> {
    query: Folded<'a>,
    text: Folded<'a>,
    specials: &'a [usize],
    starting_special: usize,
    result: Vec<Match>,
    specials_counter: usize,
    str_counter: usize,
    query_counter: usize,
    dead_branches: Vec<isize>,
    mode: Mode,
}

impl MatchSearch<'_> {
    fn run(mut self) -> Option<Vec<Match>> {
        loop {
            while self.query_counter < self.query.len()
                && self.str_counter < self.text.len()
                && self.str_counter as isize <= self.dead_branches[self.query_counter]
            {
                if self.mode == Mode::Specials && !self.find_matching_special() {
                    self.mode = Mode::AnyChar;
                }
                if self.mode == Mode::AnyChar {
                    if self.query.lower[self.query_counter] == self.text.lower[self.str_counter] {
                        let upper = self.is_upper_match();
                        self.result.push(Match {
                            index: self.str_counter,
                            kind: MatchKind::Normal,
                            upper,
                        });
                        self.str_counter += 1;
                        self.query_counter += 1;
                        self.mode = Mode::Specials;
                    } else {
                        self.str_counter += 1;
                    }
                }
            }

            if self.query_counter >= self.query.len() || !self.backtrack() {
                break;
            }
        }

        if self.query_counter < self.query.len() || self.result.is_empty() {
            return None;
        }
        Some(self.result)
    }

    /// Looks for the current query character among the remaining specials.
    fn find_matching_special(&mut self) -> bool {
        let wanted = self.query.lower[self.query_counter];
        for i in self.specials_counter..self.specials.len() {
            let special = self.specials[i];
            if special as isize >= self.dead_branches[self.query_counter] {
                break;
            }
            if special < self.str_counter {
                self.specials_counter = i;
            } else if self.text.lower.get(special) == Some(&wanted) {
                self.str_counter = special;
                let upper = self.is_upper_match();
                self.result.push(Match {
                    index: special,
                    kind: MatchKind::Special,
                    upper,
                });
                self.specials_counter = i;
                self.query_counter += 1;
                self.str_counter += 1;
                return true;
            }
        }
        false
    }

    fn backtrack(&mut self) -> bool {
        while let Some(item) = self.result.pop() {
            self.query_counter -= 1;
            if item.kind != MatchKind::Special {
                continue;
            }
            self.specials_counter = self.specials_counter.saturating_sub(1);
            if (item.index as isize) < self.dead_branches[self.query_counter] {
                self.dead_branches[self.query_counter] = item.index as isize - 1;
                self.mode = Mode::AnyChar;
                self.str_counter = match self.result.last() {
                    Some(previous) => previous.index + 1,
                    None => self.specials[self.starting_special] + 1,
                };
                return true;
            }
        }
        false
    }

    fn is_upper_match(&self) -> bool {
        let original = self.text.original[self.str_counter];
        self.query.original[self.query_counter] == original
            && original != self.text.lower[self.str_counter]
    }
}

/// Aligns every character of `query` with `text`, starting at special
/// number `starting_special`. `None` when no alignment exists.
pub(crate) fn generate_match_list(
    query: Folded<'_>,
    text: Folded<'_>,
    specials: &[usize],
    starting_special: usize,
) -> Option<Vec<Match>> {
    let &start = specials.get(starting_special)?;
    MatchSearch {
        query,
        text,
        specials,
        starting_special,
        result: Vec::with_capacity(query.len()),
        specials_counter: starting_special,
        str_counter: start,
        query_counter: 0,
        dead_branches: vec![isize::MAX; query.len()],
        mode: Mode::Specials,
    }
    .run()
}

/// Best alignment inside the last segment, plus the leading query
/// characters that did not fit there.
#[derive(Debug)]
pub(crate) struct LastSegmentMatch {
    pub(crate) remainder: FoldedText,
    pub(crate) match_list: Vec<Match>,
}

/// Searches the segment starting at special number `starting_special`.
///
/// Query characters that cannot fit in the segment by length are set aside
/// first; then leading characters are dropped one at a time until the rest
/// aligns. With no segments (`starting_special == 0`) only the full query
/// is tried.
pub(crate) fn last_segment_search(
    query: Folded<'_>,
    text: Folded<'_>,
    specials: &[usize],
    starting_special: usize,
) -> Option<LastSegmentMatch> {
    let segment_start = *specials.get(starting_special)?;
    let extra = (segment_start + query.len()).saturating_sub(text.len());
    let mut remainder = FoldedText::default();
    remainder.extend(query.take(extra));
    let query = query.skip(extra);

    let mut skipped = 0;
    let mut found = None;
    while skipped < query.len() {
        found = generate_match_list(query.skip(skipped), text, specials, starting_special);
        if found.is_some() || starting_special == 0 {
            break;
        }
        skipped += 1;
    }

    let match_list = found?;
    remainder.extend(query.take(skipped));
    Some(LastSegmentMatch {
        remainder,
        match_list,
    })
}

/// Two-phase search: the last segment first, then whatever did not fit
/// against the text before it. Falls back to a plain search over the whole
/// string when nothing aligns in the last segment.
pub(crate) fn whole_string_search(
    query: Folded<'_>,
    text: Folded<'_>,
    specials: &[usize],
    last_segment_specials_index: usize,
) -> Option<Vec<Match>> {
    let Some(found) = last_segment_search(query, text, specials, last_segment_specials_index)
    else {
        return generate_match_list(query, text, specials, 0);
    };

    if found.remainder.is_empty() {
        return Some(found.match_list);
    }
    let last_segment_start = specials[last_segment_specials_index];
    let mut match_list = generate_match_list(
        found.remainder.folded(),
        text.take(last_segment_start),
        &specials[..last_segment_specials_index],
        0,
    )?;
    match_list.extend(found.match_list);
    Some(match_list)
}
