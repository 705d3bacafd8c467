//! Turns a match list into highlight ranges and a score.

use crate::StringRange;
use crate::match_list::{Match, MatchKind};

pub const SPECIAL_POINTS: f64 = 40.0;
pub const MATCH_POINTS: f64 = 10.0;
pub const UPPER_CASE_MATCH: f64 = 100.0;
pub const CONSECUTIVE_MATCHES_POINTS: f64 = 8.0;
pub const BEGINNING_OF_NAME_POINTS: f64 = 13.0;
pub const LAST_SEGMENT_BOOST: f64 = 1.0;
pub const DEDUCTION_FOR_LENGTH: f64 = 0.2;
pub const NOT_STARTING_ON_SPECIAL_PENALTY: f64 = 25.0;

/// The parts a score was built from. They add up to the score.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreDebug {
    pub special: f64,
    pub match_points: f64,
    pub upper: f64,
    pub last_segment: f64,
    pub beginning: f64,
    pub length_deduction: f64,
    pub consecutive: f64,
    pub not_starting_on_special: f64,
    /// Score granted to a case-insensitive prefix match; zero otherwise.
    pub prefix: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RangesAndScore {
    pub(crate) ranges: Vec<StringRange>,
    pub(crate) score: f64,
    pub(crate) debug: ScoreDebug,
}

/// Splits `text` into alternating matched and unmatched ranges and scores
/// the matches. Points earned at or after `last_segment_start` are counted
/// again (times [`LAST_SEGMENT_BOOST`]) when their range closes.
pub(crate) fn compute_ranges_and_score(
    match_list: &[Match],
    text: &[char],
    last_segment_start: usize,
) -> RangesAndScore {
    let mut scorer = Scorer {
        text,
        last_segment_start,
        ranges: Vec::new(),
        current: None,
        current_started_on_special: false,
        last_match_index: -1,
        last_segment_score: 0.0,
        num_consecutive: 0,
        score: 0.0,
        debug: ScoreDebug::default(),
    };
    for &item in match_list {
        scorer.add_match(item);
    }
    scorer.close_range_gap(text.len());

    let length_penalty = -(text.len() as f64 * DEDUCTION_FOR_LENGTH).round();
    scorer.debug.length_deduction = length_penalty;
    RangesAndScore {
        ranges: scorer.ranges,
        score: scorer.score + length_penalty,
        debug: scorer.debug,
    }
}

struct Scorer<'a> {
    text: &'a [char],
    last_segment_start: usize,
    ranges: Vec<StringRange>,
    /// Matched range being extended.
    current: Option<StringRange>,
    current_started_on_special: bool,
    last_match_index: isize,
    last_segment_score: f64,
    num_consecutive: usize,
    score: f64,
    debug: ScoreDebug,
}

impl Scorer<'_> {
    /// Closes the current range and adds an unmatched range up to `c`.
    fn close_range_gap(&mut self, c: usize) {
        if let Some(mut range) = self.current.take() {
            range.includes_last_segment = self.last_match_index >= self.last_segment_start as isize;
            if range.matched && range.includes_last_segment {
                let boost = self.last_segment_score * LAST_SEGMENT_BOOST;
                self.debug.last_segment += boost;
                self.score += boost;
            }
            if range.matched && !self.current_started_on_special {
                self.debug.not_starting_on_special -= NOT_STARTING_ON_SPECIAL_PENALTY;
                self.score -= NOT_STARTING_ON_SPECIAL_PENALTY;
            }
            self.ranges.push(range);
        }

        let gap_start = (self.last_match_index + 1) as usize;
        if gap_start < c {
            self.ranges.push(StringRange {
                text: self.text[gap_start..c].iter().collect(),
                matched: false,
                includes_last_segment: c > self.last_segment_start,
            });
        }
        self.last_segment_score = 0.0;
    }

    fn add_match(&mut self, item: Match) {
        let c = item.index;
        let mut new_points = MATCH_POINTS;
        self.debug.match_points += MATCH_POINTS;

        if item.upper {
            self.debug.upper += UPPER_CASE_MATCH;
            new_points += UPPER_CASE_MATCH;
        }

        if c == self.last_segment_start {
            self.debug.beginning += BEGINNING_OF_NAME_POINTS;
            new_points += BEGINNING_OF_NAME_POINTS;
        }

        // `score > 0` rules out the initial `last_match_index` of -1.
        if self.score > 0.0 && self.last_match_index + 1 == c as isize {
            if c.checked_sub(self.num_consecutive) == Some(self.last_segment_start) {
                self.debug.beginning += BEGINNING_OF_NAME_POINTS;
                new_points += BEGINNING_OF_NAME_POINTS;
            }
            self.num_consecutive += 1;
            let mut boost = CONSECUTIVE_MATCHES_POINTS * self.num_consecutive as f64;
            if self.current_started_on_special {
                boost *= 2.0;
            }
            self.debug.consecutive += boost;
            new_points += boost;
        } else {
            self.num_consecutive = 1;
        }

        if item.kind == MatchKind::Special {
            self.debug.special += SPECIAL_POINTS;
            new_points += SPECIAL_POINTS;
        }

        self.score += new_points;
        if c >= self.last_segment_start {
            self.last_segment_score += new_points;
        }

        let current_unmatched = self.current.as_ref().is_some_and(|range| !range.matched);
        if current_unmatched || c as isize > self.last_match_index + 1 {
            self.close_range_gap(c);
        }
        self.last_match_index = c as isize;

        let ch = self.text.get(c).copied();
        match &mut self.current {
            Some(range) => range.text.extend(ch),
            None => {
                self.current = Some(StringRange {
                    text: ch.map(String::from).unwrap_or_default(),
                    matched: true,
                    includes_last_segment: false,
                });
                self.current_started_on_special = item.kind == MatchKind::Special;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_list::Match;

    const PATH: &str = "src/document/DocumentCommandHandler.js";

    fn range(text: &str, matched: bool, includes_last_segment: bool) -> StringRange {
        StringRange {
            text: text.to_string(),
            matched,
            includes_last_segment,
        }
    }

    fn compute(list: &[Match], text: &str, last_segment_start: usize) -> RangesAndScore {
        let chars: Vec<char> = text.chars().collect();
        compute_ranges_and_score(list, &chars, last_segment_start)
    }

    #[test]
    fn single_special_match() {
        let result = compute(&[Match::special(13)], PATH, 13);
        assert_eq!(
            result.ranges,
            vec![
                range("src/document/", false, false),
                range("D", true, true),
                range("ocumentCommandHandler.js", false, true),
            ]
        );
        // match + special + beginning, minus round(38 * 0.2). A match that
        // opens a range after a gap earns no last-segment boost.
        assert_eq!(result.score, 10.0 + 40.0 + 13.0 - 8.0);
        assert_eq!(result.debug.last_segment, 0.0);
    }

    #[test]
    fn consecutive_run_from_special() {
        let result = compute(&[Match::special(13), Match::normal(14)], PATH, 13);
        assert_eq!(
            result.ranges,
            vec![
                range("src/document/", false, false),
                range("Do", true, true),
                range("cumentCommandHandler.js", false, true),
            ]
        );
        assert_eq!(result.debug.consecutive, 2.0 * CONSECUTIVE_MATCHES_POINTS * 2.0);
        assert_eq!(result.debug.beginning, 2.0 * BEGINNING_OF_NAME_POINTS);
        assert_eq!(result.debug.not_starting_on_special, 0.0);
    }

    #[test]
    fn run_not_starting_on_special_is_penalized() {
        let result = compute(&[Match::normal(1)], "abc", 0);
        assert_eq!(result.debug.not_starting_on_special, -NOT_STARTING_ON_SPECIAL_PENALTY);
        assert_eq!(
            result.ranges,
            vec![range("a", false, true), range("b", true, true), range("c", false, true)]
        );
    }

    #[test]
    fn parts_add_up_to_score() {
        let list = [Match::special(0), Match::normal(1), Match::special(4).upper()];
        let result = compute(&list, "abcdEfgh", 0);
        let d = result.debug;
        let sum = d.special
            + d.match_points
            + d.upper
            + d.last_segment
            + d.beginning
            + d.length_deduction
            + d.consecutive
            + d.not_starting_on_special
            + d.prefix;
        assert_eq!(sum, result.score);
        assert_eq!(d.prefix, 0.0);
    }
}
