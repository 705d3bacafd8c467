//! Special-character index of a candidate string.
//!
//! Special characters are the natural anchors of a path-like name:
//! - the first character;
//! - `/` and the character after it (the latter starts a new segment);
//! - `.`, `-`, `_` and the character after each, unless that character is a
//!   `/`, which is then handled as a separator of its own;
//! - an uppercase (or caseless) character directly after a lowercase one.
//!
//! Indices count `char`s, not bytes.

/// Ascending char indices of the special characters of one string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpecialCharacters {
    pub specials: Vec<usize>,
    /// Index into `specials` of the first special of the last segment.
    pub last_segment_specials_index: usize,
}

impl SpecialCharacters {
    /// Char index where the last segment starts.
    pub fn last_segment_start(&self) -> usize {
        self.specials
            .get(self.last_segment_specials_index)
            .copied()
            .unwrap_or(0)
    }
}

pub fn find_special_characters(text: &str) -> SpecialCharacters {
    let chars: Vec<char> = text.chars().collect();
    let mut specials = vec![0];
    let mut last_segment_specials_index = 0;
    let mut last_was_lower_case = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '/' {
            specials.push(i);
            i += 1;
            specials.push(i);
            last_segment_specials_index = specials.len() - 1;
            last_was_lower_case = false;
        } else if matches!(c, '.' | '-' | '_') {
            specials.push(i);
            if chars.get(i + 1) != Some(&'/') {
                i += 1;
                specials.push(i);
            }
            last_was_lower_case = false;
        } else if is_upper_or_caseless(c) {
            if last_was_lower_case {
                specials.push(i);
            }
            last_was_lower_case = false;
        } else {
            last_was_lower_case = true;
        }
        i += 1;
    }

    SpecialCharacters {
        specials,
        last_segment_specials_index,
    }
}

fn is_upper_or_caseless(c: char) -> bool {
    let mut upper = c.to_uppercase();
    upper.next() == Some(c) && upper.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_segments_and_camel_case() {
        assert_eq!(
            find_special_characters("src/document/DocumentCommandHandler.js"),
            SpecialCharacters {
                specials: vec![0, 3, 4, 12, 13, 21, 28, 35, 36],
                last_segment_specials_index: 4,
            }
        );
    }

    #[test]
    fn single_segment() {
        assert_eq!(
            find_special_characters("foobar.js"),
            SpecialCharacters {
                specials: vec![0, 6, 7],
                last_segment_specials_index: 0,
            }
        );
        assert_eq!(
            find_special_characters("foo"),
            SpecialCharacters {
                specials: vec![0],
                last_segment_specials_index: 0,
            }
        );
    }

    #[test]
    fn slash_after_separator_starts_a_segment() {
        let special = find_special_characters("brackets_/LICENSE");
        assert_eq!(special.specials, vec![0, 8, 9, 10]);
        assert_eq!(special.last_segment_specials_index, 3);
        assert_eq!(special.last_segment_start(), 10);
    }

    #[test]
    fn digits_after_lowercase_are_special() {
        assert_eq!(find_special_characters("mirror2x").specials, vec![0, 6]);
    }

    #[test]
    fn indices_count_chars() {
        assert_eq!(find_special_characters("é/b").specials, vec![0, 1, 2]);
    }
}
