//! Line/column positions inside a source document.
//!
//! `line` is zero-based. `ch` counts Unicode scalar values since the last
//! `\n`, so a position can be mapped back to an editor column without
//! re-scanning the line.

use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub line: usize,
    pub ch: usize,
}

impl Pos {
    pub const fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }

    /// Same line, `n` columns to the right.
    pub(crate) const fn forward(self, n: usize) -> Self {
        Self {
            line: self.line,
            ch: self.ch + n,
        }
    }

    /// Same line, `n` columns to the left (clamped at column zero).
    ///
    /// Only valid when the skipped characters are known not to be newlines.
    pub(crate) const fn back(self, n: usize) -> Self {
        Self {
            line: self.line,
            ch: self.ch.saturating_sub(n),
        }
    }

    /// Advances over one character.
    pub(crate) fn advance(&mut self, c: char) {
        if c == '\n' {
            self.line += 1;
            self.ch = 0;
        } else {
            self.ch += 1;
        }
    }

    /// Advances over a run of text in one step.
    pub(crate) fn advance_str(&mut self, run: &str) {
        let bytes = run.as_bytes();
        let newlines = memchr::memchr_iter(b'\n', bytes).count();
        match memchr::memrchr(b'\n', bytes) {
            Some(last) => {
                self.line += newlines;
                self.ch = run[last + 1..].chars().count();
            }
            None => self.ch += run.chars().count(),
        }
    }

    /// Position of the end of `text`, as if it started at (0, 0).
    pub fn end_of(text: &str) -> Self {
        let mut pos = Self::default();
        pos.advance_str(text);
        pos
    }

    /// Translates `self`, which is relative to a fragment that starts at
    /// `base`, into document coordinates. Columns only shift on the first
    /// line of the fragment.
    pub fn offset_by(self, base: Pos) -> Self {
        Self {
            line: base.line + self.line,
            ch: if self.line == 0 {
                base.ch + self.ch
            } else {
                self.ch
            },
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.ch)
    }
}
