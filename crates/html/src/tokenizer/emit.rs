//! Token emission helpers.

use super::Tokenizer;
use super::token::{Token, TokenKind};
use crate::position::Pos;

impl<'a> Tokenizer<'a> {
    /// Queues a token whose contents run from the section start to `end`.
    fn set_token(&mut self, kind: TokenKind, end: usize, end_pos: Pos) {
        let contents = match self.section_start {
            Some(start) => self.text.get(start..end).unwrap_or(""),
            None => "",
        };
        let token = Token {
            kind,
            contents,
            start: self.section_start,
            end,
            start_pos: self.section_start_pos,
            end_pos,
        };
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html.tokenizer", "emit token: {token:?}");

        if self.token.is_none() {
            self.token = Some(token);
        } else {
            // At most two tokens are produced per step.
            debug_assert!(self.lookahead.is_none(), "lookahead slot already full");
            if self.lookahead.is_some() {
                log::error!(target: "html.tokenizer", "dropping token, lookahead slot full: {token:?}");
            }
            self.lookahead = Some(token);
        }
    }

    /// Emits the current section ending at the cursor.
    pub(super) fn emit(&mut self, kind: TokenKind) {
        self.emit_at(kind, self.index, self.pos);
    }

    /// Emits the current section ending at an explicit boundary.
    pub(super) fn emit_at(&mut self, kind: TokenKind, end: usize, end_pos: Pos) {
        self.set_token(kind, end, end_pos);
        self.section_start = None;
        self.section_start_pos = None;
    }

    /// Emits the current section only when it is not empty. The section is
    /// reset either way.
    pub(super) fn emit_if_nonempty(&mut self, kind: TokenKind) {
        if self.section_start.is_some_and(|start| self.index > start) {
            self.set_token(kind, self.index, self.pos);
        }
        self.section_start = None;
        self.section_start_pos = None;
    }

    /// Emits a contentless boundary token.
    pub(super) fn emit_boundary(&mut self, kind: TokenKind, end: usize, end_pos: Pos) {
        self.section_start = None;
        self.section_start_pos = None;
        self.emit_at(kind, end, end_pos);
    }

    /// Emits an error token and stops the tokenizer.
    pub(super) fn emit_error(&mut self) {
        self.emit_boundary(TokenKind::Error, self.index, self.pos);
        self.failed = true;
    }

    /// Starts a section at the cursor, shifted by `offset` bytes. Callers only
    /// shift across single-byte characters that are not newlines.
    pub(super) fn start_section(&mut self, offset: isize) {
        let start = self.index.saturating_add_signed(offset);
        self.section_start = Some(start);
        self.section_start_pos = Some(if offset >= 0 {
            self.pos.forward(offset.unsigned_abs())
        } else {
            self.pos.back(offset.unsigned_abs())
        });
    }
}
