//! Resumable HTML tokenizer.
//!
//! The tokenizer is a pull-based state machine over a complete `&str`: every
//! call to [`Tokenizer::next_token`] advances just far enough to produce one
//! token. It is deliberately forgiving about what it accepts (no entity
//! decoding, no DOCTYPE modelling) and strict about what it rejects: the first
//! illegal character produces a [`TokenKind::Error`] token and ends the
//! stream.
//!
//! Invariants:
//! - Offsets are byte offsets into the source; `Pos::ch` counts characters.
//! - A single step emits at most two tokens; the second waits in a one-slot
//!   lookahead and is returned by the next call.
//! - `script` and `style` bodies are raw text: only the matching close tag
//!   ends them.

use crate::position::Pos;
use states::{
    RawText, TokenizerState, is_legal_in_attribute_name, is_legal_in_tag_name,
    is_legal_in_unquoted_attribute_value, is_whitespace,
};

mod emit;
mod states;
mod token;

pub use token::{OwnedToken, Token, TokenKind};

/// What the main loop does after a state handler ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Move past the current character.
    Advance,
    /// Process the current character again in the new state.
    Reconsume,
    /// The handler already moved the cursor.
    Skipped,
    /// An error token was emitted; stop without consuming.
    Stop,
}

pub struct Tokenizer<'a> {
    text: &'a str,
    state: TokenizerState,
    raw_text: RawText,
    index: usize,
    pos: Pos,
    section_start: Option<usize>,
    section_start_pos: Option<Pos>,
    token: Option<Token<'a>>,
    lookahead: Option<Token<'a>>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            state: TokenizerState::Text,
            raw_text: RawText::None,
            index: 0,
            pos: Pos::default(),
            section_start: Some(0),
            section_start_pos: Some(Pos::default()),
            token: None,
            lookahead: None,
            failed: false,
        }
    }

    /// The text being tokenized.
    pub fn source(&self) -> &'a str {
        self.text
    }

    /// Returns the next token, or `None` once the input is exhausted or an
    /// error token has been returned.
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if let Some(queued) = self.lookahead.take() {
            return Some(queued);
        }
        if self.failed {
            return None;
        }
        self.token = None;

        while self.index < self.text.len() && self.token.is_none() {
            let Some(c) = self.text[self.index..].chars().next() else {
                break;
            };
            match self.step(c) {
                Step::Advance => {
                    self.pos.advance(c);
                    self.index += c.len_utf8();
                }
                Step::Reconsume | Step::Skipped => {}
                Step::Stop => break,
            }
        }

        if self.token.is_none() && !self.failed && self.index >= self.text.len() {
            if self.state == TokenizerState::Text {
                self.emit_if_nonempty(TokenKind::Text);
            } else {
                // Input ended in the middle of markup.
                self.emit_error();
            }
        }
        self.token.take()
    }

    fn set_state(&mut self, state: TokenizerState) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html.tokenizer", "{:?} -> {state:?} at {}", self.state, self.index);
        self.state = state;
    }

    /// Like `set_state`, followed by reprocessing the current character.
    fn reconsume_in(&mut self, state: TokenizerState) -> Step {
        self.set_state(state);
        Step::Reconsume
    }

    fn error(&mut self) -> Step {
        self.emit_error();
        Step::Stop
    }

    /// Position and offset of the character `n` bytes (columns) after the
    /// cursor, for ASCII-only boundaries.
    fn boundary(&self, n: usize) -> (usize, Pos) {
        (self.index + n, self.pos.forward(n))
    }

    fn emit_open_tag_end(&mut self) {
        let (end, end_pos) = self.boundary(1);
        self.emit_boundary(TokenKind::OpenTagEnd, end, end_pos);
    }

    fn emit_self_closing(&mut self) {
        let (end, end_pos) = self.boundary(2);
        self.emit_boundary(TokenKind::SelfClosingTag, end, end_pos);
    }

    fn step(&mut self, c: char) -> Step {
        use TokenizerState as S;

        match self.state {
            S::Text => {
                if c == '<' {
                    self.emit_if_nonempty(TokenKind::Text);
                    self.set_state(S::BeforeTagName);
                    self.start_section(0);
                } else {
                    return self.skip_text_run();
                }
            }
            S::BeforeTagName => {
                if c == '/' {
                    self.set_state(S::BeforeClosingTagName);
                } else if c == '>' || self.raw_text != RawText::None {
                    self.set_state(S::Text);
                } else if c == '!' {
                    self.set_state(S::BeforeDeclaration);
                    self.start_section(1);
                } else if c == '?' {
                    self.set_state(S::InProcessingInstruction);
                    self.start_section(1);
                } else if c == 's' || c == 'S' {
                    self.set_state(S::BeforeSpecial);
                    self.start_section(0);
                } else if !is_legal_in_tag_name(c) {
                    return self.error();
                } else if !is_whitespace(c) {
                    self.set_state(S::InTagName);
                    self.start_section(0);
                }
            }
            S::InTagName => {
                if c == '/' {
                    self.emit(TokenKind::OpenTagName);
                    self.emit_self_closing();
                    self.set_state(S::AfterSelfCloseSlash);
                } else if c == '>' {
                    self.emit(TokenKind::OpenTagName);
                    self.emit_open_tag_end();
                    self.set_state(S::Text);
                    self.start_section(1);
                } else if is_whitespace(c) {
                    self.emit(TokenKind::OpenTagName);
                    self.set_state(S::BeforeAttributeName);
                } else if !is_legal_in_tag_name(c) {
                    return self.error();
                }
            }
            S::BeforeClosingTagName => {
                if c == '>' {
                    self.set_state(S::Text);
                } else if self.raw_text != RawText::None {
                    if c == 's' || c == 'S' {
                        self.set_state(S::BeforeSpecialEnd);
                    } else {
                        return self.reconsume_in(S::Text);
                    }
                } else if !is_legal_in_tag_name(c) {
                    return self.error();
                } else if !is_whitespace(c) {
                    self.set_state(S::InClosingTagName);
                    self.start_section(0);
                }
            }
            S::InClosingTagName => {
                if c == '>' {
                    self.emit(TokenKind::CloseTag);
                    self.set_state(S::Text);
                    self.start_section(1);
                    self.raw_text = RawText::None;
                } else if is_whitespace(c) {
                    self.emit(TokenKind::CloseTag);
                    self.set_state(S::AfterClosingTagName);
                    self.raw_text = RawText::None;
                } else if !is_legal_in_tag_name(c) {
                    return self.error();
                }
            }
            S::AfterClosingTagName => {
                if c == '>' {
                    self.set_state(S::Text);
                    self.start_section(1);
                } else if !is_whitespace(c) {
                    // Only whitespace may follow the name of a close tag.
                    return self.error();
                }
            }
            S::AfterSelfCloseSlash => {
                if c == '>' {
                    self.set_state(S::Text);
                    self.start_section(1);
                } else {
                    return self.error();
                }
            }

            S::BeforeAttributeName => {
                if c == '>' {
                    self.set_state(S::Text);
                    self.emit_open_tag_end();
                    self.start_section(1);
                } else if c == '/' {
                    self.emit_self_closing();
                    self.set_state(S::AfterSelfCloseSlash);
                } else if !is_legal_in_attribute_name(c) {
                    return self.error();
                } else if !is_whitespace(c) {
                    self.set_state(S::InAttributeName);
                    self.start_section(0);
                }
            }
            S::InAttributeName => {
                if c == '=' {
                    self.emit_if_nonempty(TokenKind::AttribName);
                    self.set_state(S::BeforeAttributeValue);
                } else if is_whitespace(c) {
                    self.emit_if_nonempty(TokenKind::AttribName);
                    self.set_state(S::AfterAttributeName);
                } else if c == '/' || c == '>' {
                    self.emit_if_nonempty(TokenKind::AttribName);
                    return self.reconsume_in(S::BeforeAttributeName);
                } else if !is_legal_in_attribute_name(c) {
                    return self.error();
                }
            }
            S::AfterAttributeName => {
                if c == '=' {
                    self.set_state(S::BeforeAttributeValue);
                } else if c == '/' || c == '>' {
                    return self.reconsume_in(S::BeforeAttributeName);
                } else if !is_legal_in_attribute_name(c) {
                    return self.error();
                } else if !is_whitespace(c) {
                    self.set_state(S::InAttributeName);
                    self.start_section(0);
                }
            }
            S::BeforeAttributeValue => {
                if c == '"' {
                    self.set_state(S::InAttributeValueDoubleQuotes);
                    self.start_section(1);
                } else if c == '\'' {
                    self.set_state(S::InAttributeValueSingleQuotes);
                    self.start_section(1);
                } else if !is_legal_in_unquoted_attribute_value(c) {
                    return self.error();
                } else if !is_whitespace(c) {
                    self.set_state(S::InAttributeValueNoQuotes);
                    self.start_section(0);
                }
            }
            S::InAttributeValueDoubleQuotes => {
                if c == '"' {
                    self.emit(TokenKind::AttribValue);
                    self.set_state(S::AfterQuotedAttributeValue);
                }
            }
            S::InAttributeValueSingleQuotes => {
                if c == '\'' {
                    self.emit(TokenKind::AttribValue);
                    self.set_state(S::AfterQuotedAttributeValue);
                }
            }
            S::InAttributeValueNoQuotes => {
                if c == '>' {
                    self.emit(TokenKind::AttribValue);
                    self.emit_open_tag_end();
                    self.set_state(S::Text);
                    self.start_section(1);
                } else if is_whitespace(c) {
                    self.emit(TokenKind::AttribValue);
                    self.set_state(S::BeforeAttributeName);
                } else if !is_legal_in_unquoted_attribute_value(c) {
                    return self.error();
                }
            }
            S::AfterQuotedAttributeValue => {
                // A quoted value must be followed by whitespace before the
                // next attribute.
                if c == '>' {
                    self.set_state(S::Text);
                    self.emit_open_tag_end();
                    self.start_section(1);
                } else if c == '/' {
                    self.emit_self_closing();
                    self.set_state(S::AfterSelfCloseSlash);
                } else if is_whitespace(c) {
                    self.set_state(S::BeforeAttributeName);
                } else {
                    return self.error();
                }
            }

            S::BeforeDeclaration => {
                let next = match c {
                    '[' => S::BeforeCData1,
                    '-' => S::BeforeComment,
                    _ => S::InDeclaration,
                };
                self.set_state(next);
            }
            S::InDeclaration => {
                if c == '>' {
                    self.emit(TokenKind::Declaration);
                    self.set_state(S::Text);
                    self.start_section(1);
                }
            }
            S::InProcessingInstruction => {
                if c == '>' {
                    self.emit(TokenKind::ProcessingInstruction);
                    self.set_state(S::Text);
                    self.start_section(1);
                }
            }

            S::BeforeComment => {
                if c == '-' {
                    self.set_state(S::InComment);
                    self.start_section(1);
                } else {
                    self.set_state(S::InDeclaration);
                }
            }
            S::InComment => {
                if c == '-' {
                    self.set_state(S::AfterComment1);
                }
            }
            S::AfterComment1 => {
                let next = if c == '-' { S::AfterComment2 } else { S::InComment };
                self.set_state(next);
            }
            S::AfterComment2 => {
                if c == '>' {
                    // Drop the trailing "--"; neither character is a newline.
                    self.emit_at(TokenKind::Comment, self.index - 2, self.pos.back(2));
                    self.set_state(S::Text);
                    self.start_section(1);
                } else if c != '-' {
                    self.set_state(S::InComment);
                }
            }

            S::BeforeCData1 => self.expect_or_declaration(c, 'C', S::BeforeCData2),
            S::BeforeCData2 => self.expect_or_declaration(c, 'D', S::BeforeCData3),
            S::BeforeCData3 => self.expect_or_declaration(c, 'A', S::BeforeCData4),
            S::BeforeCData4 => self.expect_or_declaration(c, 'T', S::BeforeCData5),
            S::BeforeCData5 => self.expect_or_declaration(c, 'A', S::BeforeCData6),
            S::BeforeCData6 => {
                if c == '[' {
                    self.set_state(S::InCData);
                    self.start_section(1);
                } else {
                    self.set_state(S::InDeclaration);
                }
            }
            S::InCData => {
                if c == ']' {
                    self.set_state(S::AfterCData1);
                }
            }
            S::AfterCData1 => {
                let next = if c == ']' { S::AfterCData2 } else { S::InCData };
                self.set_state(next);
            }
            S::AfterCData2 => {
                if c == '>' {
                    self.emit_at(TokenKind::CData, self.index - 2, self.pos.back(2));
                    self.set_state(S::Text);
                    self.start_section(1);
                } else if c != ']' {
                    self.set_state(S::InCData);
                }
            }

            S::BeforeSpecial => {
                if c.eq_ignore_ascii_case(&'c') {
                    self.set_state(S::BeforeScript1);
                } else if c.eq_ignore_ascii_case(&'t') {
                    self.set_state(S::BeforeStyle1);
                } else {
                    return self.reconsume_in(S::InTagName);
                }
            }
            S::BeforeSpecialEnd => {
                let next = match self.raw_text {
                    RawText::Script if c.eq_ignore_ascii_case(&'c') => S::AfterScript1,
                    RawText::Style if c.eq_ignore_ascii_case(&'t') => S::AfterStyle1,
                    _ => S::Text,
                };
                self.set_state(next);
            }

            S::BeforeScript1 => return self.expect_or_tag_name(c, 'r', S::BeforeScript2),
            S::BeforeScript2 => return self.expect_or_tag_name(c, 'i', S::BeforeScript3),
            S::BeforeScript3 => return self.expect_or_tag_name(c, 'p', S::BeforeScript4),
            S::BeforeScript4 => return self.expect_or_tag_name(c, 't', S::BeforeScript5),
            S::BeforeScript5 => return self.enter_raw_text(c, RawText::Script),
            S::AfterScript1 => self.expect_or_text(c, 'r', S::AfterScript2),
            S::AfterScript2 => self.expect_or_text(c, 'i', S::AfterScript3),
            S::AfterScript3 => self.expect_or_text(c, 'p', S::AfterScript4),
            S::AfterScript4 => self.expect_or_text(c, 't', S::AfterScript5),
            S::AfterScript5 => return self.leave_raw_text(c, "script".len()),

            S::BeforeStyle1 => return self.expect_or_tag_name(c, 'y', S::BeforeStyle2),
            S::BeforeStyle2 => return self.expect_or_tag_name(c, 'l', S::BeforeStyle3),
            S::BeforeStyle3 => return self.expect_or_tag_name(c, 'e', S::BeforeStyle4),
            S::BeforeStyle4 => return self.enter_raw_text(c, RawText::Style),
            S::AfterStyle1 => self.expect_or_text(c, 'y', S::AfterStyle2),
            S::AfterStyle2 => self.expect_or_text(c, 'l', S::AfterStyle3),
            S::AfterStyle3 => self.expect_or_text(c, 'e', S::AfterStyle4),
            S::AfterStyle4 => return self.leave_raw_text(c, "style".len()),
        }
        Step::Advance
    }

    /// Consumes a run of plain text up to the next `<` in one step.
    fn skip_text_run(&mut self) -> Step {
        let rest = &self.text.as_bytes()[self.index..];
        let run_len = memchr::memchr(b'<', rest).unwrap_or(rest.len());
        let end = self.index + run_len;
        self.pos.advance_str(&self.text[self.index..end]);
        self.index = end;
        Step::Skipped
    }

    fn expect_or_declaration(&mut self, c: char, expected: char, next: TokenizerState) {
        let next = if c == expected {
            next
        } else {
            TokenizerState::InDeclaration
        };
        self.set_state(next);
    }

    fn expect_or_tag_name(&mut self, c: char, expected: char, next: TokenizerState) -> Step {
        if c.eq_ignore_ascii_case(&expected) {
            self.set_state(next);
            Step::Advance
        } else {
            self.reconsume_in(TokenizerState::InTagName)
        }
    }

    fn expect_or_text(&mut self, c: char, expected: char, next: TokenizerState) {
        let next = if c.eq_ignore_ascii_case(&expected) {
            next
        } else {
            TokenizerState::Text
        };
        self.set_state(next);
    }

    /// The whole raw-text tag name has been read; it only counts when the name
    /// ends here.
    fn enter_raw_text(&mut self, c: char, kind: RawText) -> Step {
        if c == '/' || c == '>' || is_whitespace(c) {
            self.raw_text = kind;
        }
        self.reconsume_in(TokenizerState::InTagName)
    }

    /// `</script` or `</style` matched; rewind the section to the tag name and
    /// let the close-tag state finish it.
    fn leave_raw_text(&mut self, c: char, name_len: usize) -> Step {
        if c == '>' || is_whitespace(c) {
            self.set_state(TokenizerState::InClosingTagName);
            self.start_section(-(name_len as isize));
            Step::Reconsume
        } else {
            self.set_state(TokenizerState::Text);
            Step::Advance
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenizes `text` to completion.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    Tokenizer::new(text).collect()
}

#[cfg(test)]
mod tests;
