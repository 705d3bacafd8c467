//! Token model produced by [`Tokenizer`](super::Tokenizer).

use crate::position::Pos;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Text,
    OpenTagName,
    /// The `>` that ends an open tag.
    OpenTagEnd,
    /// The `/>` that ends a self-closing tag.
    SelfClosingTag,
    CloseTag,
    AttribName,
    AttribValue,
    Comment,
    CData,
    Declaration,
    ProcessingInstruction,
    /// Malformed markup. Always the last token of a stream.
    Error,
}

impl TokenKind {
    /// Boundary tokens mark a position and carry no contents.
    pub fn is_boundary(self) -> bool {
        matches!(
            self,
            TokenKind::OpenTagEnd | TokenKind::SelfClosingTag | TokenKind::Error
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Text => "text",
            TokenKind::OpenTagName => "opentagname",
            TokenKind::OpenTagEnd => "opentagend",
            TokenKind::SelfClosingTag => "selfclosingtag",
            TokenKind::CloseTag => "closetag",
            TokenKind::AttribName => "attribname",
            TokenKind::AttribValue => "attribvalue",
            TokenKind::Comment => "comment",
            TokenKind::CData => "cdata",
            TokenKind::Declaration => "declaration",
            TokenKind::ProcessingInstruction => "processinginstruction",
            TokenKind::Error => "error",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lexical unit.
///
/// `contents` borrows from the tokenized text. `start`/`end` are byte offsets
/// of `contents`; for boundary tokens `start` and `start_pos` are `None` and
/// `end` is the offset just past the boundary markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub contents: &'a str,
    pub start: Option<usize>,
    pub end: usize,
    pub start_pos: Option<Pos>,
    pub end_pos: Pos,
}

impl Token<'_> {
    /// Owned copy suitable for keeping past the lifetime of the source text.
    pub fn to_owned_token(&self) -> OwnedToken {
        OwnedToken {
            kind: self.kind,
            contents: self.contents.to_string(),
            start: self.start,
            end: self.end,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedToken {
    pub kind: TokenKind,
    pub contents: String,
    pub start: Option<usize>,
    pub end: usize,
}
