use crate::position::Pos;
use crate::tokenizer::OwnedToken;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildErrorKind {
    #[error("malformed markup")]
    MalformedMarkup,
    #[error("close tag </{tag}> has no matching open tag")]
    UnmatchedCloseTag { tag: String },
    #[error("close tag </{tag}> does not match the innermost open element <{open}>")]
    MismatchedCloseTag { tag: String, open: String },
    #[error("<{tag}> is never closed")]
    UnclosedElement { tag: String },
    #[error("document has no root element")]
    NoRootElement,
}

/// A problem found while building a SimpleDOM, with the document range it
/// applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildError {
    pub kind: BuildErrorKind,
    /// The token that triggered the error, when there was one.
    pub token: Option<OwnedToken>,
    pub start_pos: Pos,
    pub end_pos: Pos,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}-{}", self.kind, self.start_pos, self.end_pos)
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
