//! Resumable HTML tokenizer and the SimpleDOM built on top of it.
//!
//! The tokenizer is deliberately lenient and position-exact: it exists to
//! map editor text onto a light element tree, not to implement the HTML
//! parsing algorithm. Trees from successive edits of one document are
//! compared with [`dom_diff::diff`].

pub mod debug;
pub mod dom_diff;
pub mod error;
pub mod position;
pub mod simple_dom;
pub mod tokenizer;

pub use dom_diff::{Edit, Placement, diff};
pub use error::{BuildError, BuildErrorKind};
pub use position::Pos;
pub use simple_dom::{
    Builder, BuilderConfig, Element, NodeIndex, NodeKind, SimpleDom, SimpleNode, TagId, Text,
    build,
};
pub use tokenizer::{OwnedToken, Token, TokenKind, Tokenizer, tokenize};
