//! SimpleDOM builder.
//!
//! Turns the token stream into a lightweight element/text tree that keeps the
//! source range of every element and a set of content signatures, so that two
//! builds of the same document can be compared cheaply.
//!
//! The builder is not a full HTML5 tree constructor. It knows two pieces of
//! HTML structure:
//! - implied close: opening some tags closes the innermost open element
//!   ([`tables::implicitly_closes`]);
//! - void elements never have children ([`tables::is_void_element`]).
//!
//! In strict mode the first structural problem aborts the build. In lenient
//! mode stray close tags are ignored and anything left open is closed at the
//! end of the document.

use crate::error::{BuildError, BuildErrorKind};
use crate::position::Pos;
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use rustc_hash::FxHashMap;

mod node;
mod signature;
pub mod tables;

pub use node::{
    Attributes, Element, NodeIndex, NodeKind, SimpleDom, SimpleNode, TagId, Text, Walk,
};
pub use signature::{DEFAULT_HASH_SEED, Signature};

use node::update_node;
use signature::attribute_signature;

/// Configuration for the builder.
#[derive(Clone, Debug)]
pub struct BuilderConfig {
    /// Byte offset of the text inside the enclosing document.
    pub start_offset: usize,
    /// Position of the text inside the enclosing document.
    pub start_pos: Pos,
    pub hash_seed: u64,
    /// First id handed out by the builder's counter.
    pub first_tag_id: u32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            start_offset: 0,
            start_pos: Pos::default(),
            hash_seed: DEFAULT_HASH_SEED,
            first_tag_id: 1,
        }
    }
}

/// An element the builder is about to create.
#[derive(Clone, Copy, Debug)]
pub struct OpeningTag<'a> {
    /// Lowercased tag name.
    pub tag: &'a str,
    /// Document offset of the `<`.
    pub start: usize,
    pub start_pos: Pos,
    pub parent: Option<TagId>,
}

/// Lets callers carry element identity over from an earlier build, e.g. from
/// marks kept in an editor.
pub trait TagIdSource {
    /// Proposes an id for `tag`; `None` asks for a fresh one. A proposed id
    /// already used in the current build is replaced by a fresh one.
    fn reuse_id(&mut self, tag: &OpeningTag<'_>) -> Option<TagId>;
}

/// Always mints fresh ids.
#[derive(Clone, Copy, Debug, Default)]
pub struct FreshIds;

impl TagIdSource for FreshIds {
    fn reuse_id(&mut self, _tag: &OpeningTag<'_>) -> Option<TagId> {
        None
    }
}

impl<F> TagIdSource for F
where
    F: FnMut(&OpeningTag<'_>) -> Option<TagId>,
{
    fn reuse_id(&mut self, tag: &OpeningTag<'_>) -> Option<TagId> {
        self(tag)
    }
}

pub struct Builder<'a> {
    text: &'a str,
    config: BuilderConfig,
    next_tag_id: u32,
    errors: Vec<BuildError>,
}

impl<'a> Builder<'a> {
    pub fn new(text: &'a str, config: BuilderConfig) -> Self {
        let next_tag_id = config.first_tag_id;
        Self {
            text,
            config,
            next_tag_id,
            errors: Vec::new(),
        }
    }

    /// Errors recorded by the last build.
    pub fn errors(&self) -> &[BuildError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<BuildError> {
        self.errors
    }

    /// Builds the tree with freshly minted ids.
    pub fn build(&mut self, strict: bool) -> Option<SimpleDom> {
        self.build_with_ids(strict, &mut FreshIds)
    }

    /// Builds the tree, asking `ids` for an id before minting one.
    ///
    /// Returns `None` when the build failed: in strict mode on the first
    /// structural error, in either mode when there is no root element.
    pub fn build_with_ids(
        &mut self,
        strict: bool,
        ids: &mut dyn TagIdSource,
    ) -> Option<SimpleDom> {
        self.errors.clear();
        let mut pass = BuildPass {
            config: &self.config,
            next_tag_id: &mut self.next_tag_id,
            errors: &mut self.errors,
            ids,
            nodes: Vec::new(),
            stack: Vec::new(),
            node_map: FxHashMap::default(),
            current_tag: None,
            last_closed: None,
            last_text: None,
            attribute_name: None,
        };
        let root = pass.run(self.text, strict)?;
        let BuildPass {
            nodes, node_map, ..
        } = pass;
        Some(SimpleDom {
            nodes,
            root,
            node_map,
            seed: self.config.hash_seed,
            next_tag_id: self.next_tag_id,
        })
    }
}

/// Builds `text` with the default configuration.
pub fn build(text: &str, strict: bool) -> Option<SimpleDom> {
    Builder::new(text, BuilderConfig::default()).build(strict)
}

/// State of one build.
struct BuildPass<'b> {
    config: &'b BuilderConfig,
    next_tag_id: &'b mut u32,
    errors: &'b mut Vec<BuildError>,
    ids: &'b mut dyn TagIdSource,
    nodes: Vec<SimpleNode>,
    stack: Vec<NodeIndex>,
    node_map: FxHashMap<TagId, NodeIndex>,
    /// Element whose open tag is being read.
    current_tag: Option<NodeIndex>,
    last_closed: Option<NodeIndex>,
    /// Text node that following text is appended to.
    last_text: Option<NodeIndex>,
    attribute_name: Option<String>,
}

/// The build was abandoned (strict mode).
struct Aborted;

impl BuildPass<'_> {
    fn run(&mut self, text: &str, strict: bool) -> Option<NodeIndex> {
        let mut tokenizer = Tokenizer::new(text);
        let mut last_token = None;

        while let Some(token) = tokenizer.next_token() {
            if !matches!(token.kind, TokenKind::Text | TokenKind::Comment) {
                self.last_text = None;
            }
            let Ok(()) = self.consume(&token, strict) else {
                log::debug!(target: "html.simple_dom", "strict build aborted at {token:?}");
                return None;
            };
            last_token = Some(token);
            if token.kind == TokenKind::Error {
                break;
            }
        }

        let end_pos = Pos::end_of(text);
        if let Some(&innermost) = self.stack.last() {
            if strict {
                let tag = self.tag_of(innermost).to_string();
                self.log_error_at(BuildErrorKind::UnclosedElement { tag }, end_pos, end_pos);
                return None;
            }
            while !self.stack.is_empty() {
                self.close_tag(text.len(), end_pos);
            }
        }

        let Some(root) = self.last_closed else {
            match last_token {
                Some(token) => self.log_error(BuildErrorKind::NoRootElement, &token),
                None => self.log_error_at(BuildErrorKind::NoRootElement, end_pos, end_pos),
            }
            return None;
        };
        Some(root)
    }

    fn consume(&mut self, token: &Token<'_>, strict: bool) -> Result<(), Aborted> {
        match token.kind {
            TokenKind::Error => {
                self.log_error(BuildErrorKind::MalformedMarkup, token);
                if strict {
                    return Err(Aborted);
                }
            }
            TokenKind::OpenTagName => self.open_tag(token),
            TokenKind::OpenTagEnd | TokenKind::SelfClosingTag => self.end_open_tag(token),
            TokenKind::CloseTag => self.close_tag_token(token, strict)?,
            TokenKind::AttribName => {
                let name = token.contents.to_lowercase();
                if let Some(element) = self.current_element_mut() {
                    element.attributes.set(&name, "");
                }
                self.attribute_name = Some(name);
            }
            TokenKind::AttribValue => {
                if let Some(name) = self.attribute_name.take()
                    && let Some(element) = self.current_element_mut()
                {
                    element.attributes.set(&name, token.contents);
                }
            }
            TokenKind::Text => self.text(token),
            TokenKind::Comment
            | TokenKind::CData
            | TokenKind::Declaration
            | TokenKind::ProcessingInstruction => {}
        }
        Ok(())
    }

    fn open_tag(&mut self, token: &Token<'_>) {
        let tag = token.contents.to_lowercase();
        let token_start = token.start.unwrap_or(token.end);
        let token_start_pos = token.start_pos.unwrap_or(token.end_pos);

        let closable = tables::implicitly_closes(&tag);
        while let Some(&top) = self.stack.last() {
            if !closable.contains(&self.tag_of(top)) {
                break;
            }
            // The previous element ends at the `<` of this one.
            self.close_tag(token_start.saturating_sub(1), token_start_pos.back(1));
        }

        let parent = self.stack.last().copied();
        let parent_id = parent.and_then(|p| self.tag_id_of(p));
        let start = self.config.start_offset + token_start.saturating_sub(1);
        let start_pos = token_start_pos.back(1).offset_by(self.config.start_pos);
        let tag_id = self.assign_id(&OpeningTag {
            tag: &tag,
            start,
            start_pos,
            parent: parent_id,
        });

        let index = self.push_node(SimpleNode {
            parent,
            kind: NodeKind::Element(Element {
                tag,
                tag_id,
                children: Vec::new(),
                attributes: Attributes::default(),
                start,
                end: start,
                start_pos,
                end_pos: start_pos,
                child_signature: Signature::default(),
                subtree_signature: Signature::default(),
                attribute_signature: Signature::default(),
            }),
        });
        self.node_map.insert(tag_id, index);
        self.current_tag = Some(index);

        if tables::is_void_element(self.tag_of(index)) {
            self.update(index);
        } else {
            self.stack.push(index);
        }
    }

    fn end_open_tag(&mut self, token: &Token<'_>) {
        let Some(current) = self.current_tag.take() else {
            return;
        };
        self.update_attribute_signature(current);
        if token.kind == TokenKind::SelfClosingTag && self.stack.last() == Some(&current) {
            // Self-closing tag that is not a void element, e.g. `<svg/>`.
            self.close_tag(token.end, token.end_pos);
        } else {
            let end = self.config.start_offset + token.end;
            let end_pos = token.end_pos.offset_by(self.config.start_pos);
            if let Some(element) = self.element_mut(current) {
                element.end = end;
                element.end_pos = end_pos;
            }
            self.last_closed = Some(current);
        }
    }

    fn close_tag_token(&mut self, token: &Token<'_>, strict: bool) -> Result<(), Aborted> {
        let tag = token.contents.to_lowercase();
        if tables::is_void_element(&tag) {
            return Ok(());
        }

        let matched = self
            .stack
            .iter()
            .rposition(|&open| self.tag_of(open) == tag);
        let innermost = self.stack.len().checked_sub(1);

        if strict && matched != innermost {
            let kind = match innermost {
                Some(top) if matched.is_some() => BuildErrorKind::MismatchedCloseTag {
                    tag,
                    open: self.tag_of(self.stack[top]).to_string(),
                },
                _ => BuildErrorKind::UnmatchedCloseTag { tag },
            };
            self.log_error(kind, token);
            return Err(Aborted);
        }

        let Some(depth) = matched else {
            // Stray close tag.
            return Ok(());
        };
        let token_start = token.start.unwrap_or(token.end);
        let token_start_pos = token.start_pos.unwrap_or(token.end_pos);
        while self.stack.len() > depth {
            if self.stack.len() == depth + 1 {
                // The matched element ends after the `>`.
                self.close_tag(token.end + 1, token.end_pos.forward(1));
            } else {
                // Elements left open inside it end at the `</`.
                self.close_tag(token_start.saturating_sub(2), token_start_pos.back(2));
            }
        }
        Ok(())
    }

    fn text(&mut self, token: &Token<'_>) {
        let Some(&parent) = self.stack.last() else {
            return;
        };
        if let Some(last) = self.last_text {
            if let Some(NodeKind::Text(text)) = self.nodes.get_mut(last.slot()).map(|n| &mut n.kind) {
                text.content.push_str(token.contents);
            }
            self.update(last);
            return;
        }

        let text_id = match self.children_of(parent).last() {
            None => format!("{}.0", self.id_string(parent)),
            Some(&previous) => format!("{}t", self.id_string(previous)),
        };
        let index = self.push_node(SimpleNode {
            parent: Some(parent),
            kind: NodeKind::Text(Text {
                content: token.contents.to_string(),
                text_id,
                text_signature: Signature::default(),
            }),
        });
        self.last_text = Some(index);
        self.update(index);
    }

    /// Pops the innermost open element and finalizes it.
    fn close_tag(&mut self, end: usize, end_pos: Pos) {
        let Some(index) = self.stack.pop() else {
            return;
        };
        self.update(index);
        let end = self.config.start_offset + end;
        let end_pos = end_pos.offset_by(self.config.start_pos);
        if let Some(element) = self.element_mut(index) {
            element.end = end;
            element.end_pos = end_pos;
            #[cfg(any(test, feature = "debug-stats"))]
            log::trace!(
                target: "html.simple_dom",
                "close <{}> #{} {}..{}",
                element.tag,
                element.tag_id,
                element.start,
                element.end
            );
        }
        self.last_closed = Some(index);
    }

    fn assign_id(&mut self, tag: &OpeningTag<'_>) -> TagId {
        if let Some(proposed) = self.ids.reuse_id(tag) {
            if !self.node_map.contains_key(&proposed) {
                return proposed;
            }
            log::debug!(
                target: "html.simple_dom",
                "tag id {proposed} already used in this build, minting a new one"
            );
        }
        loop {
            let id = TagId(*self.next_tag_id);
            *self.next_tag_id += 1;
            if !self.node_map.contains_key(&id) {
                return id;
            }
        }
    }

    fn push_node(&mut self, node: SimpleNode) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        if let Some(parent) = node.parent
            && let Some(NodeKind::Element(element)) =
                self.nodes.get_mut(parent.slot()).map(|n| &mut n.kind)
        {
            element.children.push(index);
        }
        self.nodes.push(node);
        index
    }

    fn update(&mut self, index: NodeIndex) {
        update_node(&mut self.nodes, index, self.config.hash_seed);
    }

    fn update_attribute_signature(&mut self, index: NodeIndex) {
        let seed = self.config.hash_seed;
        if let Some(element) = self.element_mut(index) {
            element.attribute_signature = attribute_signature(seed, element.attributes.iter());
        }
    }

    fn element_mut(&mut self, index: NodeIndex) -> Option<&mut Element> {
        match self.nodes.get_mut(index.slot()).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn current_element_mut(&mut self) -> Option<&mut Element> {
        let current = self.current_tag?;
        self.element_mut(current)
    }

    fn tag_of(&self, index: NodeIndex) -> &str {
        match self.nodes.get(index.slot()).map(|n| &n.kind) {
            Some(NodeKind::Element(element)) => &element.tag,
            _ => "",
        }
    }

    fn tag_id_of(&self, index: NodeIndex) -> Option<TagId> {
        match self.nodes.get(index.slot()).map(|n| &n.kind) {
            Some(NodeKind::Element(element)) => Some(element.tag_id),
            _ => None,
        }
    }

    fn children_of(&self, index: NodeIndex) -> &[NodeIndex] {
        match self.nodes.get(index.slot()).map(|n| &n.kind) {
            Some(NodeKind::Element(element)) => &element.children,
            _ => &[],
        }
    }

    fn id_string(&self, index: NodeIndex) -> String {
        self.nodes
            .get(index.slot())
            .map(SimpleNode::id_string)
            .unwrap_or_default()
    }

    fn log_error(&mut self, kind: BuildErrorKind, token: &Token<'_>) {
        let start_pos = token.start_pos.unwrap_or(token.end_pos);
        self.log_error_at(kind, start_pos, token.end_pos);
        if let Some(error) = self.errors.last_mut() {
            error.token = Some(token.to_owned_token());
        }
    }

    /// Records an error at positions relative to the built text.
    fn log_error_at(&mut self, kind: BuildErrorKind, start_pos: Pos, end_pos: Pos) {
        self.errors.push(BuildError {
            kind,
            token: None,
            start_pos: start_pos.offset_by(self.config.start_pos),
            end_pos: end_pos.offset_by(self.config.start_pos),
        });
    }
}
