//! SimpleDOM node model.
//!
//! Nodes live in an arena owned by [`SimpleDom`]; parent and child links are
//! arena indices. Elements are additionally addressable by their [`TagId`],
//! which is the identity that survives re-parses.

use super::signature::{Signature, SignatureHasher, attribute_signature, text_signature};
use crate::position::Pos;
use rustc_hash::FxHashMap;
use std::fmt;

/// Arena slot of a node inside one [`SimpleDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

/// Stable element identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub u32);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered attribute list. Names are unique; setting an existing name
/// replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => {
                existing.clear();
                existing.push_str(value);
            }
            None => self.0.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let at = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(at).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::default();
        for (name, value) in iter {
            attrs.set(&name.into(), &value.into());
        }
        attrs
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    pub tag_id: TagId,
    pub children: Vec<NodeIndex>,
    pub attributes: Attributes,
    /// Byte offset of the `<` of the open tag.
    pub start: usize,
    /// Byte offset just past the end of the element.
    pub end: usize,
    pub start_pos: Pos,
    pub end_pos: Pos,
    pub child_signature: Signature,
    pub subtree_signature: Signature,
    pub attribute_signature: Signature,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub content: String,
    /// Derived from the node's position: `"<parent id>.0"` for a first child,
    /// otherwise the previous sibling's id followed by `t`. Not unique.
    pub text_id: String,
    pub text_signature: Signature,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(Text),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleNode {
    pub parent: Option<NodeIndex>,
    pub kind: NodeKind,
}

impl SimpleNode {
    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element(_) => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    /// Tag id of an element, text id of a text node.
    pub fn id_string(&self) -> String {
        match &self.kind {
            NodeKind::Element(element) => element.tag_id.to_string(),
            NodeKind::Text(text) => text.text_id.clone(),
        }
    }
}

/// A built SimpleDOM tree.
///
/// The arena may hold elements that are not reachable from the root (for
/// example top-level siblings of the root); they still appear in the tag-id
/// map.
#[derive(Clone, Debug)]
pub struct SimpleDom {
    pub(crate) nodes: Vec<SimpleNode>,
    pub(crate) root: NodeIndex,
    pub(crate) node_map: FxHashMap<TagId, NodeIndex>,
    pub(crate) seed: u64,
    pub(crate) next_tag_id: u32,
}

impl SimpleDom {
    pub fn root_index(&self) -> NodeIndex {
        self.root
    }

    pub fn root(&self) -> &SimpleNode {
        &self.nodes[self.root.slot()]
    }

    /// The root element. Roots are always elements.
    pub fn root_element(&self) -> Option<&Element> {
        self.root().as_element()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&SimpleNode> {
        self.nodes.get(index.slot())
    }

    pub fn element(&self, index: NodeIndex) -> Option<&Element> {
        self.node(index).and_then(SimpleNode::as_element)
    }

    pub fn text(&self, index: NodeIndex) -> Option<&Text> {
        self.node(index).and_then(SimpleNode::as_text)
    }

    /// Looks an element up by tag id.
    pub fn index_of(&self, tag_id: TagId) -> Option<NodeIndex> {
        self.node_map.get(&tag_id).copied()
    }

    pub fn get(&self, tag_id: TagId) -> Option<&Element> {
        self.index_of(tag_id).and_then(|index| self.element(index))
    }

    pub fn tag_ids(&self) -> impl Iterator<Item = TagId> + '_ {
        self.node_map.keys().copied()
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.element(index)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.node(index).and_then(|node| node.parent)
    }

    /// Tag id of the parent element of `index`.
    pub fn parent_tag_id(&self, index: NodeIndex) -> Option<TagId> {
        self.parent(index)
            .and_then(|parent| self.element(parent))
            .map(|element| element.tag_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn hash_seed(&self) -> u64 {
        self.seed
    }

    /// First tag id that the build pass did not hand out. Feed it to the next
    /// build of the same document to keep fresh ids distinct.
    pub fn next_tag_id(&self) -> u32 {
        self.next_tag_id
    }

    /// Pre-order walk from the root.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            dom: self,
            stack: vec![(self.root, 0)],
        }
    }

    /// Recomputes the signatures of one node from its content and its
    /// children's current signatures. Ancestors are left alone; see
    /// [`SimpleDom::refresh_ancestors`].
    pub fn update(&mut self, index: NodeIndex) {
        update_node(&mut self.nodes, index, self.seed);
    }

    /// Recomputes an element's attribute signature.
    pub fn update_attribute_signature(&mut self, index: NodeIndex) {
        let seed = self.seed;
        if let Some(SimpleNode {
            kind: NodeKind::Element(element),
            ..
        }) = self.nodes.get_mut(index.slot())
        {
            element.attribute_signature = attribute_signature(seed, element.attributes.iter());
        }
    }

    /// Updates every ancestor of `index`, innermost first.
    pub fn refresh_ancestors(&mut self, index: NodeIndex) {
        let mut cursor = self.parent(index);
        while let Some(parent) = cursor {
            self.update(parent);
            cursor = self.parent(parent);
        }
    }

    /// Replaces the content of a text node and refreshes the signatures on
    /// the path to the root. Returns `false` when `index` is not a text node.
    pub fn set_text(&mut self, index: NodeIndex, content: &str) -> bool {
        let Some(SimpleNode {
            kind: NodeKind::Text(text),
            ..
        }) = self.nodes.get_mut(index.slot())
        else {
            return false;
        };
        text.content.clear();
        text.content.push_str(content);
        self.update(index);
        self.refresh_ancestors(index);
        true
    }

    /// Sets an attribute and refreshes the signatures on the path to the
    /// root. Returns `false` when `index` is not an element.
    pub fn set_attribute(&mut self, index: NodeIndex, name: &str, value: &str) -> bool {
        let Some(SimpleNode {
            kind: NodeKind::Element(element),
            ..
        }) = self.nodes.get_mut(index.slot())
        else {
            return false;
        };
        element.attributes.set(name, value);
        self.update_attribute_signature(index);
        self.refresh_ancestors(index);
        true
    }
}

/// Pre-order iterator yielding `(index, depth)`.
pub struct Walk<'a> {
    dom: &'a SimpleDom,
    stack: Vec<(NodeIndex, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (NodeIndex, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        let children = self.dom.children(index);
        self.stack
            .extend(children.iter().rev().map(|&child| (child, depth + 1)));
        Some((index, depth))
    }
}

/// Shared by the builder, which updates nodes before the tree is wrapped in a
/// [`SimpleDom`].
pub(crate) fn update_node(nodes: &mut [SimpleNode], index: NodeIndex, seed: u64) {
    let signatures = match nodes.get(index.slot()).map(|node| &node.kind) {
        Some(NodeKind::Element(element)) => {
            let mut child_hasher = SignatureHasher::new(seed);
            let mut subtree_hasher = SignatureHasher::new(seed);
            for child in &element.children {
                match nodes.get(child.slot()).map(|node| &node.kind) {
                    Some(NodeKind::Element(child)) => {
                        child_hasher.tag(b'e').u32(child.tag_id.0);
                        subtree_hasher
                            .tag(b'e')
                            .u32(child.tag_id.0)
                            .signature(child.attribute_signature)
                            .signature(child.subtree_signature);
                    }
                    Some(NodeKind::Text(child)) => {
                        child_hasher.tag(b't').signature(child.text_signature);
                        subtree_hasher.tag(b't').signature(child.text_signature);
                    }
                    None => {}
                }
            }
            Some((child_hasher.finish(), subtree_hasher.finish()))
        }
        Some(NodeKind::Text(_)) | None => None,
    };

    match nodes.get_mut(index.slot()).map(|node| &mut node.kind) {
        Some(NodeKind::Element(element)) => {
            if let Some((child, subtree)) = signatures {
                element.child_signature = child;
                element.subtree_signature = subtree;
            }
        }
        Some(NodeKind::Text(text)) => {
            text.text_signature = text_signature(seed, &text.content);
        }
        None => {}
    }
}
