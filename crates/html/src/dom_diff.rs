//! Edit scripts between two SimpleDOM builds.
//!
//! Contract:
//! - Elements are matched by [`TagId`]; text nodes are matched by position.
//! - Attribute edits are generated when attribute signatures differ, child
//!   edits when child signatures differ, and a subtree is only descended into
//!   when its subtree signature differs.
//! - Positioned edits carry the id of the sibling they go before (`before_id`)
//!   or after (`after_id`), or are flagged as first/last child.
//! - Elements that change parent are reported as `ElementMove`; their ids are
//!   collected into a leading `RememberNodes` edit so the receiver can set
//!   them aside before anything is deleted.
//!
//! Both trees must be built with the same hash seed.

use crate::simple_dom::{Attributes, NodeIndex, SimpleDom, TagId};

/// Where a positioned edit applies among its siblings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Placement {
    pub before_id: Option<TagId>,
    pub after_id: Option<TagId>,
    pub first_child: bool,
    pub last_child: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    ElementInsert {
        tag: String,
        tag_id: TagId,
        /// `None` only for the root of a brand new tree.
        parent_id: Option<TagId>,
        attributes: Attributes,
        placement: Placement,
    },
    ElementDelete {
        tag_id: TagId,
    },
    ElementMove {
        tag_id: TagId,
        parent_id: TagId,
        placement: Placement,
    },
    TextInsert {
        content: String,
        parent_id: TagId,
        placement: Placement,
    },
    TextDelete {
        parent_id: TagId,
        placement: Placement,
    },
    TextReplace {
        content: String,
        parent_id: TagId,
        placement: Placement,
    },
    AttrAdd {
        tag_id: TagId,
        attribute: String,
        value: String,
    },
    AttrChange {
        tag_id: TagId,
        attribute: String,
        value: String,
    },
    AttrDelete {
        tag_id: TagId,
        attribute: String,
    },
    RememberNodes {
        tag_ids: Vec<TagId>,
    },
}

impl Edit {
    pub fn placement(&self) -> Option<&Placement> {
        match self {
            Edit::ElementInsert { placement, .. }
            | Edit::ElementMove { placement, .. }
            | Edit::TextInsert { placement, .. }
            | Edit::TextDelete { placement, .. }
            | Edit::TextReplace { placement, .. } => Some(placement),
            _ => None,
        }
    }

    fn placement_mut(&mut self) -> Option<&mut Placement> {
        match self {
            Edit::ElementInsert { placement, .. }
            | Edit::ElementMove { placement, .. }
            | Edit::TextInsert { placement, .. }
            | Edit::TextDelete { placement, .. }
            | Edit::TextReplace { placement, .. } => Some(placement),
            _ => None,
        }
    }
}

/// Computes the edits that turn `old` into `new`. With no `old` tree the
/// result inserts the whole of `new`.
pub fn diff(old: Option<&SimpleDom>, new: &SimpleDom) -> Vec<Edit> {
    if let Some(old) = old {
        debug_assert_eq!(old.hash_seed(), new.hash_seed(), "trees use different seeds");
    }

    let mut queue = vec![new.root_index()];
    let mut edits = Vec::new();
    let mut moves = Vec::new();

    while let Some(new_index) = queue.pop() {
        let Some(new_element) = new.element(new_index) else {
            continue;
        };
        let old_match = old.and_then(|old| {
            let index = old.index_of(new_element.tag_id)?;
            Some((old, index, old.element(index)?))
        });

        let Some((old_dom, old_index, old_element)) = old_match else {
            if new.parent(new_index).is_none() {
                edits.push(Edit::ElementInsert {
                    tag: new_element.tag.clone(),
                    tag_id: new_element.tag_id,
                    parent_id: None,
                    attributes: new_element.attributes.clone(),
                    placement: Placement::default(),
                });
            }
            let delta = ChildDiff::new(old, None, new, new_index, new_element.tag_id).run();
            edits.extend(delta.edits);
            moves.extend(delta.moves);
            queue.extend(delta.new_elements);
            continue;
        };

        if new_element.attribute_signature != old_element.attribute_signature {
            attribute_edits(
                old_element.tag_id,
                &old_element.attributes,
                &new_element.attributes,
                &mut edits,
            );
        }

        if new_element.child_signature != old_element.child_signature {
            let delta = ChildDiff::new(
                Some(old_dom),
                Some(old_index),
                new,
                new_index,
                new_element.tag_id,
            )
            .run();
            edits.extend(delta.edits);
            moves.extend(delta.moves);
            queue.extend(delta.new_elements);
        }

        if new_element.subtree_signature != old_element.subtree_signature {
            queue.extend(new.children(new_index).iter().copied().filter(|&child| {
                new.element(child)
                    .is_some_and(|element| old_dom.index_of(element.tag_id).is_some())
            }));
        }
    }

    log::debug!(
        target: "html.dom_diff",
        "{} edits, {} moved elements",
        edits.len(),
        moves.len()
    );
    if !moves.is_empty() {
        edits.insert(0, Edit::RememberNodes { tag_ids: moves });
    }
    edits
}

fn attribute_edits(tag_id: TagId, old: &Attributes, new: &Attributes, edits: &mut Vec<Edit>) {
    let mut remaining = old.clone();
    for (name, value) in new.iter() {
        match remaining.remove(name) {
            Some(previous) if previous == value => {}
            Some(_) => edits.push(Edit::AttrChange {
                tag_id,
                attribute: name.to_string(),
                value: value.to_string(),
            }),
            None => edits.push(Edit::AttrAdd {
                tag_id,
                attribute: name.to_string(),
                value: value.to_string(),
            }),
        }
    }
    for (name, _) in remaining.iter() {
        edits.push(Edit::AttrDelete {
            tag_id,
            attribute: name.to_string(),
        });
    }
}

struct ChildDelta {
    edits: Vec<Edit>,
    moves: Vec<TagId>,
    /// Inserted elements whose children still need edits.
    new_elements: Vec<NodeIndex>,
}

/// Walks the old and new child lists of one element side by side.
struct ChildDiff<'a> {
    old: Option<&'a SimpleDom>,
    new: &'a SimpleDom,
    old_children: &'a [NodeIndex],
    new_children: &'a [NodeIndex],
    /// Element whose children are compared; the old parent shares its id.
    parent_id: TagId,
    old_cursor: usize,
    new_cursor: usize,
    /// Edits still waiting for a `before_id`.
    pending: Vec<Edit>,
    /// Sibling that text edits are placed after.
    text_after_id: Option<TagId>,
    delta: ChildDelta,
}

impl<'a> ChildDiff<'a> {
    fn new(
        old: Option<&'a SimpleDom>,
        old_parent: Option<NodeIndex>,
        new: &'a SimpleDom,
        new_parent: NodeIndex,
        parent_id: TagId,
    ) -> Self {
        let old_children = match (old, old_parent) {
            (Some(old), Some(parent)) => old.children(parent),
            _ => &[],
        };
        Self {
            old,
            new,
            old_children,
            new_children: new.children(new_parent),
            parent_id,
            old_cursor: 0,
            new_cursor: 0,
            pending: Vec::new(),
            text_after_id: None,
            delta: ChildDelta {
                edits: Vec::new(),
                moves: Vec::new(),
                new_elements: Vec::new(),
            },
        }
    }

    fn run(mut self) -> ChildDelta {
        while self.new_cursor < self.new_children.len() && self.old_cursor < self.old_children.len()
        {
            let new_child = self.new_children[self.new_cursor];
            if self.is_new_element(new_child) && self.add_element_move(new_child) {
                continue;
            }

            let old_child = self.old_children[self.old_cursor];
            if self.has_moved(old_child) {
                // Handled where the element was moved to.
                self.old_cursor += 1;
                continue;
            }

            let new_is_element = self.is_new_element(new_child);
            let old_is_element = self.is_old_element(old_child);
            match (new_is_element, old_is_element) {
                (true, false) => {
                    self.add_text_delete(old_child);
                    self.add_element_insert(new_child);
                }
                (false, true) => {
                    if !self.add_element_delete(old_child) {
                        self.add_text_insert(new_child);
                    }
                }
                (true, true) => {
                    let new_id = self.new_tag_id(new_child);
                    let old_id = self.old_tag_id(old_child);
                    if new_id != old_id {
                        if !self.add_element_delete(old_child)
                            && !self.add_element_insert(new_child)
                        {
                            log::error!(
                                target: "html.dom_diff",
                                "elements {new_id:?} and {old_id:?} were reordered; skipping both"
                            );
                            self.new_cursor += 1;
                            self.old_cursor += 1;
                        }
                    } else {
                        if let Some(id) = old_id {
                            self.finalize_pending(id, false);
                        }
                        self.new_cursor += 1;
                        self.old_cursor += 1;
                    }
                }
                (false, false) => {
                    let new_text = self.new.text(new_child);
                    let old_signature = self
                        .old
                        .and_then(|old| old.text(old_child))
                        .map(|text| text.text_signature);
                    if let Some(new_text) = new_text
                        && Some(new_text.text_signature) != old_signature
                    {
                        let edit = Edit::TextReplace {
                            content: new_text.content.clone(),
                            parent_id: self.parent_id,
                            placement: Placement {
                                after_id: self.text_after_id,
                                ..Placement::default()
                            },
                        };
                        self.pending.push(edit);
                    }
                    self.new_cursor += 1;
                    self.old_cursor += 1;
                }
            }
        }

        while self.old_cursor < self.old_children.len() {
            let old_child = self.old_children[self.old_cursor];
            if self.has_moved(old_child) {
                self.old_cursor += 1;
            } else if self.is_old_element(old_child) {
                if !self.add_element_delete(old_child) {
                    log::error!(target: "html.dom_diff", "leftover element could not be deleted");
                    self.old_cursor += 1;
                }
            } else {
                self.add_text_delete(old_child);
            }
        }

        while self.new_cursor < self.new_children.len() {
            let new_child = self.new_children[self.new_cursor];
            if self.is_new_element(new_child) {
                if !self.add_element_move(new_child) && !self.add_element_insert(new_child) {
                    log::error!(target: "html.dom_diff", "leftover element could not be inserted");
                    self.new_cursor += 1;
                }
            } else {
                self.add_text_insert(new_child);
            }
        }

        // Whatever is left goes at the end of the parent.
        for edit in &mut self.pending {
            if let Edit::TextInsert { placement, .. }
            | Edit::ElementInsert { placement, .. }
            | Edit::ElementMove { placement, .. } = edit
            {
                placement.last_child = true;
                placement.first_child = false;
                placement.after_id = None;
            }
        }
        self.delta.edits.append(&mut self.pending);
        self.delta
    }

    fn finalize_pending(&mut self, before_id: TagId, being_deleted: bool) {
        for edit in &mut self.pending {
            if let Some(placement) = edit.placement_mut() {
                placement.before_id = Some(before_id);
            }
        }
        self.delta.edits.append(&mut self.pending);
        // A deleted sibling cannot anchor later text edits.
        if !being_deleted {
            self.text_after_id = Some(before_id);
        }
    }

    fn add_element_insert(&mut self, new_child: NodeIndex) -> bool {
        let Some(element) = self.new.element(new_child) else {
            return false;
        };
        if self.old_has(element.tag_id) {
            return false;
        }
        self.pending.push(Edit::ElementInsert {
            tag: element.tag.clone(),
            tag_id: element.tag_id,
            parent_id: Some(self.parent_id),
            attributes: element.attributes.clone(),
            placement: Placement::default(),
        });
        self.delta.new_elements.push(new_child);
        self.text_after_id = Some(element.tag_id);
        self.new_cursor += 1;
        true
    }

    fn add_element_delete(&mut self, old_child: NodeIndex) -> bool {
        let Some(tag_id) = self.old_tag_id(old_child) else {
            return false;
        };
        if self.new.index_of(tag_id).is_some() {
            return false;
        }
        self.finalize_pending(tag_id, true);
        self.pending.push(Edit::ElementDelete { tag_id });
        self.old_cursor += 1;
        true
    }

    fn add_text_insert(&mut self, new_child: NodeIndex) {
        let content = self
            .new
            .text(new_child)
            .map(|text| text.content.clone())
            .unwrap_or_default();
        let placement = match self.text_after_id {
            Some(after_id) => Placement {
                after_id: Some(after_id),
                ..Placement::default()
            },
            None => Placement {
                first_child: true,
                ..Placement::default()
            },
        };
        self.pending.push(Edit::TextInsert {
            content,
            parent_id: self.parent_id,
            placement,
        });
        self.new_cursor += 1;
    }

    fn add_text_delete(&mut self, old_child: NodeIndex) {
        // Text right before the cursor in the new tree replaces the old text.
        let replacement = self
            .new_cursor
            .checked_sub(1)
            .and_then(|previous| self.new.text(self.new_children[previous]))
            .map(|text| text.content.clone());

        // Several old text nodes can collapse into one new one; a single
        // replace covers them.
        if let Some(Edit::TextReplace { placement, .. }) = self.pending.last()
            && placement.after_id == self.text_after_id
        {
            self.old_cursor += 1;
            return;
        }

        let Some(old) = self.old else {
            self.old_cursor += 1;
            return;
        };
        let old_parent = old.parent(old_child);
        let parent_id = self.parent_id;
        let only_child = old_parent.is_some_and(|parent| old.children(parent).len() == 1);
        let placement = Placement {
            after_id: if only_child { None } else { self.text_after_id },
            ..Placement::default()
        };
        let edit = match replacement {
            Some(content) => Edit::TextReplace {
                content,
                parent_id,
                placement,
            },
            None => Edit::TextDelete {
                parent_id,
                placement,
            },
        };
        self.pending.push(edit);
        self.old_cursor += 1;
    }

    fn add_element_move(&mut self, new_child: NodeIndex) -> bool {
        let Some(tag_id) = self.new_tag_id(new_child) else {
            return false;
        };
        let Some(old) = self.old else {
            return false;
        };
        let Some(old_index) = old.index_of(tag_id) else {
            return false;
        };
        if old.parent_tag_id(old_index) == Some(self.parent_id) {
            return false;
        }
        self.pending.push(Edit::ElementMove {
            tag_id,
            parent_id: self.parent_id,
            placement: Placement::default(),
        });
        self.delta.moves.push(tag_id);
        self.new_cursor += 1;
        true
    }

    /// An old element that now lives under a different parent.
    fn has_moved(&self, old_child: NodeIndex) -> bool {
        let Some(old) = self.old else {
            return false;
        };
        let Some(tag_id) = self.old_tag_id(old_child) else {
            return false;
        };
        let Some(new_index) = self.new.index_of(tag_id) else {
            return false;
        };
        old.parent_tag_id(old_child) != self.new.parent_tag_id(new_index)
    }

    fn old_has(&self, tag_id: TagId) -> bool {
        self.old.is_some_and(|old| old.index_of(tag_id).is_some())
    }

    fn is_new_element(&self, index: NodeIndex) -> bool {
        self.new.element(index).is_some()
    }

    fn is_old_element(&self, index: NodeIndex) -> bool {
        self.old_tag_id(index).is_some()
    }

    fn new_tag_id(&self, index: NodeIndex) -> Option<TagId> {
        self.new.element(index).map(|element| element.tag_id)
    }

    fn old_tag_id(&self, index: NodeIndex) -> Option<TagId> {
        self.old
            .and_then(|old| old.element(index))
            .map(|element| element.tag_id)
    }
}
