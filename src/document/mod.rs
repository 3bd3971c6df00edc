// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The document the engine anchors into, seen through a narrow trait.
//!
//! The engine never owns the tree. Other code inserts and removes nodes
//! whenever it likes, so every handle the engine holds is a `NodeId` that may
//! have gone stale by the time it is used. The trait is split in two:
//!
//! - **Primitives** (required): accessors plus create/insert/detach/discard.
//!   An implementation over any tree with stable node identities fits here.
//! - **Derived operations** (provided): attachment checks, leaf walks,
//!   `replace_node`, `normalize_siblings`. These are the operations the
//!   anchoring core actually consumes, written once on top of the primitives.
//!
//! [`ArenaDocument`] is the in-crate implementation: a slot arena with parent
//! and child indices.

mod arena;
pub mod markup;

pub use arena::{ArenaDocument, NodeKind};

use crate::error::DocumentError;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};

/// Tag, attributes and visibility of a branch node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    /// Attributes in insertion order. Names are lowercase.
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        ElementData {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style class appender.
    pub fn with_class(mut self, class: &str) -> Self {
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", &joined);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attrs.push((name, value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let position = self
            .attrs
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(position).1)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn aria_label(&self) -> Option<&str> {
        self.attr("aria-label")
    }

    /// `hidden` attribute, or `aria-hidden="true"`.
    pub fn is_hidden(&self) -> bool {
        self.attr("hidden").is_some() || self.attr("aria-hidden") == Some("true")
    }

    /// 1-6 for `h1`..`h6`, or the `aria-level` of a `role="heading"` element.
    pub fn heading_level(&self) -> Option<u8> {
        let bytes = self.tag.as_bytes();
        if bytes.len() == 2 && bytes[0] == b'h' && (b'1'..=b'6').contains(&bytes[1]) {
            return Some(bytes[1] - b'0');
        }
        if self.attr("role") == Some("heading") {
            return Some(
                self.attr("aria-level")
                    .and_then(|level| level.parse().ok())
                    .unwrap_or(2),
            );
        }
        None
    }
}

/// A mutable, ordered tree of element and text nodes.
pub trait Document {
    // -------------------------------------------------------------------------
    // Primitives
    // -------------------------------------------------------------------------

    /// The document root. Always an element, always attached.
    fn root(&self) -> NodeId;

    /// Whether the handle names a live node (attached or not).
    fn is_live(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children in order. Empty for text nodes and dead handles.
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Text of a text node; `None` for elements and dead handles.
    fn text(&self, node: NodeId) -> Option<&str>;

    fn element(&self, node: NodeId) -> Option<&ElementData>;

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData>;

    /// New detached text node.
    fn create_text(&mut self, text: &str) -> NodeId;

    /// New detached element.
    fn create_element(&mut self, data: ElementData) -> NodeId;

    fn set_text(&mut self, node: NodeId, text: String) -> Result<(), DocumentError>;

    /// Move `child` under `parent`, before `reference` (or last when `None`).
    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DocumentError>;

    /// Unlink a node from its parent. The node stays live.
    fn detach(&mut self, node: NodeId) -> Result<(), DocumentError>;

    /// Detach and free a node with its whole subtree. Handles go stale.
    fn discard(&mut self, node: NodeId);

    // -------------------------------------------------------------------------
    // Derived operations
    // -------------------------------------------------------------------------

    /// Live and connected to the root.
    fn is_attached(&self, node: NodeId) -> bool {
        if !self.is_live(node) {
            return false;
        }
        let root = self.root();
        let mut current = node;
        loop {
            if current == root {
                return true;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Inclusive ancestry test: `node` is `ancestor` or below it.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        self.insert_before(parent, child, None)
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let position = siblings.iter().position(|&c| c == node)?;
        siblings.get(position + 1).copied()
    }

    /// Concatenated text of every text node under `node`, in order.
    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for leaf in self.walk_leaf_text_nodes(node, &|_| false) {
            if let Some(text) = self.text(leaf) {
                out.push_str(text);
            }
        }
        out
    }

    /// Text nodes under `root` in document order, skipping any element
    /// subtree for which `exclude` returns true.
    fn walk_leaf_text_nodes(
        &self,
        root: NodeId,
        exclude: &dyn Fn(&ElementData) -> bool,
    ) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.text(node).is_some() {
                leaves.push(node);
                continue;
            }
            match self.element(node) {
                Some(data) if !exclude(data) => {
                    stack.extend(self.children(node).iter().rev().copied());
                }
                _ => {}
            }
        }
        leaves
    }

    /// Put `new` where `old` is and detach `old`.
    fn replace_node(&mut self, old: NodeId, new: NodeId) -> Result<(), DocumentError> {
        let parent = self.parent(old).ok_or(DocumentError::MissingNode(old))?;
        self.insert_before(parent, new, Some(old))?;
        self.detach(old)
    }

    /// Merge runs of adjacent text children into their first node and drop
    /// empty text children.
    fn normalize_siblings(&mut self, parent: NodeId) -> Result<(), DocumentError> {
        if self.element(parent).is_none() {
            return Err(DocumentError::NotAnElement(parent));
        }
        let children: Vec<NodeId> = self.children(parent).to_vec();
        let mut run_head: Option<(NodeId, String)> = None;
        let mut doomed = Vec::new();

        for child in children {
            match self.text(child).map(str::to_string) {
                Some(text) => match run_head.as_mut() {
                    Some((_, buffer)) => {
                        buffer.push_str(&text);
                        doomed.push(child);
                    }
                    None => run_head = Some((child, text)),
                },
                None => {
                    if let Some((head, buffer)) = run_head.take() {
                        flush_text_run(self, head, buffer, &mut doomed)?;
                    }
                }
            }
        }
        if let Some((head, buffer)) = run_head.take() {
            flush_text_run(self, head, buffer, &mut doomed)?;
        }

        for node in doomed {
            self.discard(node);
        }
        Ok(())
    }
}

/// Write a merged run back into its head node; an empty run dies entirely.
fn flush_text_run<D: Document + ?Sized>(
    doc: &mut D,
    head: NodeId,
    buffer: String,
    doomed: &mut Vec<NodeId>,
) -> Result<(), DocumentError> {
    if buffer.is_empty() {
        doomed.push(head);
        Ok(())
    } else {
        doc.set_text(head, buffer)
    }
}
