// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Slot arena implementation of [`Document`].
//!
//! Nodes live in a `Vec` of slots. A slot carries a generation counter that is
//! bumped every time the slot is freed, and a `NodeId` is only honoured while
//! its generation matches. Freed slots go on a free list and are reused, which
//! is exactly the situation generations exist for.

use super::{Document, ElementData};
use crate::error::DocumentError;
use crate::types::NodeId;

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Entry {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// A document stored as an arena of nodes with parent/child indices.
#[derive(Debug, Clone)]
pub struct ArenaDocument {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Default for ArenaDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaDocument {
    /// Empty document rooted at a `body` element.
    pub fn new() -> Self {
        Self::with_root(ElementData::new("body"))
    }

    pub fn with_root(data: ElementData) -> Self {
        let mut doc = ArenaDocument {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId::new(0, 0),
        };
        doc.root = doc.alloc(NodeKind::Element(data));
        doc
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.entry(node).map(|entry| &entry.kind)
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        data: ElementData,
    ) -> Result<NodeId, DocumentError> {
        let node = self.create_element(data);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId, DocumentError> {
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(node)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let entry = Entry {
            parent: None,
            children: Vec::new(),
            kind,
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entry = Some(entry);
                NodeId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                NodeId::new(index, 0)
            }
        }
    }

    fn entry(&self, node: NodeId) -> Option<&Entry> {
        let slot = self.slots.get(node.index())?;
        if slot.generation != node.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, node: NodeId) -> Option<&mut Entry> {
        let slot = self.slots.get_mut(node.index())?;
        if slot.generation != node.generation() {
            return None;
        }
        slot.entry.as_mut()
    }

    fn free_slot(&mut self, node: NodeId) {
        if let Some(slot) = self.slots.get_mut(node.index()) {
            if slot.generation == node.generation() && slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(node.index() as u32);
            }
        }
    }
}

impl Document for ArenaDocument {
    fn root(&self) -> NodeId {
        self.root
    }

    fn is_live(&self, node: NodeId) -> bool {
        self.entry(node).is_some()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.entry(node).and_then(|entry| entry.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.entry(node)
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.entry(node)?.kind {
            NodeKind::Text(text) => Some(text.as_str()),
            NodeKind::Element(_) => None,
        }
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        match &self.entry(node)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.entry_mut(node)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    fn create_element(&mut self, data: ElementData) -> NodeId {
        self.alloc(NodeKind::Element(data))
    }

    fn set_text(&mut self, node: NodeId, text: String) -> Result<(), DocumentError> {
        let entry = self
            .entry_mut(node)
            .ok_or(DocumentError::MissingNode(node))?;
        match &mut entry.kind {
            NodeKind::Text(existing) => {
                *existing = text;
                Ok(())
            }
            NodeKind::Element(_) => Err(DocumentError::NotAText(node)),
        }
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DocumentError> {
        if self.element(parent).is_none() {
            return Err(if self.is_live(parent) {
                DocumentError::NotAnElement(parent)
            } else {
                DocumentError::MissingNode(parent)
            });
        }
        if !self.is_live(child) {
            return Err(DocumentError::MissingNode(child));
        }
        if self.contains(child, parent) {
            return Err(DocumentError::WouldCycle { parent, child });
        }
        if let Some(reference) = reference {
            if reference == child {
                return Ok(());
            }
            if self.parent(reference) != Some(parent) {
                return Err(DocumentError::NotAChild {
                    parent,
                    child: reference,
                });
            }
        }

        self.detach(child)?;

        let siblings = &mut self
            .entry_mut(parent)
            .ok_or(DocumentError::MissingNode(parent))?
            .children;
        let position = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(position, child);

        if let Some(entry) = self.entry_mut(child) {
            entry.parent = Some(parent);
        }
        Ok(())
    }

    fn detach(&mut self, node: NodeId) -> Result<(), DocumentError> {
        let parent = match self.entry(node) {
            Some(entry) => entry.parent,
            None => return Err(DocumentError::MissingNode(node)),
        };
        if let Some(parent) = parent {
            if let Some(entry) = self.entry_mut(parent) {
                entry.children.retain(|&c| c != node);
            }
            if let Some(entry) = self.entry_mut(node) {
                entry.parent = None;
            }
        }
        Ok(())
    }

    fn discard(&mut self, node: NodeId) {
        if node == self.root || self.detach(node).is_err() {
            return;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            stack.extend(self.children(current).iter().copied());
            self.free_slot(current);
        }
    }
}
