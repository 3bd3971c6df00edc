// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Wrapping ranges in boundary elements, and unwrapping them again.
//!
//! # Apply
//!
//! Both boundary text nodes are split first, so the selection is made of whole
//! nodes. Then one of two paths runs:
//!
//! - **Surround**: start and end share a parent. The selected siblings move
//!   into the wrapper and the wrapper takes their place.
//! - **Extract**: the range crosses element boundaries. Every ancestor that is
//!   only partly selected is shallow-cloned into the wrapper and receives the
//!   selected part of its children; fully selected nodes in between move as
//!   they are. The wrapper is inserted where the selection used to begin.
//!
//! Empty text fragments and emptied ancestors left behind by the split are
//! discarded afterwards.
//!
//! # Remove
//!
//! The wrapper is replaced by a single text node holding its decoration-free
//! text, then the parent's text children are merged. Inner structure (the
//! clones made by extract) is flattened; the text is what must come back.

use crate::config::EngineConfig;
use crate::document::{Document, ElementData};
use crate::error::{DocumentError, EngineError};
use crate::types::{Highlight, HighlightSource, NodeId, Property, TextRange};
use std::collections::HashSet;
use tracing::debug;

pub const WRAPPER_TAG: &str = "mark";

pub const ATTR_ID: &str = "data-highlight-id";
pub const ATTR_PROPERTY_ID: &str = "data-property-id";
pub const ATTR_PROPERTY_LABEL: &str = "data-property-label";
pub const ATTR_COLOR: &str = "data-color";
pub const ATTR_SOURCE: &str = "data-source";

#[derive(Debug, Clone)]
pub struct Applier {
    highlight_class: String,
    decorations: HashSet<String>,
}

impl Applier {
    pub fn new(config: &EngineConfig) -> Self {
        Applier {
            highlight_class: config.highlight_class.clone(),
            decorations: config.decoration_classes.iter().cloned().collect(),
        }
    }

    /// Element data for a wrapper carrying these attributes.
    pub fn wrapper_data(
        &self,
        id: &str,
        property: &Property,
        color: &str,
        source: HighlightSource,
    ) -> ElementData {
        ElementData::new(WRAPPER_TAG)
            .with_class(&self.highlight_class)
            .with_attr(ATTR_ID, id)
            .with_attr(ATTR_PROPERTY_ID, &property.id)
            .with_attr(ATTR_PROPERTY_LABEL, &property.label)
            .with_attr(ATTR_COLOR, color)
            .with_attr(ATTR_SOURCE, source.as_str())
    }

    /// Rewrite a wrapper's attributes from `highlight`.
    pub fn write_attrs<D: Document + ?Sized>(&self, doc: &mut D, highlight: &Highlight) -> bool {
        let Some(data) = doc.element_mut(highlight.boundary) else {
            return false;
        };
        data.set_attr(ATTR_PROPERTY_ID, &highlight.property.id);
        data.set_attr(ATTR_PROPERTY_LABEL, &highlight.property.label);
        data.set_attr(ATTR_COLOR, &highlight.color);
        data.set_attr(ATTR_SOURCE, highlight.source.as_str());
        true
    }

    fn is_decoration(&self, data: &ElementData) -> bool {
        data.classes().any(|class| self.decorations.contains(class))
    }

    /// Text under `wrapper`, skipping decoration subtrees.
    pub fn plain_text<D: Document + ?Sized>(&self, doc: &D, wrapper: NodeId) -> String {
        let exclude = |data: &ElementData| self.is_decoration(data);
        let mut out = String::new();
        for leaf in doc.walk_leaf_text_nodes(wrapper, &exclude) {
            if let Some(text) = doc.text(leaf) {
                out.push_str(text);
            }
        }
        out
    }

    /// Wrap `range` in a new element built from `data`. The range must
    /// already be validated.
    pub fn apply<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        range: &TextRange,
        data: ElementData,
    ) -> Result<NodeId, EngineError> {
        let start = range.start.node;
        let end = range.end.node;

        if start == end {
            let tail = split_text(doc, start, range.end.offset)?;
            let middle = split_text(doc, start, range.start.offset)?;
            let wrapper = surround(doc, middle, middle, data)?;
            discard_empty_text(doc, &[start, tail]);
            debug!(%wrapper, "surrounded single node");
            return Ok(wrapper);
        }

        let tail = split_text(doc, end, range.end.offset)?;
        let head = split_text(doc, start, range.start.offset)?;

        let (wrapper, emptied) = if doc.parent(head) == doc.parent(end) {
            let wrapper = surround(doc, head, end, data)?;
            debug!(%wrapper, "surrounded sibling run");
            (wrapper, Vec::new())
        } else {
            let (wrapper, emptied) = extract(doc, head, end, tail, data)?;
            debug!(%wrapper, "extracted across element boundaries");
            (wrapper, emptied)
        };
        discard_empty_text(doc, &[start, head, end, tail]);
        prune_empty_elements(doc, &emptied);
        Ok(wrapper)
    }

    /// Replace `wrapper` with its decoration-free text and merge the parent's
    /// text children. Returns the text written back.
    pub fn remove<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        wrapper: NodeId,
    ) -> Result<String, EngineError> {
        let parent = doc
            .parent(wrapper)
            .ok_or_else(|| EngineError::invalid_range(format!("wrapper {} is detached", wrapper)))?;
        let plain = self.plain_text(doc, wrapper);
        let replacement = doc.create_text(&plain);
        doc.replace_node(wrapper, replacement)?;
        doc.discard(wrapper);
        doc.normalize_siblings(parent)?;
        Ok(plain)
    }

    /// Re-slice a highlight's original text into before / selected / after,
    /// with a new wrapper (same attributes) around the selected part.
    ///
    /// `original` is the text the wrapper held when it was applied and
    /// `current` is where the wrapper's text sits inside it now. Parts of the
    /// original left outside the wrapper by an earlier resize are taken back
    /// from the neighbouring text nodes first, so bounds always index into
    /// `original` and must satisfy `start < end <= len`.
    pub fn resize<D: Document + ?Sized>(
        &self,
        doc: &mut D,
        wrapper: NodeId,
        original: &str,
        current: (usize, usize),
        bounds: (usize, usize),
    ) -> Result<(NodeId, String), EngineError> {
        let (start, end) = bounds;
        let parent = doc
            .parent(wrapper)
            .ok_or_else(|| EngineError::invalid_range(format!("wrapper {} is detached", wrapper)))?;
        let data = doc
            .element(wrapper)
            .cloned()
            .ok_or(DocumentError::NotAnElement(wrapper))?;
        let chars: Vec<char> = original.chars().collect();
        if start >= end || end > chars.len() {
            return Err(EngineError::invalid_range(format!(
                "resize bounds {}..{} outside 0..{}",
                start,
                end,
                chars.len()
            )));
        }
        let (held_start, held_end) = current;
        if held_start > held_end || held_end > chars.len() {
            return Err(EngineError::invalid_range(format!(
                "held span {}..{} outside 0..{}",
                held_start,
                held_end,
                chars.len()
            )));
        }
        let held: String = chars[held_start..held_end].iter().collect();
        if self.plain_text(&*doc, wrapper) != held {
            return Err(EngineError::invalid_range(format!(
                "wrapper {} no longer holds its text",
                wrapper
            )));
        }

        let siblings = doc.children(parent);
        let position = siblings
            .iter()
            .position(|&n| n == wrapper)
            .ok_or(DocumentError::NotAChild {
                parent,
                child: wrapper,
            })?;
        let previous = position.checked_sub(1).map(|i| siblings[i]);
        let next = siblings.get(position + 1).copied();
        let reclaimed = [
            reclaim(&*doc, previous, &chars[..held_start], true)?,
            reclaim(&*doc, next, &chars[held_end..], false)?,
        ];
        for (node, keep) in reclaimed.into_iter().flatten() {
            doc.set_text(node, keep)?;
        }

        let before: String = chars[..start].iter().collect();
        let selected: String = chars[start..end].iter().collect();
        let after: String = chars[end..].iter().collect();

        let before_node = doc.create_text(&before);
        doc.insert_before(parent, before_node, Some(wrapper))?;
        let fresh = doc.create_element(data);
        doc.insert_before(parent, fresh, Some(wrapper))?;
        let selected_node = doc.create_text(&selected);
        doc.append_child(fresh, selected_node)?;
        let after_node = doc.create_text(&after);
        doc.insert_before(parent, after_node, Some(wrapper))?;

        doc.discard(wrapper);
        doc.normalize_siblings(parent)?;
        debug!(old = %wrapper, new = %fresh, start, end, "wrapper resized");
        Ok((fresh, selected))
    }
}

/// The text node beside a wrapper, and what stays in it once `part` moves
/// back under the highlight. `part` must end the node when `before` is set
/// and start it otherwise.
fn reclaim<D: Document + ?Sized>(
    doc: &D,
    node: Option<NodeId>,
    part: &[char],
    before: bool,
) -> Result<Option<(NodeId, String)>, EngineError> {
    if part.is_empty() {
        return Ok(None);
    }
    let moved =
        || EngineError::invalid_range("text beside the highlight changed since it was resized");
    let node = node.ok_or_else(moved)?;
    let text: Vec<char> = doc.text(node).ok_or_else(moved)?.chars().collect();
    if text.len() < part.len() {
        return Err(moved());
    }
    let (keep, taken) = if before {
        let cut = text.len() - part.len();
        (&text[..cut], &text[cut..])
    } else {
        (&text[part.len()..], &text[..part.len()])
    };
    if taken != part {
        return Err(moved());
    }
    Ok(Some((node, keep.iter().collect())))
}

// ============================================================================
// TREE SURGERY
// ============================================================================

/// Cut `node`'s text at `offset`: `node` keeps `[0, offset)`, a new sibling
/// right after it gets the rest. Returns the new sibling.
fn split_text<D: Document + ?Sized>(
    doc: &mut D,
    node: NodeId,
    offset: usize,
) -> Result<NodeId, EngineError> {
    let text = doc
        .text(node)
        .ok_or(DocumentError::NotAText(node))?;
    let head: String = text.chars().take(offset).collect();
    let tail: String = text.chars().skip(offset).collect();
    let parent = doc
        .parent(node)
        .ok_or(DocumentError::MissingNode(node))?;
    let next = doc.next_sibling(node);

    doc.set_text(node, head)?;
    let rest = doc.create_text(&tail);
    doc.insert_before(parent, rest, next)?;
    Ok(rest)
}

/// Move the sibling run `first..=last` into a new wrapper at the run's position.
fn surround<D: Document + ?Sized>(
    doc: &mut D,
    first: NodeId,
    last: NodeId,
    data: ElementData,
) -> Result<NodeId, EngineError> {
    let parent = doc
        .parent(first)
        .ok_or(DocumentError::MissingNode(first))?;
    let siblings = doc.children(parent);
    let from = siblings
        .iter()
        .position(|&n| n == first)
        .ok_or(DocumentError::NotAChild {
            parent,
            child: first,
        })?;
    let to = siblings
        .iter()
        .position(|&n| n == last)
        .ok_or(DocumentError::NotAChild {
            parent,
            child: last,
        })?;
    let run: Vec<NodeId> = siblings[from..=to].to_vec();

    let wrapper = doc.create_element(data);
    doc.insert_before(parent, wrapper, Some(first))?;
    for node in run {
        doc.append_child(wrapper, node)?;
    }
    Ok(wrapper)
}

/// Ancestors of `node` below `ancestor`, top-down, ending with `node` itself.
fn chain_below<D: Document + ?Sized>(doc: &D, node: NodeId, ancestor: NodeId) -> Vec<NodeId> {
    let mut chain = Vec::new();
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            break;
        }
        chain.push(id);
        current = doc.parent(id);
    }
    chain.reverse();
    chain
}

fn common_ancestor<D: Document + ?Sized>(doc: &D, a: NodeId, b: NodeId) -> Option<NodeId> {
    let mut current = doc.parent(a);
    while let Some(candidate) = current {
        if doc.contains(candidate, b) {
            return Some(candidate);
        }
        current = doc.parent(candidate);
    }
    None
}

fn shallow_clone<D: Document + ?Sized>(doc: &mut D, node: NodeId) -> Result<NodeId, EngineError> {
    let data = doc
        .element(node)
        .cloned()
        .ok_or(DocumentError::NotAnElement(node))?;
    Ok(doc.create_element(data))
}

/// Selection runs from `head` (a text node) through `end` (a text node) in
/// document order; `tail` is the unselected remainder split off `end`.
///
/// Returns the wrapper and the elements that may have been left empty
/// (partly selected originals and their clones), deepest first.
fn extract<D: Document + ?Sized>(
    doc: &mut D,
    head: NodeId,
    end: NodeId,
    tail: NodeId,
    data: ElementData,
) -> Result<(NodeId, Vec<NodeId>), EngineError> {
    let common = common_ancestor(doc, head, end)
        .ok_or_else(|| EngineError::invalid_range("range ends share no ancestor"))?;
    let left = chain_below(doc, head, common);
    let right = chain_below(doc, end, common);
    let (Some(&left_top), Some(&right_top)) = (left.first(), right.first()) else {
        return Err(EngineError::invalid_range("range ends share no ancestor"));
    };

    let siblings = doc.children(common);
    let position = |node: NodeId| siblings.iter().position(|&n| n == node);
    let (Some(from), Some(to)) = (position(left_top), position(right_top)) else {
        return Err(EngineError::invalid_range("range ends are not under their common ancestor"));
    };
    let middle: Vec<NodeId> = siblings[from + 1..to].to_vec();
    let reference = if right.len() == 1 { tail } else { right_top };

    let wrapper = doc.create_element(data);
    let mut clones = Vec::new();
    extract_left(doc, &left, wrapper, &mut clones)?;
    for node in middle {
        doc.append_child(wrapper, node)?;
    }
    extract_right(doc, &right, wrapper, &mut clones)?;
    doc.insert_before(common, wrapper, Some(reference))?;

    let emptied: Vec<NodeId> = left[..left.len() - 1]
        .iter()
        .rev()
        .chain(right[..right.len() - 1].iter().rev())
        .copied()
        .chain(clones)
        .collect();
    Ok((wrapper, emptied))
}

fn extract_left<D: Document + ?Sized>(
    doc: &mut D,
    chain: &[NodeId],
    into: NodeId,
    clones: &mut Vec<NodeId>,
) -> Result<(), EngineError> {
    let Some((&top, rest)) = chain.split_first() else {
        return Ok(());
    };
    let Some(&next) = rest.first() else {
        doc.append_child(into, top)?;
        return Ok(());
    };
    let clone = shallow_clone(doc, top)?;
    doc.append_child(into, clone)?;
    let kids = doc.children(top);
    let following: Vec<NodeId> = kids
        .iter()
        .position(|&n| n == next)
        .map(|i| kids[i + 1..].to_vec())
        .unwrap_or_default();
    extract_left(doc, rest, clone, clones)?;
    for node in following {
        doc.append_child(clone, node)?;
    }
    clones.push(clone);
    Ok(())
}

fn extract_right<D: Document + ?Sized>(
    doc: &mut D,
    chain: &[NodeId],
    into: NodeId,
    clones: &mut Vec<NodeId>,
) -> Result<(), EngineError> {
    let Some((&top, rest)) = chain.split_first() else {
        return Ok(());
    };
    let Some(&next) = rest.first() else {
        doc.append_child(into, top)?;
        return Ok(());
    };
    let clone = shallow_clone(doc, top)?;
    doc.append_child(into, clone)?;
    let kids = doc.children(top);
    let preceding: Vec<NodeId> = kids
        .iter()
        .position(|&n| n == next)
        .map(|i| kids[..i].to_vec())
        .unwrap_or_default();
    for node in preceding {
        doc.append_child(clone, node)?;
    }
    extract_right(doc, rest, clone, clones)?;
    clones.push(clone);
    Ok(())
}

fn discard_empty_text<D: Document + ?Sized>(doc: &mut D, nodes: &[NodeId]) {
    for &node in nodes {
        if doc.text(node).is_some_and(str::is_empty) {
            doc.discard(node);
        }
    }
}

fn prune_empty_elements<D: Document + ?Sized>(doc: &mut D, nodes: &[NodeId]) {
    for &node in nodes {
        if doc.element(node).is_some() && doc.children(node).is_empty() {
            doc.discard(node);
        }
    }
}
