// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The authoritative id → highlight map and its two secondary indices.
//!
//! The element index is keyed by wrapper [`NodeId`]. Handles are plain
//! values, so an entry never keeps a detached wrapper alive; a stale entry is
//! only ever a lookup miss.

use crate::contracts::check_registry_consistent;
use crate::types::{Highlight, HighlightSource, NodeId};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct HighlightRegistry {
    highlights: HashMap<String, Highlight>,
    /// Creation order, for stable listings.
    order: Vec<String>,
    by_source: HashMap<HighlightSource, HashSet<String>>,
    by_element: HashMap<NodeId, String>,
}

impl HighlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.highlights.contains_key(id)
    }

    /// Add a highlight. Returns false, changing nothing, if the id is taken.
    pub fn register(&mut self, highlight: Highlight) -> bool {
        if self.highlights.contains_key(&highlight.id) {
            return false;
        }
        let id = highlight.id.clone();
        self.by_source
            .entry(highlight.source)
            .or_default()
            .insert(id.clone());
        self.by_element.insert(highlight.boundary, id.clone());
        self.order.push(id.clone());
        self.highlights.insert(id, highlight);
        self.check();
        true
    }

    /// Remove from every index.
    pub fn unregister(&mut self, id: &str) -> Option<Highlight> {
        let highlight = self.highlights.remove(id)?;
        if let Some(ids) = self.by_source.get_mut(&highlight.source) {
            ids.remove(id);
        }
        if self.by_element.get(&highlight.boundary).is_some_and(|owner| owner == id) {
            self.by_element.remove(&highlight.boundary);
        }
        self.order.retain(|existing| existing != id);
        self.check();
        Some(highlight)
    }

    pub fn get(&self, id: &str) -> Option<&Highlight> {
        self.highlights.get(id)
    }

    /// Mutable access for in-place updates. The wrapper and source must not
    /// be changed through it; use [`rebind`](Self::rebind) for the wrapper.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Highlight> {
        self.highlights.get_mut(id)
    }

    /// All highlights, oldest first.
    pub fn all(&self) -> Vec<&Highlight> {
        self.order
            .iter()
            .filter_map(|id| self.highlights.get(id))
            .collect()
    }

    /// Highlights from `source`, oldest first.
    pub fn by_source(&self, source: HighlightSource) -> Vec<&Highlight> {
        let Some(ids) = self.by_source.get(&source) else {
            return Vec::new();
        };
        self.order
            .iter()
            .filter(|id| ids.contains(*id))
            .filter_map(|id| self.highlights.get(id))
            .collect()
    }

    /// Id of the highlight whose wrapper is `element`.
    pub fn find_by_element(&self, element: NodeId) -> Option<&str> {
        self.by_element.get(&element).map(String::as_str)
    }

    /// Point a highlight at a new wrapper holding `span` of its original
    /// text, keeping its id.
    pub fn rebind(
        &mut self,
        id: &str,
        wrapper: NodeId,
        text: String,
        span: (usize, usize),
    ) -> Option<&Highlight> {
        let highlight = self.highlights.get_mut(id)?;
        let old = std::mem::replace(&mut highlight.boundary, wrapper);
        highlight.text = text;
        highlight.span = span;
        self.by_element.remove(&old);
        self.by_element.insert(wrapper, id.to_string());
        self.check();
        self.highlights.get(id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn clear(&mut self) {
        self.highlights.clear();
        self.order.clear();
        self.by_source.clear();
        self.by_element.clear();
    }

    pub fn len(&self) -> usize {
        self.highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty()
    }

    fn check(&self) {
        let by_source: usize = self.by_source.values().map(HashSet::len).sum();
        check_registry_consistent(self.highlights.len(), by_source, self.by_element.len());
    }
}
