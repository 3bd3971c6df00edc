// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A frozen projection of a subtree's text.
//!
//! The snapshot holds three parallel views of the same content: the ordered
//! text nodes, their concatenated text (as `String` and as `Vec<char>`, plus a
//! case-folded copy), and a cumulative offset table. `starts[i]` is the char
//! offset at which `nodes[i]` begins, so offset→node is one binary search.
//!
//! Nodes are concatenated with no separator, which is what the text content of
//! the subtree would read as. Whitespace-only nodes (the space in
//! `<b>quick</b> <i>brown</i>`) stay in the text so literal queries span them,
//! but they are marked blank and never become a range endpoint; see
//! [`Snapshot::tighten`].
//!
//! # Invariants
//!
//! - `starts` is strictly increasing and `starts[0] == 0` (empty nodes are
//!   never captured, so no node has zero width).
//! - `chars.len() == folded.len()` and both equal the total text length.
//!
//! Checked in debug builds by `contracts::check_snapshot_well_formed`.

use super::exclude::Exclusion;
use super::Scope;
use crate::contracts::check_snapshot_well_formed;
use crate::document::{Document, ElementData};
use crate::normalize::fold_char;
use crate::types::NodeId;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Snapshot {
    scope: Scope,
    nodes: Vec<NodeId>,
    starts: Vec<usize>,
    blank: Vec<bool>,
    text: String,
    chars: Vec<char>,
    folded: Vec<char>,
    stamp: u64,
    captured_at: Instant,
}

impl Snapshot {
    /// A snapshot with no content, for detached or excluded scopes.
    pub fn empty(scope: Scope, stamp: u64) -> Self {
        Snapshot {
            scope,
            nodes: Vec::new(),
            starts: Vec::new(),
            blank: Vec::new(),
            text: String::new(),
            chars: Vec::new(),
            folded: Vec::new(),
            stamp,
            captured_at: Instant::now(),
        }
    }

    /// Walk `roots` in order and capture their non-empty text leaves.
    pub fn capture<D: Document + ?Sized>(
        doc: &D,
        scope: Scope,
        roots: &[NodeId],
        exclusion: &Exclusion,
        stamp: u64,
    ) -> Self {
        let mut snapshot = Snapshot::empty(scope, stamp);
        let exclude = |data: &ElementData| exclusion.excludes(data);

        for &root in roots {
            if !doc.is_attached(root) || exclusion.excludes_chain(doc, root) {
                continue;
            }
            for leaf in doc.walk_leaf_text_nodes(root, &exclude) {
                let Some(text) = doc.text(leaf) else {
                    continue;
                };
                if text.is_empty() {
                    continue;
                }
                snapshot.starts.push(snapshot.chars.len());
                snapshot.nodes.push(leaf);
                snapshot.blank.push(text.trim().is_empty());
                snapshot.text.push_str(text);
                for c in text.chars() {
                    snapshot.chars.push(c);
                    snapshot.folded.push(fold_char(c));
                }
            }
        }

        check_snapshot_well_formed(&snapshot);
        snapshot
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn starts(&self) -> &[usize] {
        &self.starts
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Case-folded text, offset-aligned with [`chars`](Self::chars).
    pub fn folded(&self) -> &[char] {
        &self.folded
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    pub fn age(&self) -> Duration {
        self.captured_at.elapsed()
    }

    /// `[start, end)` of node `i` in snapshot offsets.
    pub fn node_span(&self, i: usize) -> Option<(usize, usize)> {
        let start = *self.starts.get(i)?;
        let end = self.starts.get(i + 1).copied().unwrap_or(self.chars.len());
        Some((start, end))
    }

    /// Index of the node holding the char at `offset`.
    pub fn node_index_at(&self, offset: usize) -> Option<usize> {
        if offset >= self.chars.len() {
            return None;
        }
        Some(self.starts.partition_point(|&s| s <= offset) - 1)
    }

    /// Whether node `i` holds only whitespace.
    pub fn is_blank(&self, i: usize) -> bool {
        self.blank.get(i).copied().unwrap_or(false)
    }

    /// Shrink `[start, end)` until both ends fall in non-blank nodes.
    ///
    /// `None` when the span is empty, out of range, or covers blank nodes only.
    pub fn tighten(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        let end = end.min(self.len());
        if start >= end {
            return None;
        }
        let first = self.node_index_at(start)?;
        let last = self.node_index_at(end - 1)?;
        let first = (first..=last).find(|&i| !self.is_blank(i))?;
        let last = (first..=last).rev().find(|&i| !self.is_blank(i))?;
        let start = start.max(self.starts[first]);
        let end = end.min(self.node_span(last)?.1);
        (start < end).then_some((start, end))
    }

    /// Text of `[start, end)`, clamped to the snapshot.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Still usable: within TTL, every node attached, every node's text unchanged.
    ///
    /// Newly inserted nodes are invisible to this check; that is what the
    /// explicit invalidation signal and the TTL are for.
    pub fn is_current<D: Document + ?Sized>(&self, doc: &D, ttl: Duration) -> bool {
        if self.age() >= ttl {
            return false;
        }
        self.nodes.iter().enumerate().all(|(i, &node)| {
            if !doc.is_attached(node) {
                return false;
            }
            let (start, end) = match self.node_span(i) {
                Some(span) => span,
                None => return false,
            };
            match doc.text(node) {
                Some(text) => text.chars().eq(self.chars[start..end].iter().copied()),
                None => false,
            }
        })
    }
}
