// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Anchoring: snapshot offsets → document ranges, and back to text.
//!
//! A match is found in flattened coordinates. To touch the document it has to
//! become two boundary points in real text nodes. The offset table makes that
//! a binary search per endpoint.
//!
//! The end boundary lives in the node that holds the *last* matched char, not
//! the node that starts at `end`. A match that ends exactly at a node boundary
//! therefore ends at `len` of the earlier node, and never drags an empty
//! selection of the following node along. Ends that land in whitespace-only
//! nodes are pulled inward to the nearest node with real text.

use crate::contracts::check_range_ordered;
use crate::document::Document;
use crate::error::EngineError;
use crate::index::Snapshot;
use crate::types::{Anchor, TextRange};
use tracing::warn;

/// Resolve snapshot span `[start, end)` to a document range.
pub fn resolve(snapshot: &Snapshot, start: usize, end: usize) -> Result<TextRange, EngineError> {
    if snapshot.is_empty() {
        return Err(EngineError::invalid_range("snapshot is empty"));
    }
    if start >= end {
        return Err(EngineError::invalid_range(format!(
            "empty span {}..{}",
            start, end
        )));
    }
    let len = snapshot.len();
    let (start, end) = if end > len {
        warn!(start, end, len, "span past end of snapshot, clamping");
        (start.min(len - 1), len)
    } else {
        (start, end)
    };
    let (start, end) = snapshot
        .tighten(start, end)
        .ok_or_else(|| EngineError::invalid_range("span covers only whitespace nodes"))?;

    let first = snapshot
        .node_index_at(start)
        .ok_or_else(|| EngineError::invalid_range("start outside snapshot"))?;
    let last = snapshot
        .node_index_at(end - 1)
        .ok_or_else(|| EngineError::invalid_range("end outside snapshot"))?;

    let starts = snapshot.starts();
    let nodes = snapshot.nodes();
    let range = TextRange::new(
        Anchor::new(nodes[first], start - starts[first]),
        Anchor::new(nodes[last], end - starts[last]),
    );
    check_range_ordered(first, last, &range);
    Ok(range)
}

/// Check that a range can be acted on: both ends attached text nodes, offsets
/// in bounds, start before end.
pub fn validate<D: Document + ?Sized>(doc: &D, range: &TextRange) -> Result<(), EngineError> {
    for (label, anchor) in [("start", range.start), ("end", range.end)] {
        if !doc.is_attached(anchor.node) {
            return Err(EngineError::invalid_range(format!(
                "{} node {} is not attached",
                label, anchor.node
            )));
        }
        let Some(text) = doc.text(anchor.node) else {
            return Err(EngineError::invalid_range(format!(
                "{} node {} is not a text node",
                label, anchor.node
            )));
        };
        let len = text.chars().count();
        if anchor.offset > len {
            return Err(EngineError::invalid_range(format!(
                "{} offset {} past node length {}",
                label, anchor.offset, len
            )));
        }
    }
    if range.is_single_node() {
        if range.start.offset >= range.end.offset {
            return Err(EngineError::invalid_range("range is empty or reversed"));
        }
        return Ok(());
    }
    if !precedes(doc, range) {
        return Err(EngineError::invalid_range("end precedes start"));
    }
    Ok(())
}

/// Whether the start node comes before the end node in document order.
fn precedes<D: Document + ?Sized>(doc: &D, range: &TextRange) -> bool {
    let leaves = doc.walk_leaf_text_nodes(doc.root(), &|_| false);
    let start = leaves.iter().position(|&n| n == range.start.node);
    let end = leaves.iter().position(|&n| n == range.end.node);
    matches!((start, end), (Some(s), Some(e)) if s < e)
}

/// The document's text under `range`, read from the live tree.
///
/// Assumes [`validate`] passed.
pub fn range_text<D: Document + ?Sized>(doc: &D, range: &TextRange) -> String {
    let slice = |text: &str, from: usize, to: usize| -> String {
        text.chars().skip(from).take(to.saturating_sub(from)).collect()
    };
    if range.is_single_node() {
        return doc
            .text(range.start.node)
            .map(|t| slice(t, range.start.offset, range.end.offset))
            .unwrap_or_default();
    }

    let mut out = String::new();
    let mut inside = false;
    for leaf in doc.walk_leaf_text_nodes(doc.root(), &|_| false) {
        let text = doc.text(leaf).unwrap_or("");
        if leaf == range.start.node {
            out.push_str(&slice(text, range.start.offset, usize::MAX));
            inside = true;
        } else if leaf == range.end.node {
            out.push_str(&slice(text, 0, range.end.offset));
            break;
        } else if inside {
            out.push_str(text);
        }
    }
    out
}
