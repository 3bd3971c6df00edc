// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The value types that flow between the engine and its callers.
//!
//! Nothing here owns a piece of the document. `NodeId` is a generational
//! handle: it names a slot *and* the incarnation of that slot, so a handle kept
//! past a node's removal can never silently point at whatever reused the slot.
//! That is the whole of our "weak reference" story, and it is enough.
//!
//! # Invariants
//!
//! - **Anchor**: `offset <= text(node).chars().count()`. Offsets are in Unicode
//!   scalar values, never bytes.
//! - **TextRange**: `start` precedes or equals `end` in document order; when both
//!   sit in the same node, `start.offset <= end.offset`.
//! - **MatchResult**: immutable once built. `start..end` are char offsets into
//!   the concatenated text of the scope the match was made in.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// NODE HANDLES
// =============================================================================

/// Generational handle to a node in a [`Document`](crate::document::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        NodeId { index, generation }
    }

    /// Slot index, for arena lookups.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// RANGES
// =============================================================================

/// A boundary point: a text node plus a char offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub node: NodeId,
    pub offset: usize,
}

impl Anchor {
    #[inline]
    pub fn new(node: NodeId, offset: usize) -> Self {
        Anchor { node, offset }
    }
}

/// A span between two anchors. Both anchors sit in text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Anchor,
    pub end: Anchor,
}

impl TextRange {
    #[inline]
    pub fn new(start: Anchor, end: Anchor) -> Self {
        TextRange { start, end }
    }

    /// Range inside a single text node.
    #[inline]
    pub fn within(node: NodeId, start: usize, end: usize) -> Self {
        TextRange {
            start: Anchor::new(node, start),
            end: Anchor::new(node, end),
        }
    }

    #[inline]
    pub fn is_single_node(&self) -> bool {
        self.start.node == self.end.node
    }
}

// =============================================================================
// SEARCH RESULTS
// =============================================================================

/// Which strategy in the chain produced a match.
///
/// Declaration order is chain order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Exact,
    Section,
    Normalized,
    Fuzzy,
    Partial,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Section => "section",
            Strategy::Normalized => "normalized",
            Strategy::Fuzzy => "fuzzy",
            Strategy::Partial => "partial",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located span. Built once by a strategy, then only read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub range: TextRange,
    pub strategy: Strategy,
    /// The document's own text under `range` at match time.
    pub matched_text: String,
    /// Char offset of the match in the whole document's concatenated text.
    pub start: usize,
    /// Exclusive end, same coordinates as `start`.
    pub end: usize,
}

impl MatchResult {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

// =============================================================================
// HIGHLIGHTS
// =============================================================================

/// The property a highlight is tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub label: String,
}

impl Property {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Property {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Where a highlight came from. Doubles as the registry's "type" index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightSource {
    Manual,
    Rag,
}

impl HighlightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightSource::Manual => "manual",
            HighlightSource::Rag => "rag",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "manual" => Some(HighlightSource::Manual),
            "rag" => Some(HighlightSource::Rag),
            _ => None,
        }
    }
}

/// Caller-supplied description of a highlight about to be applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightMeta {
    /// Restore under this id instead of minting a fresh one.
    #[serde(default)]
    pub id: Option<String>,
    pub property: Property,
    pub color: String,
    /// Text the caller expects under the range. Checked before any mutation.
    pub text: String,
    pub source: HighlightSource,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub section: Option<String>,
}

impl HighlightMeta {
    pub fn new(
        property: Property,
        color: impl Into<String>,
        text: impl Into<String>,
        source: HighlightSource,
    ) -> Self {
        HighlightMeta {
            id: None,
            property,
            color: color.into(),
            text: text.into(),
            source,
            confidence: None,
            section: None,
        }
    }
}

/// A live highlight. Owned by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: String,
    /// Verbatim text under the wrapper when it was created (or last resized).
    pub text: String,
    /// Text under the wrapper when it was created. Resize bounds index into it.
    #[serde(default)]
    pub original_text: String,
    /// Where `text` sits inside `original_text`, in chars.
    #[serde(default)]
    pub span: (usize, usize),
    pub property: Property,
    pub color: String,
    pub confidence: Option<f32>,
    pub section: Option<String>,
    pub source: HighlightSource,
    /// Back-reference to the boundary wrapper. Not owning; may go stale.
    pub boundary: NodeId,
}

/// Partial update for [`Engine::update_highlight`](crate::Engine::update_highlight).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightPatch {
    pub property: Option<Property>,
    pub color: Option<String>,
    pub confidence: Option<f32>,
}

impl HighlightPatch {
    pub fn is_empty(&self) -> bool {
        self.property.is_none() && self.color.is_none() && self.confidence.is_none()
    }
}

// =============================================================================
// STATS
// =============================================================================

/// Counters exposed for observability and for tests that need to prove a
/// tree walk did not happen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub snapshot_builds: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub highlights: usize,
}
