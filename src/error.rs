// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Errors the engine can hand back, and the ones it only logs.
//!
//! "Not found" is deliberately absent: a query that matches nothing is an
//! ordinary outcome and comes back as `Ok(None)`. Everything here means the
//! caller asked for something impossible, or the document moved underneath
//! a reference the caller was holding.
//!
//! | Variant          | Raised by                      | Document touched? |
//! |------------------|--------------------------------|-------------------|
//! | `QueryTooShort`  | `find_text` validation         | no                |
//! | `QueryTooLong`   | `find_text` validation         | no                |
//! | `InvalidRange`   | anchoring, apply, resize       | no                |
//! | `StaleAnchor`    | apply (text re-check)          | no                |
//! | `DecorationLeak` | remove (logged, never returned)| yes (best effort) |
//! | `InvalidConfig`  | `Engine::new`                  | n/a               |
//! | `Document`       | tree primitives                | no                |

use crate::types::NodeId;
use std::fmt;

/// Failure of a primitive tree operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The id does not name a live node (discarded, or never existed).
    MissingNode(NodeId),
    /// An element was required but the node is a text leaf.
    NotAnElement(NodeId),
    /// A text leaf was required but the node is an element.
    NotAText(NodeId),
    /// The reference node is not a child of the given parent.
    NotAChild { parent: NodeId, child: NodeId },
    /// Inserting the node would make it its own ancestor.
    WouldCycle { parent: NodeId, child: NodeId },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::MissingNode(id) => write!(f, "node {} is not live", id),
            DocumentError::NotAnElement(id) => write!(f, "node {} is not an element", id),
            DocumentError::NotAText(id) => write!(f, "node {} is not a text node", id),
            DocumentError::NotAChild { parent, child } => {
                write!(f, "node {} is not a child of {}", child, parent)
            }
            DocumentError::WouldCycle { parent, child } => {
                write!(f, "inserting {} under {} would create a cycle", child, parent)
            }
        }
    }
}

impl std::error::Error for DocumentError {}

/// Error type for every public engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Query is shorter than `min_search_length` (in chars, after trimming).
    QueryTooShort { len: usize, min: usize },
    /// Query is longer than `max_search_length`.
    QueryTooLong { len: usize, max: usize },
    /// A range could not be built or used (detached nodes, bad bounds).
    InvalidRange { reason: String },
    /// The range no longer spells the text it was resolved for.
    StaleAnchor { expected: String, found: String },
    /// Decoration text survived into a removal reconstruction.
    DecorationLeak { id: String, leaked: String },
    /// Configuration rejected at construction.
    InvalidConfig { field: &'static str, reason: String },
    /// A tree primitive failed.
    Document(DocumentError),
}

impl EngineError {
    pub(crate) fn invalid_range(reason: impl Into<String>) -> Self {
        EngineError::InvalidRange {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::QueryTooShort { len, min } => {
                write!(f, "query has {} chars, minimum is {}", len, min)
            }
            EngineError::QueryTooLong { len, max } => {
                write!(f, "query has {} chars, maximum is {}", len, max)
            }
            EngineError::InvalidRange { reason } => write!(f, "invalid range: {}", reason),
            EngineError::StaleAnchor { expected, found } => {
                write!(
                    f,
                    "stale anchor: expected '{}', range now reads '{}'",
                    preview(expected),
                    preview(found)
                )
            }
            EngineError::DecorationLeak { id, leaked } => {
                write!(
                    f,
                    "decoration text leaked while removing {}: '{}'",
                    id,
                    preview(leaked)
                )
            }
            EngineError::InvalidConfig { field, reason } => {
                write!(f, "invalid config field '{}': {}", field, reason)
            }
            EngineError::Document(err) => write!(f, "document: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Document(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentError> for EngineError {
    fn from(err: DocumentError) -> Self {
        EngineError::Document(err)
    }
}

/// First 40 chars, for messages.
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(40).collect();
    if text.chars().count() > 40 {
        out.push('…');
    }
    out
}
