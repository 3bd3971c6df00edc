// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text anchoring and reversible highlights over a mutable tree of text nodes.
//!
//! Given a passage of text (typed by a person, or quoted back by a retrieval
//! model with its own idea of whitespace and quote marks), find where it lives
//! in a document, wrap it in a boundary element carrying metadata, and later
//! unwrap it so the document reads exactly as before.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  document    │────▶│   index      │────▶│   search     │
//! │ (Document,   │     │ (Snapshot,   │     │ (exact,      │
//! │  ArenaDoc)   │     │  Scope)      │     │  section, …) │
//! └──────────────┘     └──────────────┘     └──────────────┘
//!        ▲                                         │
//!        │                                         ▼
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  highlight   │◀────│   engine     │◀────│   anchor     │
//! │ (Applier,    │     │ (public API) │     │ (TextRange)  │
//! │  Registry)   │     │              │     │              │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! # Strategy chain
//!
//! | Order | Strategy     | Matches when                                   |
//! |-------|--------------|------------------------------------------------|
//! | 1     | `exact`      | the query occurs verbatim                      |
//! | 2     | `section`    | it occurs inside the named section             |
//! | 3     | `normalized` | a quote/dash/whitespace/hyphen variant occurs  |
//! | 4     | `fuzzy`      | a 40-char window of a long query occurs        |
//! | 5     | `partial`    | a 60..20-char prefix occurs                    |
//!
//! # Usage
//!
//! ```
//! use marginalia::{markup, Engine, EngineConfig, HighlightMeta, HighlightSource, Property};
//! use marginalia::Document;
//!
//! let mut doc = markup::parse("<p>The cat sat on the mat.</p>").unwrap();
//! let mut engine = Engine::new(EngineConfig {
//!     min_search_length: 5,
//!     ..EngineConfig::default()
//! })
//! .unwrap();
//!
//! let found = engine.find_text(&doc, "cat sat", None).unwrap().unwrap();
//! let meta = HighlightMeta::new(
//!     Property::new("p1", "Subject"),
//!     "#ffeb3b",
//!     "cat sat",
//!     HighlightSource::Manual,
//! );
//! let highlight = engine.highlight_range(&mut doc, &found.range, meta).unwrap();
//!
//! assert!(engine.remove_highlight(&mut doc, &highlight.id));
//! assert_eq!(doc.text_content(doc.root()), "The cat sat on the mat.");
//! ```

pub mod anchor;
pub mod cache;
pub mod config;
pub mod contracts;
pub mod document;
mod engine;
pub mod error;
pub mod highlight;
pub mod index;
pub mod normalize;
pub mod search;
pub mod testing;
mod types;

pub use config::{EngineConfig, ExclusionRules, SearchOptions};
pub use document::{markup, ArenaDocument, Document, ElementData};
pub use engine::Engine;
pub use error::{DocumentError, EngineError};
pub use types::{
    Anchor, EngineStats, Highlight, HighlightMeta, HighlightPatch, HighlightSource, MatchResult,
    NodeId, Property, Strategy, TextRange,
};
