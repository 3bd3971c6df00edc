// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.

#![doc(hidden)]

use crate::config::EngineConfig;
use crate::document::{markup, ArenaDocument, Document, ElementData};
use crate::engine::Engine;
use crate::types::{HighlightMeta, HighlightSource, Property};

/// The document every end-to-end example starts from.
pub const CAT_SAT: &str = "<p>The cat sat on the mat.</p>";

/// Parse markup that is known to be well-formed.
pub fn doc(src: &str) -> ArenaDocument {
    match markup::parse(src) {
        Ok(doc) => doc,
        Err(err) => panic!("fixture markup does not parse: {}", err),
    }
}

/// One `<p>` per paragraph.
pub fn paragraphs(texts: &[&str]) -> ArenaDocument {
    let mut doc = ArenaDocument::new();
    let root = doc.root();
    for text in texts {
        let p = doc.create_element(ElementData::new("p"));
        let _ = doc.append_child(root, p);
        let leaf = doc.create_text(text);
        let _ = doc.append_child(p, leaf);
    }
    doc
}

/// Manual highlight metadata expecting `text`, tagged "Subject".
pub fn meta(text: &str) -> HighlightMeta {
    HighlightMeta::new(
        Property::new("p1", "Subject"),
        "#ffeb3b",
        text,
        HighlightSource::Manual,
    )
}

/// Engine with default config except the minimum query length.
pub fn test_engine(min_search_length: usize) -> Engine {
    let config = EngineConfig {
        min_search_length,
        ..EngineConfig::default()
    };
    match Engine::new(config) {
        Ok(engine) => engine,
        Err(err) => panic!("test config rejected: {}", err),
    }
}

/// Whole-document text, ignoring wrappers.
pub fn body_text(doc: &ArenaDocument) -> String {
    doc.text_content(doc.root())
}
