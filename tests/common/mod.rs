//! Shared test utilities and fixtures.

#![allow(dead_code)]

use marginalia::{markup, ArenaDocument, Document, Engine, EngineConfig, NodeId};

// Re-export canonical test utilities from marginalia::testing
pub use marginalia::testing::{body_text, doc, meta, paragraphs, test_engine, CAT_SAT};

// ============================================================================
// FIXTURES
// ============================================================================

/// A short article with headings, a nested section and some chrome.
pub const ARTICLE: &str = "<article>\
    <h1>Field notes</h1>\
    <p>The river was high this morning and the path was closed.</p>\
    <h2>Methods</h2>\
    <p>We walked the \u{201C}east trail\u{201D} twice, counting birds.</p>\
    <script>var hidden = \"the path was closed\";</script>\
    <section class=\"key-results\">\
        <p>The path was closed. The heron returned. The ducks stayed.</p>\
    </section>\
    <h2>Discussion</h2>\
    <p>Next   time we  will\nstart earlier.</p>\
    </article>";

/// The quick brown fox sentence inside a longer paragraph.
pub const FOX: &str = "<p>Yesterday the quick brown fox jumps over the lazy dog near the \
    river bank this morning, and nobody noticed.</p>";

// ============================================================================
// HELPERS
// ============================================================================

/// Engine with a custom config, panicking on rejection.
pub fn engine_with(config: EngineConfig) -> Engine {
    Engine::new(config).expect("config should validate")
}

/// The `n`-th element child of the root.
pub fn nth_block(doc: &ArenaDocument, n: usize) -> NodeId {
    doc.children(doc.root())[n]
}

/// Rendered markup of the whole document, for before/after comparisons.
pub fn render(doc: &ArenaDocument) -> String {
    markup::render(doc, doc.root())
}

/// Number of text nodes directly under `parent`.
pub fn text_children(doc: &ArenaDocument, parent: NodeId) -> usize {
    doc.children(parent)
        .iter()
        .filter(|&&child| doc.text(child).is_some())
        .count()
}
