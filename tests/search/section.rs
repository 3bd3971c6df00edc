//! Section-scoped lookups through the engine.

use crate::common::{doc, test_engine, ARTICLE};
use marginalia::{Document, SearchOptions, Strategy};

/// A heading followed by a curly-apostrophe sentence, twice over.
const HERONS: &str = "<p>The heron\u{2019}s back.</p>\
    <section id=\"summary\"><p>Cold start. The heron\u{2019}s back. Then rain.</p></section>";

#[test]
fn test_exact_hit_wins_over_section_scope() {
    let doc = doc(ARTICLE);
    let mut engine = test_engine(10);
    let options = SearchOptions::default().with_section("Key Results");
    let found = engine
        .find_text(&doc, "The path was closed", Some(&options))
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Exact);

    let article = doc.children(doc.root())[0];
    let first_paragraph = doc.children(article)[1];
    assert!(doc.contains(first_paragraph, found.range.start.node));
}

#[test]
fn test_without_section_first_occurrence_wins() {
    let doc = doc(ARTICLE);
    let mut engine = test_engine(10);
    let found = engine
        .find_text(&doc, "The path was closed", None)
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Exact);
    let article = doc.children(doc.root())[0];
    let first_paragraph = doc.children(article)[1];
    assert!(doc.contains(first_paragraph, found.range.start.node));
}

#[test]
fn test_heading_section_covers_following_siblings() {
    let doc = doc(
        "<h2>Intro</h2><p>the \u{201C}same\u{201D} words here</p>\
         <h2>Results</h2><p>the \u{2018}same\u{2019} words here</p>",
    );
    let mut engine = test_engine(10);
    let options = SearchOptions::default().with_section("results");
    let found = engine
        .find_text(&doc, "the 'same' words here", Some(&options))
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Section);
    assert_eq!(doc.parent(found.range.start.node), Some(doc.children(doc.root())[3]));
    // "Intro" + first paragraph + "Results"
    assert_eq!((found.start, found.end), (33, 54));
    assert_eq!(found.matched_text, "the \u{2018}same\u{2019} words here");
}

#[test]
fn test_single_occurrence_in_section_keeps_exact_label() {
    let doc = doc(ARTICLE);
    let mut engine = test_engine(10);
    let options = SearchOptions::default().with_section("Methods");
    let found = engine
        .find_text(&doc, "counting birds", Some(&options))
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Exact);
}

#[test]
fn test_unknown_section_falls_back_to_whole_document() {
    let doc = doc(ARTICLE);
    let mut engine = test_engine(10);
    let options = SearchOptions::default().with_section("Appendix");
    let found = engine
        .find_text(&doc, "The heron returned", Some(&options))
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Exact);
}

#[test]
fn test_sentence_index_selects_one_sentence() {
    let doc = doc(HERONS);
    let mut engine = test_engine(10);

    let right = SearchOptions::default().with_section("summary").with_sentence(1);
    let found = engine
        .find_text(&doc, "The heron's back", Some(&right))
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Section);
    // first paragraph (17) + "Cold start. "
    assert_eq!(found.start, 29);

    // Wrong sentence: the section search misses and the normalized pass
    // finds the first paragraph.
    let wrong = SearchOptions::default().with_section("summary").with_sentence(2);
    let found = engine
        .find_text(&doc, "The heron's back", Some(&wrong))
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Normalized);
    assert_eq!(found.start, 0);
}

#[test]
fn test_exact_only_mode_keeps_section_literal() {
    let doc = doc(HERONS);
    let mut engine = test_engine(10);
    let options = SearchOptions::default().with_section("summary").exact();
    assert_eq!(
        engine.find_text(&doc, "The heron's back", Some(&options)),
        Ok(None)
    );
    let literal = engine
        .find_text(&doc, "The heron\u{2019}s back", Some(&options))
        .unwrap()
        .unwrap();
    assert_eq!(literal.strategy, Strategy::Exact);
}
