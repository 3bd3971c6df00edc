//! One test per strategy, driven through the public engine API.

use crate::common::{doc, engine_with, test_engine, ARTICLE, FOX};
use marginalia::{Document, EngineConfig, EngineError, SearchOptions, Strategy};

#[test]
fn test_exact_match_reports_offsets() {
    let doc = doc(crate::common::CAT_SAT);
    let mut engine = test_engine(5);
    let found = engine.find_text(&doc, "cat sat", None).unwrap().unwrap();
    assert_eq!(found.strategy, Strategy::Exact);
    assert_eq!((found.start, found.end), (4, 11));
    assert_eq!(found.matched_text, "cat sat");
    assert_eq!(found.range.start.offset, 4);
    assert_eq!(found.range.end.offset, 11);
}

#[test]
fn test_exact_match_spans_space_between_inline_elements() {
    let mut doc = doc("<p><b>quick</b> <i>brown</i> fox jumps</p>");
    let mut engine = test_engine(5);
    let found = engine.find_text(&doc, "quick brown fox", None).unwrap().unwrap();
    assert_eq!(found.strategy, Strategy::Exact);
    assert_eq!((found.start, found.end), (0, 15));
    assert_eq!(found.matched_text, "quick brown fox");

    let meta = crate::common::meta("quick brown fox");
    let highlight = engine.highlight_match(&mut doc, &found, meta).unwrap();
    assert_eq!(doc.text_content(highlight.boundary), "quick brown fox");
    assert!(engine.remove_highlight(&mut doc, &highlight.id));
    assert_eq!(crate::common::body_text(&doc), "quick brown fox jumps");
}

#[test]
fn test_query_bounds_are_enforced_before_search() {
    let doc = doc(crate::common::CAT_SAT);
    let mut engine = test_engine(10);
    assert!(matches!(
        engine.find_text(&doc, "  cat sat  ", None),
        Err(EngineError::QueryTooShort { len: 7, min: 10 })
    ));
    let long = "x".repeat(1001);
    assert!(matches!(
        engine.find_text(&doc, &long, None),
        Err(EngineError::QueryTooLong { len: 1001, max: 1000 })
    ));
    assert_eq!(engine.stats().snapshot_builds, 0);
}

#[test]
fn test_no_match_is_none_not_error() {
    let doc = doc(crate::common::CAT_SAT);
    let mut engine = test_engine(5);
    assert_eq!(engine.find_text(&doc, "zebra crossing", None), Ok(None));
}

#[test]
fn test_straight_quotes_find_curly_text() {
    let doc = doc("<p>He said \u{201C}hello\u{201D} and left.</p>");
    let mut engine = test_engine(10);
    let found = engine
        .find_text(&doc, "He said \"hello\"", None)
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Normalized);
    assert_eq!(found.matched_text, "He said \u{201C}hello\u{201D}");
}

#[test]
fn test_curly_quotes_find_straight_text() {
    let doc = doc("<p>He said \"hello\" and left.</p>");
    let mut engine = test_engine(10);
    let found = engine
        .find_text(&doc, "He said \u{201C}hello\u{201D}", None)
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Normalized);
    assert_eq!(found.matched_text, "He said \"hello\"");
}

#[test]
fn test_whitespace_runs_are_collapsed() {
    let doc = doc(ARTICLE);
    let mut engine = test_engine(10);
    let found = engine
        .find_text(&doc, "Next time we will start earlier", None)
        .unwrap()
        .unwrap();
    assert_eq!(found.strategy, Strategy::Normalized);
    assert_eq!(found.matched_text, "Next   time we  will\nstart earlier");
}

#[test]
fn test_whitespace_switch_disables_collapse() {
    let doc = doc(ARTICLE);
    let mut engine = test_engine(10);
    let options = SearchOptions {
        normalize_whitespace: false,
        ..SearchOptions::default()
    };
    assert_eq!(
        engine.find_text(&doc, "Next time we will start earlier", Some(&options)),
        Ok(None)
    );
}

#[test]
fn test_fuzzy_window_expands_to_full_query() {
    let doc = doc(
        "<p>Yesterday the quick brown fox jumps over the lazy dog near the river\nbank \
         this morning, and nobody noticed.</p>",
    );
    let mut engine = test_engine(10);
    let options = SearchOptions {
        normalize_whitespace: false,
        ..SearchOptions::default()
    };
    let query = "the quick brown fox jumps over the lazy dog near the river bank this morning";
    let found = engine.find_text(&doc, query, Some(&options)).unwrap().unwrap();
    assert_eq!(found.strategy, Strategy::Fuzzy);
    assert_eq!(found.matched_text.replace('\n', " "), query);
}

#[test]
fn test_fuzzy_window_survives_mid_text_divergence() {
    let doc = doc(
        "<p>the quick brown fox jumps over the lazy cat near the river bank this morning</p>",
    );
    let mut engine = test_engine(10);
    let query = "the quick brown fox jumps over the lazy dog near the river bank this morning";
    let found = engine.find_text(&doc, query, None).unwrap().unwrap();
    assert_eq!(found.strategy, Strategy::Fuzzy);
    assert_eq!(found.matched_text, "the quick brown fox jumps over the lazy ");
}

#[test]
fn test_exact_wins_over_fuzzy_for_present_long_query() {
    let doc = doc(FOX);
    let mut engine = test_engine(10);
    let query = "the quick brown fox jumps over the lazy dog near the river bank this morning";
    let found = engine.find_text(&doc, query, None).unwrap().unwrap();
    assert_eq!(found.strategy, Strategy::Exact);
    assert_eq!(found.matched_text, query);
}

#[test]
fn test_partial_prefix_reports_partial() {
    let doc = doc(FOX);
    let mut engine = test_engine(10);
    let query = "the quick brown fox xyzzy";
    assert_eq!(query.chars().count(), 25);
    let found = engine.find_text(&doc, query, None).unwrap().unwrap();
    assert_eq!(found.strategy, Strategy::Partial);
    assert_eq!(found.matched_text, "the quick brown fox ");
}

#[test]
fn test_exact_match_option_skips_tolerant_strategies() {
    let doc = doc(FOX);
    let mut engine = test_engine(10);
    let options = SearchOptions::default().exact();
    assert_eq!(
        engine.find_text(&doc, "the quick brown fox xyzzy", Some(&options)),
        Ok(None)
    );
}

#[test]
fn test_case_sensitivity_is_per_call() {
    let doc = doc(FOX);
    let mut engine = engine_with(EngineConfig {
        min_search_length: 5,
        case_sensitive: true,
        ..EngineConfig::default()
    });
    assert_eq!(engine.find_text(&doc, "YESTERDAY the", None), Ok(None));
    let relaxed = SearchOptions::default();
    let found = engine
        .find_text(&doc, "YESTERDAY the", Some(&relaxed))
        .unwrap()
        .unwrap();
    assert_eq!(found.matched_text, "Yesterday the");
}

#[test]
fn test_whole_words_reject_inner_hits() {
    let doc = doc("<p>the catalog lists a cat</p>");
    let mut engine = test_engine(3);
    let options = SearchOptions::default().whole_words(true);
    let found = engine.find_text(&doc, "cat", Some(&options)).unwrap().unwrap();
    assert_eq!(found.start, 20);
}

#[test]
fn test_excluded_subtrees_are_invisible() {
    let doc = doc("<p>visible words</p><script>var secret = 1;</script><p hidden>ghost text</p>");
    let mut engine = test_engine(5);
    let options = SearchOptions::default().exact();
    assert_eq!(engine.find_text(&doc, "secret", Some(&options)), Ok(None));
    assert_eq!(engine.find_text(&doc, "ghost text", Some(&options)), Ok(None));
    assert!(engine.find_text(&doc, "visible words", Some(&options)).unwrap().is_some());
}

#[test]
fn test_find_all_returns_every_occurrence() {
    let doc = doc("<p>red fox</p><p>blue fox and a red fox</p><p>red foxes</p>");
    let mut engine = test_engine(5);
    let all = engine.find_all_text(&doc, "red fox", None).unwrap();
    let starts: Vec<usize> = all.iter().map(|m| m.start).collect();
    assert_eq!(starts, [0, 22, 29]);

    let capped = SearchOptions {
        max_results: 1,
        ..SearchOptions::default()
    };
    assert_eq!(engine.find_all_text(&doc, "red fox", Some(&capped)).unwrap().len(), 1);
}
