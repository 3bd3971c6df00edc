//! Search cache and snapshot reuse, observed through engine stats.

use crate::common::{doc, engine_with, test_engine, CAT_SAT};
use marginalia::{Document, EngineConfig, EngineError, SearchOptions};

#[test]
fn test_repeat_query_is_served_from_cache() {
    let doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    let first = engine.find_text(&doc, "cat sat", None).unwrap().unwrap();
    let builds = engine.stats().snapshot_builds;

    let second = engine.find_text(&doc, "cat sat", None).unwrap().unwrap();
    assert_eq!(first, second);
    let stats = engine.stats();
    assert_eq!(stats.snapshot_builds, builds);
    assert_eq!((stats.cache_hits, stats.cache_misses), (1, 1));
}

#[test]
fn test_surrounding_whitespace_shares_a_cache_entry() {
    let doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    engine.find_text(&doc, "cat sat", None).unwrap();
    engine.find_text(&doc, "  cat sat\n", None).unwrap();
    assert_eq!(engine.stats().cache_hits, 1);
}

#[test]
fn test_different_options_are_different_entries() {
    let doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    engine.find_text(&doc, "cat sat", None).unwrap();
    let options = SearchOptions::default().whole_words(true);
    engine.find_text(&doc, "cat sat", Some(&options)).unwrap();
    assert_eq!(engine.stats().cache_hits, 0);
    assert_eq!(engine.stats().cache_misses, 2);
}

#[test]
fn test_new_query_reuses_the_snapshot() {
    let doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    engine.find_text(&doc, "cat sat", None).unwrap();
    engine.find_text(&doc, "the mat", None).unwrap();
    assert_eq!(engine.stats().snapshot_builds, 1);
}

#[test]
fn test_invalidate_forces_rebuild() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    engine.find_text(&doc, "cat sat", None).unwrap();

    let p = doc.children(doc.root())[0];
    let text = doc.children(p)[0];
    doc.set_text(text, "The dog sat on the mat.".to_string()).unwrap();
    engine.invalidate(&doc, p);

    assert_eq!(engine.find_text(&doc, "cat sat", None), Ok(None));
    let found = engine.find_text(&doc, "dog sat", None).unwrap().unwrap();
    assert_eq!(found.matched_text, "dog sat");
    assert_eq!(engine.stats().snapshot_builds, 2);
}

#[test]
fn test_changed_text_is_caught_without_invalidate() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    engine.find_text(&doc, "the mat", None).unwrap();

    let p = doc.children(doc.root())[0];
    let text = doc.children(p)[0];
    doc.set_text(text, "The dog sat on the mat.".to_string()).unwrap();

    // Not cached yet, so the chain runs and the snapshot revalidates.
    let found = engine.find_text(&doc, "dog sat", None).unwrap().unwrap();
    assert_eq!(found.matched_text, "dog sat");
    assert_eq!(engine.stats().snapshot_builds, 2);
}

#[test]
fn test_stale_cached_match_is_refused_at_apply_time() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    engine.find_text(&doc, "cat sat", None).unwrap();

    let p = doc.children(doc.root())[0];
    let text = doc.children(p)[0];
    doc.set_text(text, "The dog sat on the mat.".to_string()).unwrap();

    // The host forgot to invalidate: the cache hands back the old range.
    let stale = engine.find_text(&doc, "cat sat", None).unwrap().unwrap();
    let before = crate::common::render(&doc);
    let err = engine
        .highlight_match(&mut doc, &stale, crate::common::meta("cat sat"))
        .unwrap_err();
    assert!(matches!(err, EngineError::StaleAnchor { .. }));
    assert_eq!(crate::common::render(&doc), before);
}

#[test]
fn test_zero_ttl_rebuilds_every_search() {
    let doc = doc(CAT_SAT);
    let mut engine = engine_with(EngineConfig {
        min_search_length: 5,
        snapshot_ttl_ms: 0,
        ..EngineConfig::default()
    });
    engine.find_text(&doc, "cat sat", None).unwrap();
    engine.find_text(&doc, "the mat", None).unwrap();
    assert_eq!(engine.stats().snapshot_builds, 2);
}

#[test]
fn test_highlighting_clears_the_cache() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    engine.find_text(&doc, "the mat", None).unwrap();
    engine
        .highlight_text(&mut doc, "cat sat", None, crate::common::meta("cat sat"))
        .unwrap()
        .unwrap();
    let hits = engine.stats().cache_hits;
    engine.find_text(&doc, "the mat", None).unwrap();
    assert_eq!(engine.stats().cache_hits, hits);
}
