//! Apply / remove round trips through the engine.

use crate::common::{body_text, doc, meta, nth_block, render, test_engine, text_children, CAT_SAT};
use marginalia::{markup, Document, HighlightSource, Property};

#[test]
fn test_end_to_end_cat_sat() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);

    let found = engine.find_text(&doc, "cat sat", None).unwrap().unwrap();
    assert_eq!((found.start, found.end), (4, 11));

    let highlight = engine
        .highlight_range(&mut doc, &found.range, meta("cat sat"))
        .unwrap();
    assert_eq!(highlight.text, "cat sat");
    assert_eq!(doc.text_content(highlight.boundary), "cat sat");
    let wrapper = doc.element(highlight.boundary).unwrap();
    assert_eq!(wrapper.tag, "mark");
    assert_eq!(wrapper.attr("data-highlight-id"), Some(highlight.id.as_str()));
    assert_eq!(wrapper.attr("data-property-label"), Some("Subject"));
    assert_eq!(wrapper.attr("data-color"), Some("#ffeb3b"));
    assert_eq!(wrapper.attr("data-source"), Some("manual"));
    assert_eq!(engine.get_highlight_count(), 1);

    assert!(engine.remove_highlight(&mut doc, &highlight.id));
    assert_eq!(body_text(&doc), "The cat sat on the mat.");
    let p = nth_block(&doc, 0);
    assert_eq!(doc.children(p).len(), 1);
    assert_eq!(text_children(&doc, p), 1);
    assert_eq!(engine.get_highlight_count(), 0);
    assert!(engine.get_highlight(&highlight.id).is_none());
}

#[test]
fn test_cross_paragraph_highlight_round_trips_text() {
    let mut doc = doc("<div><p>The <em>fat</em> cat</p><p>sat on <b>the</b> mat.</p></div>");
    let mut engine = test_engine(5);

    let found = engine.find_text(&doc, "fat catsat", None).unwrap().unwrap();
    let highlight = engine
        .highlight_match(&mut doc, &found, meta("ignored"))
        .unwrap();
    assert_eq!(highlight.text, "fat catsat");
    assert_eq!(doc.text_content(highlight.boundary), "fat catsat");
    assert_eq!(body_text(&doc), "The fat catsat on the mat.");

    assert!(engine.remove_highlight(&mut doc, &highlight.id));
    assert_eq!(body_text(&doc), "The fat catsat on the mat.");
}

#[test]
fn test_two_highlights_in_one_paragraph() {
    let mut doc = doc("<p>alpha beta gamma delta epsilon</p>");
    let original = render(&doc);
    let mut engine = test_engine(4);
    let a = engine
        .highlight_text(&mut doc, "beta", None, meta("beta"))
        .unwrap()
        .unwrap();
    let b = engine
        .highlight_text(&mut doc, "delta", None, meta("delta"))
        .unwrap()
        .unwrap();
    assert_eq!(engine.get_all_highlights().len(), 2);

    assert!(engine.remove_highlight(&mut doc, &a.id));
    assert_eq!(body_text(&doc), "alpha beta gamma delta epsilon");
    assert!(engine.remove_highlight(&mut doc, &b.id));
    assert_eq!(render(&doc), original);
}

#[test]
fn test_decorations_do_not_leak_into_removal() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    let highlight = engine
        .highlight_text(&mut doc, "cat sat", None, meta("cat sat"))
        .unwrap()
        .unwrap();
    markup::parse_into(
        &mut doc,
        highlight.boundary,
        "<span class=\"highlight-icon\">\u{2605}</span>\
         <div class=\"highlight-actions\"><button>Remove</button></div>",
    )
    .unwrap();
    assert!(doc.text_content(highlight.boundary).contains("Remove"));

    assert!(engine.remove_highlight(&mut doc, &highlight.id));
    assert_eq!(body_text(&doc), "The cat sat on the mat.");
    assert_eq!(text_children(&doc, nth_block(&doc, 0)), 1);
}

#[test]
fn test_highlight_across_elements_round_trips_text() {
    let mut doc = doc("<p>The <b>fat cat</b> sat down.</p>");
    let mut engine = test_engine(5);
    let highlight = engine
        .highlight_text(&mut doc, "cat sat", None, meta("cat sat"))
        .unwrap()
        .unwrap();
    assert_eq!(doc.text_content(highlight.boundary), "cat sat");
    assert_eq!(body_text(&doc), "The fat cat sat down.");

    assert!(engine.remove_highlight(&mut doc, &highlight.id));
    assert_eq!(body_text(&doc), "The fat cat sat down.");
}

#[test]
fn test_unknown_id_is_not_removed() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    assert!(!engine.remove_highlight(&mut doc, "nope"));
}

#[test]
fn test_restored_id_is_kept() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    let mut saved = meta("the mat");
    saved.id = Some("persisted-7".to_string());
    saved.source = HighlightSource::Rag;
    saved.confidence = Some(0.82);
    let highlight = engine
        .highlight_text(&mut doc, "the mat", None, saved)
        .unwrap()
        .unwrap();
    assert_eq!(highlight.id, "persisted-7");
    assert_eq!(highlight.confidence, Some(0.82));
    assert_eq!(
        engine.get_highlights_by_type(HighlightSource::Rag)[0].id,
        "persisted-7"
    );
}

#[test]
fn test_highlight_serializes_for_the_host() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    let mut m = meta("cat sat");
    m.property = Property::new("p9", "Action");
    let highlight = engine
        .highlight_text(&mut doc, "cat sat", None, m)
        .unwrap()
        .unwrap();
    let json = serde_json::to_value(&highlight).unwrap();
    assert_eq!(json["property"]["label"], "Action");
    assert_eq!(json["source"], "manual");
    assert_eq!(json["text"], "cat sat");
}
