//! Resizing keeps the highlight's identity.

use crate::common::{body_text, doc, meta, nth_block, render, test_engine, CAT_SAT};
use marginalia::{Document, EngineError};

#[test]
fn test_resize_preserves_identity() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    let highlight = engine
        .highlight_text(&mut doc, "cat sat on", None, meta("cat sat on"))
        .unwrap()
        .unwrap();

    let resized = engine
        .resize_highlight(&mut doc, &highlight.id, 4, 10)
        .unwrap()
        .unwrap();
    assert_eq!(resized.id, highlight.id);
    assert_eq!(resized.text, "sat on");
    assert_ne!(resized.boundary, highlight.boundary);
    assert!(!doc.is_live(highlight.boundary));

    let stored = engine.get_highlight(&highlight.id).unwrap();
    assert_eq!(stored.text, "sat on");
    assert_eq!(doc.text_content(stored.boundary), "sat on");
    assert_eq!(
        doc.element(stored.boundary).unwrap().attr("data-highlight-id"),
        Some(highlight.id.as_str())
    );
    assert_eq!(body_text(&doc), "The cat sat on the mat.");
    assert_eq!(engine.get_highlight_count(), 1);
}

#[test]
fn test_resize_then_remove_round_trips() {
    let mut doc = doc(CAT_SAT);
    let original = render(&doc);
    let mut engine = test_engine(5);
    let highlight = engine
        .highlight_text(&mut doc, "cat sat", None, meta("cat sat"))
        .unwrap()
        .unwrap();
    engine.resize_highlight(&mut doc, &highlight.id, 0, 3).unwrap();
    assert!(engine.remove_highlight(&mut doc, &highlight.id));
    assert_eq!(render(&doc), original);
    assert_eq!(doc.children(nth_block(&doc, 0)).len(), 1);
}

#[test]
fn test_resize_element_lookup_follows_the_new_wrapper() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    let highlight = engine
        .highlight_text(&mut doc, "cat sat", None, meta("cat sat"))
        .unwrap()
        .unwrap();
    let resized = engine
        .resize_highlight(&mut doc, &highlight.id, 4, 7)
        .unwrap()
        .unwrap();
    let inner = doc.children(resized.boundary)[0];
    assert_eq!(
        engine.highlight_at(&doc, inner).map(|h| h.id.clone()),
        Some(highlight.id.clone())
    );
}

#[test]
fn test_resize_rejects_out_of_bounds() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    let highlight = engine
        .highlight_text(&mut doc, "cat sat", None, meta("cat sat"))
        .unwrap()
        .unwrap();
    let before = render(&doc);
    for (start, end) in [(3, 3), (5, 2), (0, 8)] {
        assert!(matches!(
            engine.resize_highlight(&mut doc, &highlight.id, start, end),
            Err(EngineError::InvalidRange { .. })
        ));
    }
    assert_eq!(render(&doc), before);
    assert_eq!(engine.get_highlight(&highlight.id).unwrap().text, "cat sat");
}

#[test]
fn test_resize_unknown_id_is_none() {
    let mut doc = doc(CAT_SAT);
    let mut engine = test_engine(5);
    assert_eq!(engine.resize_highlight(&mut doc, "ghost", 0, 1), Ok(None));
}

#[test]
fn test_shrink_then_grow_uses_the_original_text() {
    let mut doc = doc(CAT_SAT);
    let original = render(&doc);
    let mut engine = test_engine(5);
    let highlight = engine
        .highlight_text(&mut doc, "cat sat on", None, meta("cat sat on"))
        .unwrap()
        .unwrap();

    let narrow = engine
        .resize_highlight(&mut doc, &highlight.id, 4, 7)
        .unwrap()
        .unwrap();
    assert_eq!(narrow.text, "sat");
    assert_eq!(narrow.span, (4, 7));

    let wide = engine
        .resize_highlight(&mut doc, &highlight.id, 0, 10)
        .unwrap()
        .unwrap();
    assert_eq!(wide.text, "cat sat on");
    assert_eq!(wide.original_text, "cat sat on");
    assert_eq!(doc.text_content(wide.boundary), "cat sat on");
    assert_eq!(body_text(&doc), "The cat sat on the mat.");

    // Bounds never stack: 0..3 is "cat" of the original, not of "sat".
    let again = engine
        .resize_highlight(&mut doc, &highlight.id, 4, 7)
        .unwrap()
        .unwrap();
    let first = engine
        .resize_highlight(&mut doc, &highlight.id, 0, 3)
        .unwrap()
        .unwrap();
    assert_eq!((again.text.as_str(), first.text.as_str()), ("sat", "cat"));

    assert!(engine.remove_highlight(&mut doc, &highlight.id));
    assert_eq!(render(&doc), original);
}
