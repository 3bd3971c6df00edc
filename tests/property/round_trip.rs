//! Apply followed by remove gives the document its text back.

use crate::common::meta;
use marginalia::index::{Scope, TextNodeIndex};
use marginalia::{anchor, markup, Document, EngineConfig, ExclusionRules};
use proptest::prelude::*;
use proptest::sample::Index;
use std::time::Duration;

/// Word-level tokens, some wrapped in `<b>`. The space after a bold word sits
/// outside it, so `<b>a</b> <b>b</b>` yields whitespace-only text nodes.
fn paragraph_strategy() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec(
        (prop::string::string_regex("[a-z]{2,8}").unwrap(), any::<bool>()),
        1..8,
    )
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(paragraph_strategy(), 1..4).prop_map(|paragraphs| {
        paragraphs
            .into_iter()
            .map(|words| {
                let body: String = words
                    .into_iter()
                    .map(|(word, bold)| {
                        if bold {
                            format!("<b>{}</b> ", word)
                        } else {
                            format!("{} ", word)
                        }
                    })
                    .collect();
                format!("<p>{}</p>", body)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_apply_then_remove_restores_text(
        src in document_strategy(),
        a in any::<Index>(),
        b in any::<Index>(),
    ) {
        let mut doc = markup::parse(&src).unwrap();
        let before = doc.text_content(doc.root());

        let mut index = TextNodeIndex::new(&ExclusionRules::default(), Duration::from_secs(60));
        let snapshot = index.snapshot(&doc, Scope::Subtree(doc.root()));
        let total = snapshot.len();
        prop_assume!(total > 0);
        let start = a.index(total);
        let end = start + 1 + b.index(total - start);
        let tightened = snapshot.tighten(start, end);
        prop_assume!(tightened.is_some());
        let (start, end) = tightened.unwrap();
        let range = anchor::resolve(&snapshot, start, end).unwrap();
        let expected = snapshot.slice(start, end);
        prop_assert_eq!(anchor::range_text(&doc, &range), expected.clone());

        let mut engine = marginalia::Engine::new(EngineConfig::default()).unwrap();
        let highlight = engine.highlight_range(&mut doc, &range, meta(&expected)).unwrap();
        prop_assert_eq!(doc.text_content(doc.root()), before.clone());
        prop_assert_eq!(doc.text_content(highlight.boundary), expected);

        prop_assert!(engine.remove_highlight(&mut doc, &highlight.id));
        prop_assert_eq!(doc.text_content(doc.root()), before);
        prop_assert_eq!(engine.get_highlight_count(), 0);
    }

    #[test]
    fn prop_paragraph_text_is_found_literally(src in document_strategy()) {
        let doc = markup::parse(&src).unwrap();
        let p = doc.children(doc.root())[0];
        let text = doc.text_content(p);
        let query = text.trim();

        let config = EngineConfig {
            min_search_length: 1,
            ..EngineConfig::default()
        };
        let mut engine = marginalia::Engine::new(config).unwrap();
        let found = engine.find_text(&doc, query, None).unwrap();
        prop_assert!(found.is_some());
        let found = found.unwrap();
        prop_assert_eq!(found.strategy, marginalia::Strategy::Exact);
        prop_assert_eq!(found.matched_text.as_str(), query);
        prop_assert_eq!(anchor::range_text(&doc, &found.range), query);
    }

    #[test]
    fn prop_single_paragraph_round_trip_restores_markup(
        words in prop::collection::vec("[a-z]{2,8}", 1..12),
        a in any::<Index>(),
        b in any::<Index>(),
    ) {
        let src = format!("<p>{}</p>", words.join(" "));
        let mut doc = markup::parse(&src).unwrap();
        let before = markup::render(&doc, doc.root());

        let text = words.join(" ");
        let total = text.chars().count();
        let start = a.index(total);
        let end = start + 1 + b.index(total - start);
        let p = doc.children(doc.root())[0];
        let leaf = doc.children(p)[0];
        let range = marginalia::TextRange::within(leaf, start, end);
        let expected: String = text.chars().skip(start).take(end - start).collect();

        let mut engine = marginalia::Engine::new(EngineConfig::default()).unwrap();
        let highlight = engine.highlight_range(&mut doc, &range, meta(&expected)).unwrap();
        prop_assert!(engine.remove_highlight(&mut doc, &highlight.id));
        prop_assert_eq!(markup::render(&doc, doc.root()), before);
        prop_assert_eq!(doc.children(p).len(), 1);
    }
}
