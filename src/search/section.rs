// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Section-scoped search: find the query under a named part of the page.
//!
//! A section name is resolved to anchor elements by four heuristics, tried in
//! this order across the whole document:
//!
//! 1. a heading whose text contains the name
//! 2. an element with a class containing the name's slug
//! 3. an element whose id contains the slug
//! 4. an element whose `aria-label` contains the name
//!
//! Each anchor contributes two scopes: its own subtree, then the siblings that
//! follow it up to the next heading. The second one is what makes
//! `<h2>Methods</h2><p>…</p>` work, where the content is not nested under the
//! heading at all.

use super::fallback::normalized_within;
use super::{exact, haystack, prepare};
use crate::config::SearchOptions;
use crate::document::Document;
use crate::index::{Exclusion, Scope, Snapshot, TextNodeIndex};
use crate::normalize::fold_char;
use crate::types::NodeId;
use std::sync::Arc;
use tracing::debug;

/// `"Key Results"` → `"key-results"`.
pub fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn folded(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// Anchor elements for `name`, best heuristic first, document order within.
pub fn resolve_anchors<D: Document + ?Sized>(
    doc: &D,
    name: &str,
    exclusion: &Exclusion,
) -> Vec<NodeId> {
    let name = folded(name.trim());
    if name.is_empty() {
        return Vec::new();
    }
    let slug = slug(&name);
    let elements = elements_in_order(doc, exclusion);

    let mut by_heading = Vec::new();
    let mut by_class = Vec::new();
    let mut by_id = Vec::new();
    let mut by_label = Vec::new();
    for &node in &elements {
        let Some(data) = doc.element(node) else {
            continue;
        };
        if data.heading_level().is_some() && folded(&doc.text_content(node)).contains(&name) {
            by_heading.push(node);
        }
        if data.classes().any(|class| class.to_lowercase().contains(&slug)) {
            by_class.push(node);
        }
        if data.id().is_some_and(|id| id.to_lowercase().contains(&slug)) {
            by_id.push(node);
        }
        if data.aria_label().is_some_and(|label| folded(label).contains(&name)) {
            by_label.push(node);
        }
    }

    let mut anchors: Vec<NodeId> = Vec::new();
    for node in by_heading.into_iter().chain(by_class).chain(by_id).chain(by_label) {
        if !anchors.contains(&node) {
            anchors.push(node);
        }
    }
    anchors
}

fn elements_in_order<D: Document + ?Sized>(doc: &D, exclusion: &Exclusion) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![doc.root()];
    while let Some(node) = stack.pop() {
        let Some(data) = doc.element(node) else {
            continue;
        };
        if exclusion.excludes(data) {
            continue;
        }
        out.push(node);
        stack.extend(doc.children(node).iter().rev().copied());
    }
    out
}

/// `[start, end)` of each sentence: a run of non-terminators followed by a
/// run of `.`, `!` or `?`. Trailing text without a terminator is no sentence.
pub fn sentence_spans(text: &[char]) -> Vec<(usize, usize)> {
    let terminal = |c: char| matches!(c, '.' | '!' | '?');
    let mut spans = Vec::new();
    let mut i = 0;
    while i < text.len() {
        let start = i;
        while i < text.len() && !terminal(text[i]) {
            i += 1;
        }
        if i == start || i == text.len() {
            // leading terminators, or no terminator before the end
            if i == text.len() {
                break;
            }
            i += 1;
            continue;
        }
        while i < text.len() && terminal(text[i]) {
            i += 1;
        }
        spans.push((start, i));
    }
    spans
}

/// Search one scope, optionally narrowed to its `sentence`-th sentence.
///
/// The literal query is tried first, then (unless `exact_match` is set) the
/// normalized variants, both confined to the same window.
fn search_scope(
    snapshot: &Snapshot,
    query: &str,
    needle: &[char],
    options: &SearchOptions,
) -> Option<(usize, usize)> {
    let hay = haystack(snapshot, options.case_sensitive);
    let (start, end) = match options.sentence_index {
        Some(index) => match sentence_spans(snapshot.chars()).get(index) {
            Some(&span) => span,
            None => {
                debug!(index, "sentence index out of range, searching whole scope");
                (0, hay.len())
            }
        },
        None => (0, hay.len()),
    };
    if let Some((s, e)) = exact::find(&hay[start..end], needle, options.whole_words) {
        return Some((s + start, e + start));
    }
    if options.exact_match {
        return None;
    }
    normalized_within(snapshot, query, options, (start, end))
}

/// First hit of `query` inside any scope of the named section.
pub fn find<D: Document + ?Sized>(
    doc: &D,
    index: &mut TextNodeIndex,
    section: &str,
    query: &str,
    options: &SearchOptions,
) -> Option<(Arc<Snapshot>, (usize, usize))> {
    let needle = prepare(query, options.case_sensitive);
    let anchors = resolve_anchors(doc, section, index.exclusion());
    if anchors.is_empty() {
        debug!(section, "no element matches section");
        return None;
    }
    for anchor in anchors {
        for scope in [Scope::Subtree(anchor), Scope::FollowingSiblings(anchor)] {
            let snapshot = index.snapshot(doc, scope);
            if let Some(span) = search_scope(&snapshot, query, &needle, options) {
                debug!(section, ?scope, "section match");
                return Some((snapshot, span));
            }
        }
    }
    None
}
